use std::net::SocketAddr;

use tracing::{info, Level};

use networth_tracker_backend::config::AppConfig;
use networth_tracker_backend::{create_router, initialize_backend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let config = AppConfig::from_env();
    let addr = SocketAddr::new(config.host.parse()?, config.port);

    let state = initialize_backend(config).await?;
    let app = create_router(state);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
