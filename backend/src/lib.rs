//! # Net-Worth Tracker Backend
//!
//! HTTP server for the net-worth tracker. The crate follows a layered
//! architecture:
//!
//! ```text
//! IO Layer (REST API, auth extractors)
//!     ↓
//! Domain Layer (access policy, date resolution, services)
//!     ↓
//! Storage Layer (SQLite repositories)
//! ```

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::Result;
use axum::http::Method;
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::config::AppConfig;
use crate::domain::{DateResolver, EntryService, ProfileService, UserService};
use crate::io::rest::{admin_apis, auth_apis, entry_apis, profile_apis};
use crate::storage::{DbConnection, EntryRepository, LinkRepository};

/// Main application state that holds all services.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub user_service: UserService,
    pub profile_service: ProfileService,
    pub entry_service: EntryService,
    pub date_resolver: DateResolver<EntryRepository>,
    pub links: LinkRepository,
}

/// Assemble the application state from an open database connection.
pub fn build_state(db: DbConnection, config: AppConfig) -> AppState {
    AppState {
        config,
        user_service: UserService::new(db.clone()),
        profile_service: ProfileService::new(db.clone()),
        entry_service: EntryService::new(db.clone()),
        date_resolver: DateResolver::new(EntryRepository::new(db.clone())),
        links: LinkRepository::new(db),
    }
}

/// Initialize the backend with all required services.
pub async fn initialize_backend(config: AppConfig) -> Result<AppState> {
    info!("Setting up database");
    let db = DbConnection::new(&config.database_url).await?;

    info!("Setting up domain model");
    let state = build_state(db, config);

    if let (Some(email), Some(password)) = (
        state.config.admin_email.clone(),
        state.config.admin_password.clone(),
    ) {
        state.user_service.ensure_admin(&email, &password).await?;
    }

    Ok(state)
}

/// Create the Axum router with all routes configured.
pub fn create_router(state: AppState) -> Router {
    // CORS setup to allow a browser frontend to make requests
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/auth/register", post(auth_apis::register))
        .route("/auth/login", post(auth_apis::login))
        .route(
            "/profiles",
            get(profile_apis::list_profiles).post(profile_apis::create_profile),
        )
        .route(
            "/profiles/:profile_id",
            put(profile_apis::update_profile).delete(profile_apis::delete_profile),
        )
        .route(
            "/profiles/:profile_id/entries",
            get(entry_apis::list_entries).post(entry_apis::create_entry),
        )
        .route(
            "/profiles/:profile_id/entries/latest",
            get(entry_apis::get_latest_entry),
        )
        .route(
            "/profiles/:profile_id/entries/dates",
            get(entry_apis::get_entry_dates),
        )
        .route(
            "/profiles/:profile_id/entries/by-date",
            get(entry_apis::get_entry_by_date),
        )
        .route(
            "/profiles/:profile_id/entries/before-date",
            get(entry_apis::get_entry_before_date),
        )
        .route(
            "/profiles/:profile_id/entries/:entry_date",
            axum::routing::delete(entry_apis::delete_entry),
        )
        .route("/admin/users/pending", get(admin_apis::list_pending_users))
        .route("/admin/profiles", get(admin_apis::list_all_profiles))
        .route(
            "/admin/users/:user_id/approve",
            post(admin_apis::approve_user),
        )
        .route(
            "/admin/users/:user_id/reject",
            post(admin_apis::reject_user),
        );

    Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(state)
}
