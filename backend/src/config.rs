/// Server configuration loaded from environment variables.
///
/// All fields except `JWT_SECRET` have defaults suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Bind address (default: `127.0.0.1`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// SQLite database URL (default: `sqlite:networth.db`).
    pub database_url: String,
    /// HMAC-SHA256 secret used to sign and verify bearer tokens.
    pub jwt_secret: String,
    /// Access token lifetime in hours (default: `24`).
    pub token_expiry_hours: i64,
    /// Optional bootstrap admin account, created at startup when absent.
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var            | Required | Default              |
    /// |--------------------|----------|----------------------|
    /// | `HOST`             | no       | `127.0.0.1`          |
    /// | `PORT`             | no       | `3000`               |
    /// | `DATABASE_URL`     | no       | `sqlite:networth.db` |
    /// | `JWT_SECRET`       | **yes**  | --                   |
    /// | `JWT_EXPIRY_HOURS` | no       | `24`                 |
    /// | `ADMIN_EMAIL`      | no       | --                   |
    /// | `ADMIN_PASSWORD`   | no       | --                   |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:networth.db".into());

        let jwt_secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!jwt_secret.is_empty(), "JWT_SECRET must not be empty");

        let token_expiry_hours: i64 = std::env::var("JWT_EXPIRY_HOURS")
            .unwrap_or_else(|_| "24".into())
            .parse()
            .expect("JWT_EXPIRY_HOURS must be a valid i64");

        let admin_email = std::env::var("ADMIN_EMAIL").ok();
        let admin_password = std::env::var("ADMIN_PASSWORD").ok();

        Self {
            host,
            port,
            database_url,
            jwt_secret,
            token_expiry_hours,
            admin_email,
            admin_password,
        }
    }
}
