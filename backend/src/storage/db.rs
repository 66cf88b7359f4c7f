use anyhow::Result;
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};
use std::sync::Arc;

/// DbConnection manages the SQLite pool and schema bootstrap.
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Create a new database connection, creating the database and schema
    /// if they do not exist.
    pub async fn new(url: &str) -> Result<Self> {
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            Sqlite::create_database(url).await?
        }

        let pool = SqlitePool::connect(url).await?;

        Self::setup_schema(&pool).await?;

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Initialize a test database with a unique in-memory name.
    pub async fn init_test() -> Result<Self> {
        let test_id = uuid::Uuid::new_v4().to_string();
        let db_url = format!("file:memdb_{}?mode=memory&cache=shared", test_id);

        Self::new(&db_url).await
    }

    /// The underlying connection pool, for repository queries.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Set up the required database schema
    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                role TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS profiles (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_profiles_name
            ON profiles(name);
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS entries (
                id TEXT PRIMARY KEY,
                profile_id TEXT NOT NULL,
                entry_date TEXT NOT NULL,
                cash REAL NOT NULL DEFAULT 0,
                checking REAL NOT NULL DEFAULT 0,
                savings REAL NOT NULL DEFAULT 0,
                fixed_deposits REAL NOT NULL DEFAULT 0,
                brokerage REAL NOT NULL DEFAULT 0,
                stocks REAL NOT NULL DEFAULT 0,
                bonds REAL NOT NULL DEFAULT 0,
                mutual_funds REAL NOT NULL DEFAULT 0,
                etfs REAL NOT NULL DEFAULT 0,
                retirement REAL NOT NULL DEFAULT 0,
                pension REAL NOT NULL DEFAULT 0,
                crypto REAL NOT NULL DEFAULT 0,
                gold REAL NOT NULL DEFAULT 0,
                real_estate REAL NOT NULL DEFAULT 0,
                vehicles REAL NOT NULL DEFAULT 0,
                collectibles REAL NOT NULL DEFAULT 0,
                receivables REAL NOT NULL DEFAULT 0,
                other_assets REAL NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                UNIQUE (profile_id, entry_date),
                FOREIGN KEY (profile_id) REFERENCES profiles (id) ON DELETE CASCADE
            );
            "#,
        )
        .execute(pool)
        .await?;

        // Serves both the exact lookup and the descending before-date scan.
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_entries_profile_date
            ON entries(profile_id, entry_date DESC);
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS profile_links (
                user_id TEXT NOT NULL,
                profile_id TEXT NOT NULL,
                permission TEXT NOT NULL,
                created_at TEXT NOT NULL,
                PRIMARY KEY (user_id, profile_id),
                FOREIGN KEY (user_id) REFERENCES users (id) ON DELETE CASCADE,
                FOREIGN KEY (profile_id) REFERENCES profiles (id) ON DELETE CASCADE
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_profile_links_profile
            ON profile_links(profile_id);
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}
