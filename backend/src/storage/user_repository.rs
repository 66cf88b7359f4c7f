//! SQLite repository for user accounts.
//!
//! The password hash is stored alongside the account row but only ever
//! leaves this module through [`UserStorage::get_credentials`].

use anyhow::Result;
use async_trait::async_trait;
use shared::{UserProfile, UserRole};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::storage::db::DbConnection;
use crate::storage::traits::UserStorage;

#[derive(Clone)]
pub struct UserRepository {
    db: DbConnection,
}

impl UserRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }
}

fn user_from_row(row: &SqliteRow) -> Result<UserProfile> {
    let role: String = row.get("role");
    Ok(UserProfile {
        id: row.get("id"),
        email: row.get("email"),
        role: role
            .parse::<UserRole>()
            .map_err(|e| anyhow::anyhow!("Corrupt role column: {}", e))?,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

#[async_trait]
impl UserStorage for UserRepository {
    async fn store_user(&self, user: &UserProfile, password_hash: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, role, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(password_hash)
        .bind(user.role.as_str())
        .bind(&user.created_at)
        .bind(&user.updated_at)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<UserProfile>> {
        let row = sqlx::query(
            r#"
            SELECT id, email, role, created_at, updated_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(user_id)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserProfile>> {
        let row = sqlx::query(
            r#"
            SELECT id, email, role, created_at, updated_at
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn get_credentials(&self, email: &str) -> Result<Option<(UserProfile, String)>> {
        let row = sqlx::query(
            r#"
            SELECT id, email, password_hash, role, created_at, updated_at
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(self.db.pool())
        .await?;

        match row {
            Some(row) => {
                let hash: String = row.get("password_hash");
                Ok(Some((user_from_row(&row)?, hash)))
            }
            None => Ok(None),
        }
    }

    async fn list_users_with_role(&self, role: UserRole) -> Result<Vec<UserProfile>> {
        let rows = sqlx::query(
            r#"
            SELECT id, email, role, created_at, updated_at
            FROM users
            WHERE role = ?
            ORDER BY created_at ASC
            "#,
        )
        .bind(role.as_str())
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(user_from_row).collect()
    }

    async fn update_user_role(&self, user_id: &str, role: UserRole) -> Result<Option<UserProfile>> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET role = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(role.as_str())
        .bind(chrono::Utc::now().to_rfc3339())
        .bind(user_id)
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_user(user_id).await
    }
}
