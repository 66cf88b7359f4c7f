//! SQLite repository for profiles.

use anyhow::Result;
use async_trait::async_trait;
use shared::Profile;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::storage::db::DbConnection;
use crate::storage::traits::ProfileStorage;

#[derive(Clone)]
pub struct ProfileRepository {
    db: DbConnection,
}

impl ProfileRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }
}

fn profile_from_row(row: &SqliteRow) -> Profile {
    Profile {
        id: row.get("id"),
        name: row.get("name"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait]
impl ProfileStorage for ProfileRepository {
    async fn store_profile(&self, profile: &Profile) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO profiles (id, name, created_at, updated_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&profile.id)
        .bind(&profile.name)
        .bind(&profile.created_at)
        .bind(&profile.updated_at)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn get_profile(&self, profile_id: &str) -> Result<Option<Profile>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, created_at, updated_at
            FROM profiles
            WHERE id = ?
            "#,
        )
        .bind(profile_id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.as_ref().map(profile_from_row))
    }

    async fn list_profiles(&self) -> Result<Vec<Profile>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, created_at, updated_at
            FROM profiles
            ORDER BY name ASC
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.iter().map(profile_from_row).collect())
    }

    async fn list_profiles_for_user(&self, user_id: &str) -> Result<Vec<Profile>> {
        let rows = sqlx::query(
            r#"
            SELECT p.id, p.name, p.created_at, p.updated_at
            FROM profiles p
            INNER JOIN profile_links l ON l.profile_id = p.id
            WHERE l.user_id = ?
            ORDER BY p.name ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.iter().map(profile_from_row).collect())
    }

    async fn update_profile(&self, profile: &Profile) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE profiles
            SET name = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&profile.name)
        .bind(&profile.updated_at)
        .bind(&profile.id)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn delete_profile(&self, profile_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM profiles WHERE id = ?")
            .bind(profile_id)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
