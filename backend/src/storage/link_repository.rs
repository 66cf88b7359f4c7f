//! SQLite repository for per-profile access links.

use anyhow::Result;
use async_trait::async_trait;
use shared::{LinkPermission, ProfileLink};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::storage::db::DbConnection;
use crate::storage::traits::LinkStorage;

#[derive(Clone)]
pub struct LinkRepository {
    db: DbConnection,
}

impl LinkRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }
}

fn link_from_row(row: &SqliteRow) -> Result<ProfileLink> {
    let permission: String = row.get("permission");
    Ok(ProfileLink {
        user_id: row.get("user_id"),
        profile_id: row.get("profile_id"),
        permission: permission
            .parse::<LinkPermission>()
            .map_err(|e| anyhow::anyhow!("Corrupt permission column: {}", e))?,
        created_at: row.get("created_at"),
    })
}

#[async_trait]
impl LinkStorage for LinkRepository {
    async fn store_link(&self, link: &ProfileLink) -> Result<()> {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO profile_links (user_id, profile_id, permission, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&link.user_id)
        .bind(&link.profile_id)
        .bind(link.permission.as_str())
        .bind(&link.created_at)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn get_link(&self, user_id: &str, profile_id: &str) -> Result<Option<ProfileLink>> {
        let row = sqlx::query(
            r#"
            SELECT user_id, profile_id, permission, created_at
            FROM profile_links
            WHERE user_id = ? AND profile_id = ?
            "#,
        )
        .bind(user_id)
        .bind(profile_id)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(link_from_row).transpose()
    }

    async fn list_links_for_user(&self, user_id: &str) -> Result<Vec<ProfileLink>> {
        let rows = sqlx::query(
            r#"
            SELECT user_id, profile_id, permission, created_at
            FROM profile_links
            WHERE user_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(link_from_row).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::profile_repository::ProfileRepository;
    use crate::storage::traits::{ProfileStorage, UserStorage};
    use crate::storage::user_repository::UserRepository;
    use shared::{Profile, UserProfile, UserRole};

    async fn setup_test() -> (LinkRepository, UserRepository, ProfileRepository) {
        let db = DbConnection::init_test()
            .await
            .expect("Failed to create test database");
        (
            LinkRepository::new(db.clone()),
            UserRepository::new(db.clone()),
            ProfileRepository::new(db),
        )
    }

    async fn seed(users: &UserRepository, profiles: &ProfileRepository) {
        let user = UserProfile {
            id: "u1".to_string(),
            email: "alice@example.com".to_string(),
            role: UserRole::Approved,
            created_at: "2024-01-01T00:00:00Z".to_string(),
            updated_at: "2024-01-01T00:00:00Z".to_string(),
        };
        users.store_user(&user, "hash").await.unwrap();

        let profile = Profile {
            id: "p1".to_string(),
            name: "Personal".to_string(),
            created_at: "2024-01-01T00:00:00Z".to_string(),
            updated_at: "2024-01-01T00:00:00Z".to_string(),
        };
        profiles.store_profile(&profile).await.unwrap();
    }

    fn test_link(permission: LinkPermission) -> ProfileLink {
        ProfileLink {
            user_id: "u1".to_string(),
            profile_id: "p1".to_string(),
            permission,
            created_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    #[tokio::test]
    async fn test_store_and_get_link() {
        let (links, users, profiles) = setup_test().await;
        seed(&users, &profiles).await;

        links.store_link(&test_link(LinkPermission::Read)).await.unwrap();

        let link = links.get_link("u1", "p1").await.unwrap().unwrap();
        assert_eq!(link.permission, LinkPermission::Read);

        assert!(links.get_link("u1", "other").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_store_link_replaces_permission() {
        let (links, users, profiles) = setup_test().await;
        seed(&users, &profiles).await;

        links.store_link(&test_link(LinkPermission::Read)).await.unwrap();
        links.store_link(&test_link(LinkPermission::Edit)).await.unwrap();

        let link = links.get_link("u1", "p1").await.unwrap().unwrap();
        assert_eq!(link.permission, LinkPermission::Edit);

        let all = links.list_links_for_user("u1").await.unwrap();
        assert_eq!(all.len(), 1, "one link per (user, profile) pair");
    }

    #[tokio::test]
    async fn test_profile_delete_cascades_to_links() {
        let (links, users, profiles) = setup_test().await;
        seed(&users, &profiles).await;

        links.store_link(&test_link(LinkPermission::Edit)).await.unwrap();
        assert!(profiles.delete_profile("p1").await.unwrap());

        assert!(links.get_link("u1", "p1").await.unwrap().is_none());
    }
}
