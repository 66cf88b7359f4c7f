//! Profile service domain logic.

use anyhow::Result;
use shared::{LinkPermission, Profile, ProfileLink};
use tracing::info;

use crate::storage::db::DbConnection;
use crate::storage::link_repository::LinkRepository;
use crate::storage::profile_repository::ProfileRepository;
use crate::storage::traits::{LinkStorage, ProfileStorage};

#[derive(Clone)]
pub struct ProfileService {
    profiles: ProfileRepository,
    links: LinkRepository,
}

impl ProfileService {
    pub fn new(db: DbConnection) -> Self {
        Self {
            profiles: ProfileRepository::new(db.clone()),
            links: LinkRepository::new(db),
        }
    }

    /// Create a profile.
    ///
    /// A non-admin creator receives an `edit` link to the new profile,
    /// otherwise an approved user who created a profile could not reach
    /// it. Admins bypass links and get none.
    pub async fn create_profile(
        &self,
        name: &str,
        creator_id: &str,
        creator_is_admin: bool,
    ) -> Result<Profile> {
        let now = chrono::Utc::now().to_rfc3339();
        let profile = Profile {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            created_at: now.clone(),
            updated_at: now.clone(),
        };
        self.profiles.store_profile(&profile).await?;

        if !creator_is_admin {
            self.links
                .store_link(&ProfileLink {
                    user_id: creator_id.to_string(),
                    profile_id: profile.id.clone(),
                    permission: LinkPermission::Edit,
                    created_at: now,
                })
                .await?;
        }

        info!("Created profile {} ({})", profile.name, profile.id);
        Ok(profile)
    }

    pub async fn get_profile(&self, profile_id: &str) -> Result<Option<Profile>> {
        self.profiles.get_profile(profile_id).await
    }

    /// Rename a profile. Returns the updated row, or None if absent.
    pub async fn rename_profile(&self, profile_id: &str, name: &str) -> Result<Option<Profile>> {
        let Some(mut profile) = self.profiles.get_profile(profile_id).await? else {
            return Ok(None);
        };

        profile.name = name.to_string();
        profile.updated_at = chrono::Utc::now().to_rfc3339();
        self.profiles.update_profile(&profile).await?;

        Ok(Some(profile))
    }

    /// Delete a profile; entries and links cascade.
    /// Returns true if a row was found and deleted.
    pub async fn delete_profile(&self, profile_id: &str) -> Result<bool> {
        let deleted = self.profiles.delete_profile(profile_id).await?;
        if deleted {
            info!("Deleted profile {}", profile_id);
        }
        Ok(deleted)
    }

    /// The profiles visible to a principal: every profile for admins,
    /// linked profiles for everyone else.
    pub async fn profiles_for_principal(
        &self,
        user_id: &str,
        is_admin: bool,
    ) -> Result<Vec<Profile>> {
        if is_admin {
            self.profiles.list_profiles().await
        } else {
            self.profiles.list_profiles_for_user(user_id).await
        }
    }

    /// All profiles, for the admin overview.
    pub async fn all_profiles(&self) -> Result<Vec<Profile>> {
        self.profiles.list_profiles().await
    }
}
