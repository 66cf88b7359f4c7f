//! # Storage Traits
//!
//! Storage abstraction traits that let the domain layer work against
//! different backends (or test doubles) without modification.

use anyhow::Result;
use async_trait::async_trait;
use shared::{Entry, Profile, ProfileLink, UserProfile, UserRole};

/// Interface for entry storage operations.
///
/// All lookups are scoped to one profile; `entry_date` is unique per
/// profile, so date-keyed operations address at most one row.
#[async_trait]
pub trait EntryStorage: Send + Sync {
    /// Insert an entry, replacing any existing entry for the same
    /// `(profile_id, entry_date)`. Returns the stored row (the original
    /// id and created_at are preserved on re-insertion).
    async fn upsert_entry(&self, entry: &Entry) -> Result<Entry>;

    /// Retrieve the entry for an exact calendar day, if any.
    async fn get_entry_by_date(&self, profile_id: &str, date: &str) -> Result<Option<Entry>>;

    /// Retrieve the entry with the maximum date strictly before `date`.
    async fn get_entry_before_date(&self, profile_id: &str, date: &str) -> Result<Option<Entry>>;

    /// Retrieve the most recent entry for the profile.
    async fn get_latest_entry(&self, profile_id: &str) -> Result<Option<Entry>>;

    /// List all entries for the profile, descending by date.
    async fn list_entries(&self, profile_id: &str) -> Result<Vec<Entry>>;

    /// List all entry dates for the profile, descending.
    async fn list_entry_dates(&self, profile_id: &str) -> Result<Vec<String>>;

    /// Delete the entry for a calendar day.
    /// Returns true if a row was found and deleted.
    async fn delete_entry(&self, profile_id: &str, date: &str) -> Result<bool>;
}

/// Interface for profile storage operations.
#[async_trait]
pub trait ProfileStorage: Send + Sync {
    /// Store a new profile.
    async fn store_profile(&self, profile: &Profile) -> Result<()>;

    /// Retrieve a profile by id.
    async fn get_profile(&self, profile_id: &str) -> Result<Option<Profile>>;

    /// List all profiles ordered by name.
    async fn list_profiles(&self) -> Result<Vec<Profile>>;

    /// List the profiles a user holds a link to, ordered by name.
    async fn list_profiles_for_user(&self, user_id: &str) -> Result<Vec<Profile>>;

    /// Update an existing profile.
    async fn update_profile(&self, profile: &Profile) -> Result<()>;

    /// Delete a profile. Entries and links cascade.
    /// Returns true if a row was found and deleted.
    async fn delete_profile(&self, profile_id: &str) -> Result<bool>;
}

/// Interface for user account storage operations.
#[async_trait]
pub trait UserStorage: Send + Sync {
    /// Store a new user with its password hash.
    async fn store_user(&self, user: &UserProfile, password_hash: &str) -> Result<()>;

    /// Retrieve a user by id.
    async fn get_user(&self, user_id: &str) -> Result<Option<UserProfile>>;

    /// Retrieve a user by email.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserProfile>>;

    /// Retrieve a user and its stored password hash, for login verification.
    async fn get_credentials(&self, email: &str) -> Result<Option<(UserProfile, String)>>;

    /// List users holding a given role, oldest first.
    async fn list_users_with_role(&self, role: UserRole) -> Result<Vec<UserProfile>>;

    /// Change a user's role. Returns the updated user, or None if absent.
    async fn update_user_role(&self, user_id: &str, role: UserRole) -> Result<Option<UserProfile>>;
}

/// Interface for profile link storage operations.
#[async_trait]
pub trait LinkStorage: Send + Sync {
    /// Store a link, replacing any existing link for the same
    /// `(user_id, profile_id)`.
    async fn store_link(&self, link: &ProfileLink) -> Result<()>;

    /// Retrieve the link for a `(user, profile)` pair, if any.
    async fn get_link(&self, user_id: &str, profile_id: &str) -> Result<Option<ProfileLink>>;

    /// List all links held by a user.
    async fn list_links_for_user(&self, user_id: &str) -> Result<Vec<ProfileLink>>;
}
