//! User account domain logic: registration, login verification, and the
//! admin approval workflow.
//!
//! Password hashes use Argon2id with a random salt in PHC string format,
//! so algorithm parameters travel with the hash.

use anyhow::Result;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use shared::{ProfileLink, ProfileLinkGrant, UserProfile, UserRole};
use tracing::{info, warn};

use crate::storage::db::DbConnection;
use crate::storage::link_repository::LinkRepository;
use crate::storage::profile_repository::ProfileRepository;
use crate::storage::traits::{LinkStorage, ProfileStorage, UserStorage};
use crate::storage::user_repository::UserRepository;

/// Outcome of an admin approval request.
#[derive(Debug, Clone, PartialEq)]
pub enum ApprovalOutcome {
    Approved {
        user: UserProfile,
        links_created: usize,
    },
    UserNotFound,
    UnknownProfile(String),
}

#[derive(Clone)]
pub struct UserService {
    users: UserRepository,
    links: LinkRepository,
    profiles: ProfileRepository,
}

impl UserService {
    pub fn new(db: DbConnection) -> Self {
        Self {
            users: UserRepository::new(db.clone()),
            links: LinkRepository::new(db.clone()),
            profiles: ProfileRepository::new(db),
        }
    }

    /// Register a new account with role `pending`.
    /// Returns None when the email is already taken.
    pub async fn register(&self, email: &str, password: &str) -> Result<Option<UserProfile>> {
        if self.users.find_user_by_email(email).await?.is_some() {
            return Ok(None);
        }

        let password_hash = hash_password(password)?;
        let now = chrono::Utc::now().to_rfc3339();
        let user = UserProfile {
            id: uuid::Uuid::new_v4().to_string(),
            email: email.to_string(),
            role: UserRole::Pending,
            created_at: now.clone(),
            updated_at: now,
        };
        self.users.store_user(&user, &password_hash).await?;

        info!("Registered user {} awaiting approval", user.email);
        Ok(Some(user))
    }

    /// Verify login credentials.
    /// Returns None on unknown email or wrong password; the two cases are
    /// indistinguishable to the caller.
    pub async fn verify_login(&self, email: &str, password: &str) -> Result<Option<UserProfile>> {
        let Some((user, stored_hash)) = self.users.get_credentials(email).await? else {
            return Ok(None);
        };

        if verify_password(password, &stored_hash)? {
            Ok(Some(user))
        } else {
            warn!("Failed login attempt for {}", email);
            Ok(None)
        }
    }

    pub async fn get_user(&self, user_id: &str) -> Result<Option<UserProfile>> {
        self.users.get_user(user_id).await
    }

    /// Users awaiting approval, oldest first.
    pub async fn pending_users(&self) -> Result<Vec<UserProfile>> {
        self.users.list_users_with_role(UserRole::Pending).await
    }

    /// Approve a user into `role`, creating the requested profile links.
    ///
    /// Every grant must name an existing profile; on an unknown profile id
    /// nothing is changed. Zero grants is valid: the user starts without
    /// profile access and is expected to create their own profile.
    pub async fn approve_user(
        &self,
        user_id: &str,
        role: UserRole,
        grants: &[ProfileLinkGrant],
    ) -> Result<ApprovalOutcome> {
        for grant in grants {
            if self.profiles.get_profile(&grant.profile_id).await?.is_none() {
                return Ok(ApprovalOutcome::UnknownProfile(grant.profile_id.clone()));
            }
        }

        let Some(user) = self.users.update_user_role(user_id, role).await? else {
            return Ok(ApprovalOutcome::UserNotFound);
        };

        let now = chrono::Utc::now().to_rfc3339();
        for grant in grants {
            self.links
                .store_link(&ProfileLink {
                    user_id: user_id.to_string(),
                    profile_id: grant.profile_id.clone(),
                    permission: grant.permission,
                    created_at: now.clone(),
                })
                .await?;
        }

        info!(
            "Approved user {} as {} with {} profile link(s)",
            user.email,
            role,
            grants.len()
        );
        Ok(ApprovalOutcome::Approved {
            user,
            links_created: grants.len(),
        })
    }

    /// Reject a user. Returns the updated user, or None if absent.
    pub async fn reject_user(&self, user_id: &str) -> Result<Option<UserProfile>> {
        let user = self.users.update_user_role(user_id, UserRole::Rejected).await?;
        if let Some(user) = &user {
            info!("Rejected user {}", user.email);
        }
        Ok(user)
    }

    /// Create an admin account at startup unless the email already exists.
    pub async fn ensure_admin(&self, email: &str, password: &str) -> Result<()> {
        if self.users.find_user_by_email(email).await?.is_some() {
            return Ok(());
        }

        let password_hash = hash_password(password)?;
        let now = chrono::Utc::now().to_rfc3339();
        let user = UserProfile {
            id: uuid::Uuid::new_v4().to_string(),
            email: email.to_string(),
            role: UserRole::Admin,
            created_at: now.clone(),
            updated_at: now,
        };
        self.users.store_user(&user, &password_hash).await?;

        info!("Bootstrapped admin account {}", email);
        Ok(())
    }
}

/// Hash a plaintext password using Argon2id with a random salt.
fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Password hashing failed: {}", e))?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC-formatted hash.
fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| anyhow::anyhow!("Corrupt password hash: {}", e))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(anyhow::anyhow!("Password verification failed: {}", e)),
    }
}
