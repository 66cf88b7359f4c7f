//! # REST API Interface Layer
//!
//! HTTP endpoints for the net-worth tracker. This layer handles:
//! - Request/response serialization
//! - Input validation before domain-layer processing
//! - Composing authentication, the access policy, and the domain services
//! - Error translation to HTTP status codes

pub mod admin_apis;
pub mod auth_apis;
pub mod entry_apis;
pub mod profile_apis;

use shared::{LinkPermission, UserRole};

use crate::domain::access_policy::{self, AccessDecision};
use crate::io::auth::AuthUser;
use crate::io::error::ApiError;
use crate::storage::traits::LinkStorage;
use crate::AppState;

/// Run the access policy for a profile-scoped request.
///
/// Performs the link lookup the pure policy needs; admins skip it
/// entirely. A denial surfaces as a 403 carrying the policy's reason.
pub(crate) async fn authorize_profile_access(
    state: &AppState,
    user: &AuthUser,
    profile_id: &str,
    required: LinkPermission,
) -> Result<(), ApiError> {
    let link = if user.role == UserRole::Admin {
        None
    } else {
        state
            .links
            .get_link(&user.user_id, profile_id)
            .await
            .map_err(ApiError::Internal)?
            .map(|link| link.permission)
    };

    match access_policy::authorize(user.role, link, required) {
        AccessDecision::Allowed => Ok(()),
        AccessDecision::Denied(reason) => Err(ApiError::Forbidden(reason)),
    }
}
