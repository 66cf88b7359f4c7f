//! # REST API for Admin User Management
//!
//! All handlers require the admin role via [`RequireAdmin`].

use axum::extract::{Path, State};
use axum::Json;
use tracing::info;

use shared::{
    ApproveUserRequest, ApproveUserResponse, PendingUsersResponse, ProfileListResponse,
    RejectUserResponse,
};

use crate::domain::user_service::ApprovalOutcome;
use crate::io::auth::RequireAdmin;
use crate::io::error::{ApiError, ApiResult};
use crate::AppState;

/// GET /api/admin/users/pending
pub async fn list_pending_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> ApiResult<Json<PendingUsersResponse>> {
    let users = state.user_service.pending_users().await?;
    Ok(Json(PendingUsersResponse { users }))
}

/// GET /api/admin/profiles
///
/// Every profile, for assembling approval grants.
pub async fn list_all_profiles(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> ApiResult<Json<ProfileListResponse>> {
    let profiles = state.profile_service.all_profiles().await?;
    Ok(Json(ProfileListResponse { profiles }))
}

/// POST /api/admin/users/:user_id/approve
pub async fn approve_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(user_id): Path<String>,
    Json(request): Json<ApproveUserRequest>,
) -> ApiResult<Json<ApproveUserResponse>> {
    info!(
        "Admin {} approving user {} as {:?}",
        admin.user_id, user_id, request.role
    );

    let outcome = state
        .user_service
        .approve_user(&user_id, request.role.into(), &request.profile_links)
        .await?;

    match outcome {
        ApprovalOutcome::Approved {
            user,
            links_created,
        } => {
            let success_message = format!("User {} approved", user.email);
            Ok(Json(ApproveUserResponse {
                user,
                links_created,
                success_message,
            }))
        }
        ApprovalOutcome::UserNotFound => Err(ApiError::NotFound { entity: "User" }),
        ApprovalOutcome::UnknownProfile(profile_id) => Err(ApiError::Validation(format!(
            "Unknown profile id: {}",
            profile_id
        ))),
    }
}

/// POST /api/admin/users/:user_id/reject
pub async fn reject_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(user_id): Path<String>,
) -> ApiResult<Json<RejectUserResponse>> {
    info!("Admin {} rejecting user {}", admin.user_id, user_id);

    let user = state
        .user_service
        .reject_user(&user_id)
        .await?
        .ok_or(ApiError::NotFound { entity: "User" })?;
    let success_message = format!("User {} rejected", user.email);

    Ok(Json(RejectUserResponse {
        user,
        success_message,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::io::auth::AuthUser;
    use crate::storage::db::DbConnection;
    use shared::{ApprovalRole, LinkPermission, ProfileLinkGrant, UserRole};

    fn test_config() -> AppConfig {
        AppConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            database_url: "sqlite::memory:".to_string(),
            jwt_secret: "test-secret-that-is-long-enough".to_string(),
            token_expiry_hours: 24,
            admin_email: None,
            admin_password: None,
        }
    }

    async fn setup_test_state() -> AppState {
        let db = DbConnection::init_test().await.unwrap();
        let state = crate::build_state(db, test_config());
        state
            .user_service
            .ensure_admin("root@example.com", "admin-password")
            .await
            .unwrap();
        state
    }

    fn admin() -> RequireAdmin {
        RequireAdmin(AuthUser {
            user_id: "admin".to_string(),
            role: UserRole::Admin,
        })
    }

    #[tokio::test]
    async fn test_approval_flow() {
        let state = setup_test_state().await;

        let pending = state
            .user_service
            .register("alice@example.com", "correct-horse")
            .await
            .unwrap()
            .unwrap();
        let profile = state
            .profile_service
            .create_profile("Family", "admin", true)
            .await
            .unwrap();

        let listed = list_pending_users(State(state.clone()), admin())
            .await
            .unwrap();
        assert_eq!(listed.0.users.len(), 1);
        assert_eq!(listed.0.users[0].email, "alice@example.com");

        let response = approve_user(
            State(state.clone()),
            admin(),
            Path(pending.id.clone()),
            Json(ApproveUserRequest {
                role: ApprovalRole::Approved,
                profile_links: vec![ProfileLinkGrant {
                    profile_id: profile.id,
                    permission: LinkPermission::Read,
                }],
            }),
        )
        .await
        .unwrap();

        assert_eq!(response.0.user.role, UserRole::Approved);
        assert_eq!(response.0.links_created, 1);

        // The pending queue is now empty.
        let listed = list_pending_users(State(state), admin()).await.unwrap();
        assert!(listed.0.users.is_empty());
    }

    #[tokio::test]
    async fn test_approve_unknown_user() {
        let state = setup_test_state().await;

        let result = approve_user(
            State(state),
            admin(),
            Path("missing".to_string()),
            Json(ApproveUserRequest {
                role: ApprovalRole::Approved,
                profile_links: vec![],
            }),
        )
        .await;

        assert!(matches!(result, Err(ApiError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_approve_with_unknown_profile_link() {
        let state = setup_test_state().await;

        let pending = state
            .user_service
            .register("alice@example.com", "correct-horse")
            .await
            .unwrap()
            .unwrap();

        let result = approve_user(
            State(state),
            admin(),
            Path(pending.id),
            Json(ApproveUserRequest {
                role: ApprovalRole::Approved,
                profile_links: vec![ProfileLinkGrant {
                    profile_id: "missing".to_string(),
                    permission: LinkPermission::Edit,
                }],
            }),
        )
        .await;

        match result {
            Err(ApiError::Validation(msg)) => assert!(msg.contains("missing")),
            other => panic!("expected Validation, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_reject_user() {
        let state = setup_test_state().await;

        let pending = state
            .user_service
            .register("alice@example.com", "correct-horse")
            .await
            .unwrap()
            .unwrap();

        let response = reject_user(State(state), admin(), Path(pending.id))
            .await
            .unwrap();
        assert_eq!(response.0.user.role, UserRole::Rejected);
    }

    #[tokio::test]
    async fn test_list_all_profiles() {
        let state = setup_test_state().await;

        state
            .profile_service
            .create_profile("Personal", "admin", true)
            .await
            .unwrap();
        state
            .profile_service
            .create_profile("Family", "admin", true)
            .await
            .unwrap();

        let response = list_all_profiles(State(state), admin()).await.unwrap();
        assert_eq!(response.0.profiles.len(), 2);
    }
}
