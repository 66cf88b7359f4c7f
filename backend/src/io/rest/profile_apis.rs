//! # REST API for Profiles

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::info;

use shared::{
    CreateProfileRequest, DeleteProfileResponse, LinkPermission, ProfileListResponse,
    ProfileResponse, UpdateProfileRequest, UserRole, MAX_PROFILE_NAME_LENGTH,
};

use crate::io::auth::AuthUser;
use crate::io::error::{ApiError, ApiResult};
use crate::io::rest::authorize_profile_access;
use crate::AppState;

/// Trim and bound-check a profile name.
fn validate_profile_name(name: &str) -> Result<String, ApiError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ApiError::Validation(
            "Profile name must not be empty".to_string(),
        ));
    }
    if trimmed.chars().count() > MAX_PROFILE_NAME_LENGTH {
        return Err(ApiError::Validation(format!(
            "Profile name must be at most {} characters",
            MAX_PROFILE_NAME_LENGTH
        )));
    }
    Ok(trimmed.to_string())
}

/// GET /api/profiles
///
/// The profiles visible to the principal: all of them for admins, linked
/// profiles for everyone else.
pub async fn list_profiles(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<ProfileListResponse>> {
    let profiles = state
        .profile_service
        .profiles_for_principal(&user.user_id, user.role == UserRole::Admin)
        .await?;
    Ok(Json(ProfileListResponse { profiles }))
}

/// POST /api/profiles
pub async fn create_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<CreateProfileRequest>,
) -> ApiResult<(StatusCode, Json<ProfileResponse>)> {
    if !matches!(user.role, UserRole::Admin | UserRole::Approved) {
        return Err(ApiError::Forbidden("account is not approved".to_string()));
    }
    let name = validate_profile_name(&request.name)?;

    info!("POST /api/profiles - name: {}", name);
    let profile = state
        .profile_service
        .create_profile(&name, &user.user_id, user.role == UserRole::Admin)
        .await?;
    let success_message = format!("Profile '{}' created", profile.name);

    Ok((
        StatusCode::CREATED,
        Json(ProfileResponse {
            profile,
            success_message,
        }),
    ))
}

/// PUT /api/profiles/:profile_id
pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Path(profile_id): Path<String>,
    Json(request): Json<UpdateProfileRequest>,
) -> ApiResult<Json<ProfileResponse>> {
    authorize_profile_access(&state, &user, &profile_id, LinkPermission::Edit).await?;
    let name = validate_profile_name(&request.name)?;

    let profile = state
        .profile_service
        .rename_profile(&profile_id, &name)
        .await?
        .ok_or(ApiError::NotFound { entity: "Profile" })?;
    let success_message = format!("Profile renamed to '{}'", profile.name);

    Ok(Json(ProfileResponse {
        profile,
        success_message,
    }))
}

/// DELETE /api/profiles/:profile_id
///
/// Entries and links cascade with the profile.
pub async fn delete_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Path(profile_id): Path<String>,
) -> ApiResult<Json<DeleteProfileResponse>> {
    authorize_profile_access(&state, &user, &profile_id, LinkPermission::Edit).await?;

    if !state.profile_service.delete_profile(&profile_id).await? {
        return Err(ApiError::NotFound { entity: "Profile" });
    }

    Ok(Json(DeleteProfileResponse {
        success_message: "Profile deleted".to_string(),
    }))
}
