//! # REST API for Authentication
//!
//! Registration creates a `pending` account that an admin must approve;
//! both endpoints return a bearer token so a freshly registered user can
//! poll their own approval state.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracing::info;

use shared::{AuthResponse, LoginRequest, RegisterRequest};

use crate::io::auth::generate_token;
use crate::io::error::{ApiError, ApiResult};
use crate::AppState;

/// Minimum password length enforced on registration.
const MIN_PASSWORD_LENGTH: usize = 8;

fn validate_credentials(email: &str, password: &str) -> Result<String, ApiError> {
    let email = email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(ApiError::Validation(
            "A valid email address is required".to_string(),
        ));
    }
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(ApiError::Validation(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LENGTH
        )));
    }
    Ok(email)
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let email = validate_credentials(&request.email, &request.password)?;

    let user = state
        .user_service
        .register(&email, &request.password)
        .await?
        .ok_or_else(|| {
            ApiError::Conflict("An account with this email already exists".to_string())
        })?;

    let token = generate_token(&user.id, &state.config)
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("Token generation failed: {}", e)))?;

    info!("Registered {}", user.email);
    Ok((StatusCode::CREATED, Json(AuthResponse { token, user })))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let email = request.email.trim().to_lowercase();

    let user = state
        .user_service
        .verify_login(&email, &request.password)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    let token = generate_token(&user.id, &state.config)
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("Token generation failed: {}", e)))?;

    Ok(Json(AuthResponse { token, user }))
}
