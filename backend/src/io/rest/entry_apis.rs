//! # REST API for Entries
//!
//! Date-indexed lookups and writes for a profile's snapshot entries.
//! Every handler authorizes through the access policy before touching
//! data; a missing entry is answered as `200 {entry: null}`, never as an
//! error.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::info;

use shared::{
    is_valid_entry_date, CreateEntryRequest, DeleteEntryResponse, EntryDatesResponse,
    EntryListResponse, EntryLookupResponse, EntryResponse, LinkPermission,
};

use crate::io::auth::AuthUser;
use crate::io::error::{ApiError, ApiResult};
use crate::io::rest::authorize_profile_access;
use crate::AppState;

/// Query parameter for the date-keyed lookups.
#[derive(Debug, Deserialize)]
pub struct DateQuery {
    pub date: String,
}

fn validate_date(date: &str) -> Result<(), ApiError> {
    if is_valid_entry_date(date) {
        Ok(())
    } else {
        Err(ApiError::Validation(format!(
            "Invalid date '{}': expected YYYY-MM-DD",
            date
        )))
    }
}

/// GET /api/profiles/:profile_id/entries/latest
pub async fn get_latest_entry(
    State(state): State<AppState>,
    user: AuthUser,
    Path(profile_id): Path<String>,
) -> ApiResult<Json<EntryLookupResponse>> {
    authorize_profile_access(&state, &user, &profile_id, LinkPermission::Read).await?;

    let entry = state.entry_service.latest_entry(&profile_id).await?;
    Ok(Json(EntryLookupResponse { entry }))
}

/// GET /api/profiles/:profile_id/entries/dates
pub async fn get_entry_dates(
    State(state): State<AppState>,
    user: AuthUser,
    Path(profile_id): Path<String>,
) -> ApiResult<Json<EntryDatesResponse>> {
    authorize_profile_access(&state, &user, &profile_id, LinkPermission::Read).await?;

    let dates = state.date_resolver.list_entry_dates(&profile_id).await?;
    Ok(Json(EntryDatesResponse { dates }))
}

/// GET /api/profiles/:profile_id/entries/by-date?date=YYYY-MM-DD
///
/// Exact-match lookup only; the fallback step is a separate endpoint so
/// the client controller owns the two-step sequencing.
pub async fn get_entry_by_date(
    State(state): State<AppState>,
    user: AuthUser,
    Path(profile_id): Path<String>,
    Query(query): Query<DateQuery>,
) -> ApiResult<Json<EntryLookupResponse>> {
    authorize_profile_access(&state, &user, &profile_id, LinkPermission::Read).await?;
    validate_date(&query.date)?;

    let entry = state.date_resolver.exact_entry(&profile_id, &query.date).await?;
    Ok(Json(EntryLookupResponse { entry }))
}

/// GET /api/profiles/:profile_id/entries/before-date?date=YYYY-MM-DD
///
/// The most recent entry strictly before the given date.
pub async fn get_entry_before_date(
    State(state): State<AppState>,
    user: AuthUser,
    Path(profile_id): Path<String>,
    Query(query): Query<DateQuery>,
) -> ApiResult<Json<EntryLookupResponse>> {
    authorize_profile_access(&state, &user, &profile_id, LinkPermission::Read).await?;
    validate_date(&query.date)?;

    let entry = state.date_resolver.entry_before(&profile_id, &query.date).await?;
    Ok(Json(EntryLookupResponse { entry }))
}

/// GET /api/profiles/:profile_id/entries
pub async fn list_entries(
    State(state): State<AppState>,
    user: AuthUser,
    Path(profile_id): Path<String>,
) -> ApiResult<Json<EntryListResponse>> {
    authorize_profile_access(&state, &user, &profile_id, LinkPermission::Read).await?;

    let entries = state.entry_service.list_entries(&profile_id).await?;
    Ok(Json(EntryListResponse { entries }))
}

/// POST /api/profiles/:profile_id/entries
pub async fn create_entry(
    State(state): State<AppState>,
    user: AuthUser,
    Path(profile_id): Path<String>,
    payload: Result<Json<CreateEntryRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<EntryResponse>)> {
    authorize_profile_access(&state, &user, &profile_id, LinkPermission::Edit).await?;

    // A body missing the required entry_date is a validation failure, not
    // an unprocessable-entity rejection.
    let Json(request) = payload.map_err(|rejection| ApiError::Validation(rejection.body_text()))?;
    info!("POST entries for profile {} on {}", profile_id, request.entry_date);

    validate_date(&request.entry_date)?;
    for (name, value) in request.named_values() {
        if value < 0.0 {
            return Err(ApiError::Validation(format!(
                "Field '{}' must be non-negative",
                name
            )));
        }
    }

    if state.profile_service.get_profile(&profile_id).await?.is_none() {
        return Err(ApiError::NotFound { entity: "Profile" });
    }

    let entry = state.entry_service.create_entry(&profile_id, request).await?;
    let success_message = format!("Entry saved for {}", entry.entry_date);

    Ok((
        StatusCode::CREATED,
        Json(EntryResponse {
            entry,
            success_message,
        }),
    ))
}

/// DELETE /api/profiles/:profile_id/entries/:entry_date
pub async fn delete_entry(
    State(state): State<AppState>,
    user: AuthUser,
    Path((profile_id, entry_date)): Path<(String, String)>,
) -> ApiResult<Json<DeleteEntryResponse>> {
    authorize_profile_access(&state, &user, &profile_id, LinkPermission::Edit).await?;
    validate_date(&entry_date)?;

    let deleted = state.entry_service.delete_entry(&profile_id, &entry_date).await?;
    let success_message = if deleted {
        format!("Entry for {} deleted", entry_date)
    } else {
        format!("No entry exists for {}", entry_date)
    };

    Ok(Json(DeleteEntryResponse {
        deleted,
        success_message,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::storage::db::DbConnection;
    use crate::storage::link_repository::LinkRepository;
    use crate::storage::profile_repository::ProfileRepository;
    use crate::storage::traits::{LinkStorage, ProfileStorage, UserStorage};
    use crate::storage::user_repository::UserRepository;
    use axum::response::IntoResponse;
    use shared::{Profile, ProfileLink, UserProfile, UserRole};

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
        let state = crate::build_state(db.clone(), test_config());

        let users = UserRepository::new(db.clone());
        let profiles = ProfileRepository::new(db.clone());
        let links = LinkRepository::new(db);

        for (id, role) in [
            ("admin", UserRole::Admin),
            ("reader", UserRole::Approved),
            ("editor", UserRole::Approved),
            ("stranger", UserRole::Approved),
        ] {
            users
                .store_user(
                    &UserProfile {
                        id: id.to_string(),
                        email: format!("{}@example.com", id),
                        role,
                        created_at: "2024-01-01T00:00:00Z".to_string(),
                        updated_at: "2024-01-01T00:00:00Z".to_string(),
                    },
                    "hash",
                )
                .await
                .unwrap();
        }

        profiles
            .store_profile(&Profile {
                id: "p1".to_string(),
                name: "Personal".to_string(),
                created_at: "2024-01-01T00:00:00Z".to_string(),
                updated_at: "2024-01-01T00:00:00Z".to_string(),
            })
            .await
            .unwrap();

        for (user_id, permission) in [
            ("reader", LinkPermission::Read),
            ("editor", LinkPermission::Edit),
        ] {
            links
                .store_link(&ProfileLink {
                    user_id: user_id.to_string(),
                    profile_id: "p1".to_string(),
                    permission,
                    created_at: "2024-01-01T00:00:00Z".to_string(),
                })
                .await
                .unwrap();
        }

        state
    }

    fn auth(user_id: &str, role: UserRole) -> AuthUser {
        AuthUser {
            user_id: user_id.to_string(),
            role,
        }
    }

    fn entry_request(date: &str, cash: f64) -> CreateEntryRequest {
        serde_json::from_value(serde_json::json!({ "entry_date": date, "cash": cash })).unwrap()
    }

    #[tokio::test]
    async fn test_create_entry_requires_edit_permission() {
        let state = setup_test_state().await;

        let result = create_entry(
            State(state),
            auth("reader", UserRole::Approved),
            Path("p1".to_string()),
            Ok(Json(entry_request("2024-01-10", 100.0))),
        )
        .await;

        match result {
            Err(ApiError::Forbidden(reason)) => {
                assert!(
                    reason.contains("edit"),
                    "403 must name the missing edit permission, got: {}",
                    reason
                );
            }
            other => panic!("expected Forbidden, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_create_entry_with_edit_link() {
        let state = setup_test_state().await;

        let response = create_entry(
            State(state.clone()),
            auth("editor", UserRole::Approved),
            Path("p1".to_string()),
            Ok(Json(entry_request("2024-01-10", 100.0))),
        )
        .await;

        assert_eq!(
            response.into_response().status(),
            StatusCode::CREATED
        );
    }

    #[tokio::test]
    async fn test_no_link_means_no_access() {
        let state = setup_test_state().await;

        let result = get_latest_entry(
            State(state),
            auth("stranger", UserRole::Approved),
            Path("p1".to_string()),
        )
        .await;

        match result {
            Err(ApiError::Forbidden(reason)) => {
                assert!(reason.contains("no access"), "got: {}", reason)
            }
            other => panic!("expected Forbidden, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_admin_bypasses_links() {
        let state = setup_test_state().await;

        let response = create_entry(
            State(state.clone()),
            auth("admin", UserRole::Admin),
            Path("p1".to_string()),
            Ok(Json(entry_request("2024-01-10", 50.0))),
        )
        .await;
        assert_eq!(response.into_response().status(), StatusCode::CREATED);

        let lookup = get_latest_entry(
            State(state),
            auth("admin", UserRole::Admin),
            Path("p1".to_string()),
        )
        .await
        .unwrap();
        assert!(lookup.0.entry.is_some());
    }

    #[tokio::test]
    async fn test_by_date_absent_is_null_not_error() {
        let state = setup_test_state().await;

        let response = get_entry_by_date(
            State(state),
            auth("reader", UserRole::Approved),
            Path("p1".to_string()),
            Query(DateQuery {
                date: "2024-01-10".to_string(),
            }),
        )
        .await
        .unwrap();

        assert_eq!(response.0.entry, None);
    }

    #[tokio::test]
    async fn test_by_date_and_before_date_resolution() {
        let state = setup_test_state().await;

        for (date, cash) in [("2024-01-10", 10.0), ("2024-01-20", 20.0)] {
            create_entry(
                State(state.clone()),
                auth("editor", UserRole::Approved),
                Path("p1".to_string()),
                Ok(Json(entry_request(date, cash))),
            )
            .await
            .unwrap();
        }

        // Exact hit on the 20th.
        let exact = get_entry_by_date(
            State(state.clone()),
            auth("reader", UserRole::Approved),
            Path("p1".to_string()),
            Query(DateQuery {
                date: "2024-01-20".to_string(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(exact.0.entry.as_ref().unwrap().entry_date, "2024-01-20");

        // The 15th has no exact entry; before-date finds the 10th.
        let miss = get_entry_by_date(
            State(state.clone()),
            auth("reader", UserRole::Approved),
            Path("p1".to_string()),
            Query(DateQuery {
                date: "2024-01-15".to_string(),
            }),
        )
        .await
        .unwrap();
        assert!(miss.0.entry.is_none());

        let fallback = get_entry_before_date(
            State(state.clone()),
            auth("reader", UserRole::Approved),
            Path("p1".to_string()),
            Query(DateQuery {
                date: "2024-01-15".to_string(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(fallback.0.entry.as_ref().unwrap().entry_date, "2024-01-10");

        // Nothing precedes the 5th.
        let none = get_entry_before_date(
            State(state),
            auth("reader", UserRole::Approved),
            Path("p1".to_string()),
            Query(DateQuery {
                date: "2024-01-05".to_string(),
            }),
        )
        .await
        .unwrap();
        assert!(none.0.entry.is_none());
    }

    #[tokio::test]
    async fn test_malformed_date_is_validation_error() {
        let state = setup_test_state().await;

        let result = get_entry_by_date(
            State(state),
            auth("reader", UserRole::Approved),
            Path("p1".to_string()),
            Query(DateQuery {
                date: "15/01/2024".to_string(),
            }),
        )
        .await;

        assert!(matches!(result, Err(ApiError::Validation(_))));
    }

    #[tokio::test]
    async fn test_negative_value_rejected() {
        let state = setup_test_state().await;

        let mut request = entry_request("2024-01-10", 10.0);
        request.stocks = -5.0;

        let result = create_entry(
            State(state),
            auth("editor", UserRole::Approved),
            Path("p1".to_string()),
            Ok(Json(request)),
        )
        .await;

        match result {
            Err(ApiError::Validation(msg)) => assert!(msg.contains("stocks")),
            other => panic!("expected Validation, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_entry_dates_listing() {
        let state = setup_test_state().await;

        for date in ["2024-01-10", "2024-03-01", "2024-02-15"] {
            create_entry(
                State(state.clone()),
                auth("editor", UserRole::Approved),
                Path("p1".to_string()),
                Ok(Json(entry_request(date, 1.0))),
            )
            .await
            .unwrap();
        }

        let response = get_entry_dates(
            State(state),
            auth("reader", UserRole::Approved),
            Path("p1".to_string()),
        )
        .await
        .unwrap();
        assert_eq!(
            response.0.dates,
            vec!["2024-03-01", "2024-02-15", "2024-01-10"]
        );
    }

    #[tokio::test]
    async fn test_delete_entry() {
        let state = setup_test_state().await;

        create_entry(
            State(state.clone()),
            auth("editor", UserRole::Approved),
            Path("p1".to_string()),
            Ok(Json(entry_request("2024-01-10", 1.0))),
        )
        .await
        .unwrap();

        let deleted = delete_entry(
            State(state.clone()),
            auth("editor", UserRole::Approved),
            Path(("p1".to_string(), "2024-01-10".to_string())),
        )
        .await
        .unwrap();
        assert!(deleted.0.deleted);

        // Deleting an absent entry is data, not an error.
        let again = delete_entry(
            State(state),
            auth("editor", UserRole::Approved),
            Path(("p1".to_string(), "2024-01-10".to_string())),
        )
        .await
        .unwrap();
        assert!(!again.0.deleted);
    }
}
