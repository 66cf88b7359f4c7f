//! HTTP client for the backend API.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared::{
    ApproveUserRequest, ApproveUserResponse, AuthResponse, CreateEntryRequest,
    CreateProfileRequest, DeleteEntryResponse, DeleteProfileResponse, Entry, EntryDatesResponse,
    EntryListResponse, EntryLookupResponse, EntryResponse, LoginRequest, PendingUsersResponse,
    ProfileListResponse, ProfileResponse, RegisterRequest, RejectUserResponse,
    UpdateProfileRequest,
};

use crate::form_controller::EntryResolveApi;

/// API client for communicating with the backend server.
///
/// Every profile- or admin-scoped call sends the bearer token; calls
/// without one come back 401 from the server.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a new API client with the default base URL.
    pub fn new() -> Self {
        Self::with_base_url("http://localhost:3000".to_string())
    }

    /// Create a new API client with a custom base URL.
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            token: None,
        }
    }

    /// Attach the bearer token returned by register/login.
    pub fn with_token(mut self, token: String) -> Self {
        self.token = Some(token);
        self
    }

    /// Replace the bearer token in place.
    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, String> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .authorized(self.http.get(&url))
            .send()
            .await
            .map_err(|e| format!("Network error: {}", e))?;
        handle_response(response).await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, String> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .authorized(self.http.post(&url))
            .json(body)
            .send()
            .await
            .map_err(|e| format!("Network error: {}", e))?;
        handle_response(response).await
    }

    async fn put_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, String> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .authorized(self.http.put(&url))
            .json(body)
            .send()
            .await
            .map_err(|e| format!("Network error: {}", e))?;
        handle_response(response).await
    }

    async fn delete_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, String> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .authorized(self.http.delete(&url))
            .send()
            .await
            .map_err(|e| format!("Network error: {}", e))?;
        handle_response(response).await
    }

    // --- auth ---

    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, String> {
        self.post_json("/api/auth/register", request).await
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, String> {
        self.post_json("/api/auth/login", request).await
    }

    // --- profiles ---

    pub async fn list_profiles(&self) -> Result<ProfileListResponse, String> {
        self.get_json("/api/profiles").await
    }

    pub async fn create_profile(
        &self,
        request: &CreateProfileRequest,
    ) -> Result<ProfileResponse, String> {
        self.post_json("/api/profiles", request).await
    }

    pub async fn update_profile(
        &self,
        profile_id: &str,
        request: &UpdateProfileRequest,
    ) -> Result<ProfileResponse, String> {
        self.put_json(&format!("/api/profiles/{}", profile_id), request)
            .await
    }

    pub async fn delete_profile(&self, profile_id: &str) -> Result<DeleteProfileResponse, String> {
        self.delete_json(&format!("/api/profiles/{}", profile_id))
            .await
    }

    // --- entries ---

    pub async fn entry_by_date(
        &self,
        profile_id: &str,
        date: &str,
    ) -> Result<EntryLookupResponse, String> {
        self.get_json(&format!(
            "/api/profiles/{}/entries/by-date?date={}",
            profile_id, date
        ))
        .await
    }

    pub async fn entry_before_date(
        &self,
        profile_id: &str,
        date: &str,
    ) -> Result<EntryLookupResponse, String> {
        self.get_json(&format!(
            "/api/profiles/{}/entries/before-date?date={}",
            profile_id, date
        ))
        .await
    }

    pub async fn latest_entry(&self, profile_id: &str) -> Result<EntryLookupResponse, String> {
        self.get_json(&format!("/api/profiles/{}/entries/latest", profile_id))
            .await
    }

    pub async fn entry_dates(&self, profile_id: &str) -> Result<EntryDatesResponse, String> {
        self.get_json(&format!("/api/profiles/{}/entries/dates", profile_id))
            .await
    }

    pub async fn list_entries(&self, profile_id: &str) -> Result<EntryListResponse, String> {
        self.get_json(&format!("/api/profiles/{}/entries", profile_id))
            .await
    }

    pub async fn create_entry(
        &self,
        profile_id: &str,
        request: &CreateEntryRequest,
    ) -> Result<EntryResponse, String> {
        self.post_json(&format!("/api/profiles/{}/entries", profile_id), request)
            .await
    }

    pub async fn delete_entry(
        &self,
        profile_id: &str,
        date: &str,
    ) -> Result<DeleteEntryResponse, String> {
        self.delete_json(&format!("/api/profiles/{}/entries/{}", profile_id, date))
            .await
    }

    // --- admin ---

    pub async fn pending_users(&self) -> Result<PendingUsersResponse, String> {
        self.get_json("/api/admin/users/pending").await
    }

    pub async fn all_profiles(&self) -> Result<ProfileListResponse, String> {
        self.get_json("/api/admin/profiles").await
    }

    pub async fn approve_user(
        &self,
        user_id: &str,
        request: &ApproveUserRequest,
    ) -> Result<ApproveUserResponse, String> {
        self.post_json(&format!("/api/admin/users/{}/approve", user_id), request)
            .await
    }

    pub async fn reject_user(&self, user_id: &str) -> Result<RejectUserResponse, String> {
        self.post_json(&format!("/api/admin/users/{}/reject", user_id), &())
            .await
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EntryResolveApi for ApiClient {
    async fn entry_by_date(&self, profile_id: &str, date: &str) -> Result<Option<Entry>, String> {
        ApiClient::entry_by_date(self, profile_id, date)
            .await
            .map(|response| response.entry)
    }

    async fn entry_before_date(
        &self,
        profile_id: &str,
        date: &str,
    ) -> Result<Option<Entry>, String> {
        ApiClient::entry_before_date(self, profile_id, date)
            .await
            .map(|response| response.entry)
    }
}

async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, String> {
    if response.status().is_success() {
        response
            .json::<T>()
            .await
            .map_err(|e| format!("Failed to parse response: {}", e))
    } else {
        let status = response.status();
        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        // Error bodies carry `{"error": "..."}`; fall back to the raw text.
        let message = serde_json::from_str::<serde_json::Value>(&text)
            .ok()
            .and_then(|value| {
                value
                    .get("error")
                    .and_then(|e| e.as_str())
                    .map(str::to_string)
            })
            .unwrap_or(text);
        tracing::warn!("API request failed with {}: {}", status.as_u16(), message);
        Err(format!("Server error {}: {}", status.as_u16(), message))
    }
}
