//! API client for the HireHub backend.
//!
//! Every request funnels through one guarded send path: the current token is
//! re-read from the store and re-validated before anything hits the wire, and
//! a 401 response tears the session down before the error reaches the caller.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::auth::claims::token_expired;
use crate::auth::session::expire_session;
use crate::auth::TokenStore;
use crate::models::{
    HistoryCreate, HistoryItem, JobGeneratorRequest, JobGeneratorResponse, ModuleInfo,
    ProfileUpdate, RegisterRequest, SalaryRequest, SalaryResponse, UserOut,
};
use crate::nav::Navigator;

use super::ApiError;

/// HTTP request timeout in seconds.
/// 30s allows for slow generator responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Backend errors carry a human-readable `detail` field
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

fn rejection_detail(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body).ok()?.detail
}

/// API client for the HireHub backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    store: Arc<TokenStore>,
    navigator: Arc<dyn Navigator>,
}

impl ApiClient {
    /// Create a new API client against `base_url` (no trailing slash needed).
    pub fn new(
        base_url: impl Into<String>,
        store: Arc<TokenStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            store,
            navigator,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Clear the session and send the UI to the login view. Safe to trigger
    /// redundantly: clearing an absent slot and redirecting while already on
    /// the login view are both no-ops.
    pub(crate) fn expire_session(&self) {
        expire_session(&self.store, self.navigator.as_ref());
    }

    /// Outbound half of the guard: fetch the token to attach, if any.
    ///
    /// An absent session sends the request bare (login and register are
    /// public endpoints). A present but expired token aborts the request
    /// before transmission, tearing the session down on the way out.
    fn bearer(&self) -> Result<Option<String>, ApiError> {
        let Some(token) = self.store.get() else {
            return Ok(None);
        };
        if token_expired(&token, Utc::now()) {
            debug!("stored token expired, aborting request");
            self.expire_session();
            return Err(ApiError::SessionExpired);
        }
        Ok(Some(token))
    }

    /// Guarded send path shared by every request.
    ///
    /// On a 401 the session-clearing side effects run here; the rejection
    /// itself is propagated unchanged through the caller's own status
    /// handling so its error path still fires.
    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let request = match self.bearer()? {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            debug!("server rejected authorization, clearing session");
            self.expire_session();
        }

        Ok(response)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(self.client.get(self.url(path))).await?;
        let response = Self::check_response(response).await?;
        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("GET {}: {}", path, e)))
    }

    async fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.send(self.client.post(self.url(path)).json(body)).await?;
        let response = Self::check_response(response).await?;
        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("POST {}: {}", path, e)))
    }

    async fn put_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.send(self.client.put(self.url(path)).json(body)).await?;
        let response = Self::check_response(response).await?;
        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("PUT {}: {}", path, e)))
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let response = self.send(self.client.delete(self.url(path))).await?;
        Self::check_response(response).await?;
        Ok(())
    }

    // ===== Credential exchange =====

    /// Exchange username/password for a bearer token.
    ///
    /// The backend takes an url-encoded form body and answers with
    /// `{"access_token": ...}`. A rejected exchange surfaces the backend's
    /// `detail` message verbatim; nothing is stored here.
    pub(crate) async fn exchange_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<String, ApiError> {
        debug!(username, "exchanging credentials");
        let request = self
            .client
            .post(self.url("/login"))
            .form(&[("username", username), ("password", password)]);

        let response = self.send(request).await?;
        let status = response.status();

        if status.is_success() {
            let token: TokenResponse = response
                .json()
                .await
                .map_err(|e| ApiError::InvalidResponse(format!("login response: {}", e)))?;
            return Ok(token.access_token);
        }

        let body = response.text().await.unwrap_or_default();
        warn!(%status, "credential exchange rejected");
        match rejection_detail(&body) {
            // 429 keeps its own variant so callers can suggest waiting
            Some(detail) if status.is_client_error() && status.as_u16() != 429 => {
                Err(ApiError::LoginRejected(detail))
            }
            _ => Err(ApiError::from_status(status, &body)),
        }
    }

    /// Create a new account. Public endpoint, no token attached.
    pub async fn register(&self, payload: &RegisterRequest) -> Result<UserOut, ApiError> {
        self.post_json("/register", payload).await
    }

    // ===== Recruiter tools =====

    /// Run the 12-month salary breakdown
    pub async fn calculate_salary(&self, request: &SalaryRequest) -> Result<SalaryResponse, ApiError> {
        self.post_json("/salary", request).await
    }

    /// Generate a job description draft
    pub async fn generate_job(
        &self,
        request: &JobGeneratorRequest,
    ) -> Result<JobGeneratorResponse, ApiError> {
        self.post_json("/job_generator", request).await
    }

    /// Fetch the enabled tool modules for the hub view
    pub async fn list_modules(&self) -> Result<Vec<ModuleInfo>, ApiError> {
        self.get_json("/modules").await
    }

    // ===== History =====

    /// Fetch stored history entries, optionally filtered to one module.
    pub async fn fetch_history(
        &self,
        module_name: Option<&str>,
    ) -> Result<Vec<HistoryItem>, ApiError> {
        let request = self
            .client
            .get(self.url("/history"))
            .query(&[("module_name", module_name)]);
        let response = self.send(request).await?;
        let response = Self::check_response(response).await?;
        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("GET /history: {}", e)))
    }

    pub async fn add_history(&self, entry: &HistoryCreate) -> Result<HistoryItem, ApiError> {
        self.post_json("/history", entry).await
    }

    pub async fn delete_history_item(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/history/{}", id)).await
    }

    /// Delete history entries, optionally only those of one module.
    pub async fn clear_history(&self, module_name: Option<&str>) -> Result<(), ApiError> {
        let request = self
            .client
            .delete(self.url("/history"))
            .query(&[("module_name", module_name)]);
        let response = self.send(request).await?;
        Self::check_response(response).await?;
        Ok(())
    }

    // ===== Profile =====

    pub async fn fetch_profile(&self) -> Result<UserOut, ApiError> {
        self.get_json("/profile").await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<UserOut, ApiError> {
        self.put_json("/profile", update).await
    }
}
