//! API client for communicating with the TicketMule REST API.
//!
//! This module provides the `ApiClient` struct used to authenticate and to
//! fetch lookup data once a session cookie is in place.

use std::time::Duration;

use reqwest::{header, Client};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::auth::Credentials;
use crate::models::{TimeType, User};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Login endpoint, relative to the server URL
const LOGIN_PATH: &str = "/api/v1/login";

/// Logout endpoint, relative to the server URL
const LOGOUT_PATH: &str = "/api/v1/logout";

/// Time-type lookup endpoint, relative to the server URL
const TIME_TYPES_PATH: &str = "/api/v1/time_types";

/// Default HTTP request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Connection settings for `ApiClient`
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub request_timeout: Duration,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    user_session: LoginFields<'a>,
}

#[derive(Serialize)]
struct LoginFields<'a> {
    username: &'a str,
    password: &'a str,
    remember_me: bool,
}

/// API client for a TicketMule server.
/// Clone is cheap - reqwest::Client uses Arc internally, and clones share
/// the connection pool and cookie store.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .cookie_store(true)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Authenticate and return the server's identity object.
    /// Sends exactly one request; failures are never retried.
    pub async fn login(&self, credentials: &Credentials) -> Result<User, ApiError> {
        let url = self.url(LOGIN_PATH);
        debug!(url = %url, username = %credentials.username, "Sending login request");

        let body = LoginRequest {
            user_session: LoginFields {
                username: &credentials.username,
                password: &credentials.password,
                remember_me: credentials.remember,
            },
        };

        let response = self
            .client
            .post(&url)
            .header(header::ACCEPT, "application/json")
            .json(&body)
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        Self::parse_json(response).await
    }

    /// End the server-side session. The caller clears local state regardless
    /// of the outcome.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let url = self.url(LOGOUT_PATH);
        debug!(url = %url, "Sending logout request");

        let response = self
            .client
            .delete(&url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        Self::check_response(response).await?;
        Ok(())
    }

    /// Fetch the time-type lookup table, in the order the server returns it
    pub async fn fetch_time_types(&self) -> Result<Vec<TimeType>, ApiError> {
        self.get(TIME_TYPES_PATH).await
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, "Request rejected by server");
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn parse_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        let response = self
            .client
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        Self::parse_json(response).await
    }
}
