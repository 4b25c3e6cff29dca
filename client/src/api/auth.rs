//! `/auth/*` endpoints.

use std::sync::Arc;

use reqwest::Method;
use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::transport::Transport;
use crate::types::{LoginRequest, ProfileUpdate, RegisterRequest, TokenResponse, UserProfile};

#[derive(Clone, Debug)]
pub struct AuthApi {
    transport: Arc<Transport>,
}

impl AuthApi {
    #[must_use]
    pub fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    /// `POST /auth/login`.
    ///
    /// # Errors
    ///
    /// Returns the transport error; bad credentials surface as `Rejected` or
    /// `Unauthorized` depending on the server. Neither touches the stored
    /// session.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<TokenResponse, ApiError> {
        self.transport.send_anonymous_json(Method::POST, "/auth/login", credentials).await
    }

    /// `POST /auth/register`. The created user is not signed in.
    ///
    /// # Errors
    ///
    /// Returns the transport error.
    pub async fn register(&self, profile: &RegisterRequest) -> Result<(), ApiError> {
        self.transport.send_anonymous_discard(Method::POST, "/auth/register", profile).await
    }

    /// `GET /auth/me` with whatever token the store currently holds.
    ///
    /// # Errors
    ///
    /// Returns the transport error.
    pub async fn current_user(&self) -> Result<UserProfile, ApiError> {
        self.transport.get("/auth/me").await
    }

    /// `GET /auth/me` with an explicit token, used right after login before
    /// the credential has been persisted.
    ///
    /// # Errors
    ///
    /// Returns the transport error.
    pub async fn current_user_with(&self, token: &str) -> Result<UserProfile, ApiError> {
        self.transport.get_with_token("/auth/me", token).await
    }

    /// `PUT /auth/me`. Returns the raw response object so callers can
    /// overlay exactly the fields the server sent.
    ///
    /// # Errors
    ///
    /// Returns the transport error, or `Decode` if the body is not an object.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<Map<String, Value>, ApiError> {
        self.transport.send_json(Method::PUT, "/auth/me", Some(update)).await
    }
}
