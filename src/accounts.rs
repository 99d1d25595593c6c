use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::models::{
    AuthResponse, LoginRequest, RegisterRequest, ResetPasswordRequest, UpdateUserRequest,
    UserRecord,
};

/// AuthError
///
/// Failures of the account service, split the way the pages need them: a wrong
/// password is shown differently from an unreachable service, and a rejected
/// credential triggers the forced logout.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("request rejected: {0}")]
    Rejected(String),
    #[error("credential rejected by the account service")]
    Unauthorized,
    #[error("account service unavailable: {0}")]
    Unavailable(String),
}

impl From<reqwest::Error> for AuthError {
    fn from(error: reqwest::Error) -> Self {
        Self::Unavailable(error.to_string())
    }
}

// 1. AuthClient Contract
/// AuthClient
///
/// The login / registration / reset collaborator plus the two profile calls used
/// by the update-details page.
#[async_trait]
pub trait AuthClient: Send + Sync {
    async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AuthError>;

    /// Registers a user. Returns the session payload when the service logs the new
    /// user in directly, `None` when the user has to log in afterwards.
    async fn register(&self, request: RegisterRequest) -> Result<Option<AuthResponse>, AuthError>;

    async fn reset_password(&self, request: ResetPasswordRequest) -> Result<(), AuthError>;

    async fn find_user(&self, token: &str, user_id: i64) -> Result<UserRecord, AuthError>;

    async fn update_user(
        &self,
        token: &str,
        user_id: i64,
        request: UpdateUserRequest,
    ) -> Result<UserRecord, AuthError>;
}

/// ErrorBody
///
/// The `{ "message": ... }` body the services attach to 4xx responses.
#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

async fn rejection_message(response: reqwest::Response, fallback: &str) -> String {
    response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.message)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

// 2. The Real Implementation (HTTP)
/// HttpAuthClient
///
/// Talks to the account service over HTTP/JSON.
#[derive(Clone)]
pub struct HttpAuthClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAuthClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl AuthClient for HttpAuthClient {
    async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AuthError> {
        let response = self
            .client
            .post(self.url("/account/login"))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status.is_client_error() {
            return Err(AuthError::InvalidCredentials);
        }
        if !status.is_success() {
            warn!(%status, "login call failed");
            return Err(AuthError::Unavailable(format!("login returned {status}")));
        }

        // A success body without token and user is treated as a failed login.
        response
            .json::<AuthResponse>()
            .await
            .map_err(|_| AuthError::InvalidCredentials)
    }

    async fn register(&self, request: RegisterRequest) -> Result<Option<AuthResponse>, AuthError> {
        let response = self
            .client
            .post(self.url("/account/register"))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status.is_client_error() {
            let message =
                rejection_message(response, "An error occurred. Please try again.").await;
            return Err(AuthError::Rejected(message));
        }
        if !status.is_success() {
            return Err(AuthError::Unavailable(format!("register returned {status}")));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str::<AuthResponse>(&body).ok())
    }

    async fn reset_password(&self, request: ResetPasswordRequest) -> Result<(), AuthError> {
        let response = self
            .client
            .post(self.url("/account/reset-password"))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status.is_client_error() {
            let message = rejection_message(
                response,
                "Reset password failed. Please check your inputs.",
            )
            .await;
            return Err(AuthError::Rejected(message));
        }
        if !status.is_success() {
            return Err(AuthError::Unavailable(format!("reset returned {status}")));
        }
        Ok(())
    }

    async fn find_user(&self, token: &str, user_id: i64) -> Result<UserRecord, AuthError> {
        let response = self
            .client
            .get(self.url(&format!("/account/find-user/{user_id}")))
            .bearer_auth(token)
            .send()
            .await?;

        match response.status() {
            StatusCode::UNAUTHORIZED => Err(AuthError::Unauthorized),
            status if status.is_success() => Ok(response.json::<UserRecord>().await?),
            status => Err(AuthError::Unavailable(format!("find-user returned {status}"))),
        }
    }

    async fn update_user(
        &self,
        token: &str,
        user_id: i64,
        request: UpdateUserRequest,
    ) -> Result<UserRecord, AuthError> {
        let response = self
            .client
            .put(self.url(&format!("/account/update-user/{user_id}")))
            .bearer_auth(token)
            .json(&request)
            .send()
            .await?;

        match response.status() {
            StatusCode::UNAUTHORIZED => Err(AuthError::Unauthorized),
            status if status.is_client_error() => Err(AuthError::Rejected(
                rejection_message(response, "Failed to update user details.").await,
            )),
            status if status.is_success() => Ok(response.json::<UserRecord>().await?),
            status => Err(AuthError::Unavailable(format!("update-user returned {status}"))),
        }
    }
}

/// AuthState
///
/// The shared handle to the account collaborator.
pub type AuthState = std::sync::Arc<dyn AuthClient>;
