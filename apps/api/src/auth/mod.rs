//! Identity comes from an external GoTrue-compatible auth service. This module
//! owns the client for it, the request middleware that resolves the caller's
//! profile, and the sign-in / sign-out endpoints.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::errors::AppError;

pub mod handlers;
pub mod middleware;
pub mod provider;

pub use middleware::Caller;
pub use provider::GoTrueClient;

/// The authenticated user as reported by the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Identity {
    pub id: Uuid,
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: serde_json::Value,
}

/// Tokens issued by a successful password sign-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: u64,
    pub user: Identity,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Access token is invalid or expired")]
    InvalidToken,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Auth API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials | AuthError::InvalidToken => AppError::Unauthorized,
            other => AppError::AuthProvider(other.to_string()),
        }
    }
}

/// Verifies tokens and manages sessions against the identity provider.
///
/// Carried in `AppState` as `Arc<dyn IdentityProvider>`.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn verify(&self, access_token: &str) -> Result<Identity, AuthError>;
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError>;
    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError>;
}
