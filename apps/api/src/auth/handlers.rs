use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::Deserialize;
use tracing::info;

use crate::auth::{AuthSession, Caller};
use crate::errors::AppError;
use crate::extract::JsonBody;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// POST /api/v1/auth/sign-in
pub async fn handle_sign_in(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<SignInRequest>,
) -> Result<Json<AuthSession>, AppError> {
    let email = req.email.trim();
    if email.is_empty() {
        return Err(AppError::Validation("Email is required".to_string()));
    }
    if req.password.is_empty() {
        return Err(AppError::Validation("Password is required".to_string()));
    }

    let session = state.identity.sign_in(email, &req.password).await?;
    info!("User {} signed in", session.user.id);
    Ok(Json(session))
}

/// POST /api/v1/auth/sign-out
pub async fn handle_sign_out(
    State(state): State<AppState>,
    Extension(caller): Extension<Arc<Caller>>,
) -> Result<StatusCode, AppError> {
    let identity = caller.require_identity()?;
    let token = caller.access_token.as_deref().ok_or(AppError::Unauthorized)?;
    state.identity.sign_out(token).await?;
    info!("User {} signed out", identity.id);
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/me
///
/// The caller's identity and profile. `profile` is `null` for an account that
/// has signed in but was never given a profile.
pub async fn handle_me(Extension(caller): Extension<Arc<Caller>>) -> Result<Json<Caller>, AppError> {
    caller.require_identity()?;
    Ok(Json(caller.as_ref().clone()))
}
