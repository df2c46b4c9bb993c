use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use serde::Serialize;

use crate::auth::Identity;
use crate::errors::AppError;
use crate::models::profile::{Profile, Role};
use crate::state::AppState;

/// Who is making the request. Installed into request extensions by
/// [`authenticate`] on every API route, so handlers extract
/// `Extension<Arc<Caller>>`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Caller {
    pub identity: Option<Identity>,
    /// `None` while signed in means "no profile yet", not an error.
    pub profile: Option<Profile>,
    #[serde(skip)]
    pub access_token: Option<String>,
}

impl Caller {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn require_identity(&self) -> Result<&Identity, AppError> {
        self.identity.as_ref().ok_or(AppError::Unauthorized)
    }

    pub fn require_profile(&self) -> Result<&Profile, AppError> {
        self.require_identity()?;
        self.profile.as_ref().ok_or(AppError::NoProfile)
    }

    pub fn require_role(&self, role: Role) -> Result<&Profile, AppError> {
        let profile = self.require_profile()?;
        if profile.role != role {
            return Err(AppError::Forbidden(format!(
                "Access denied. Only {} can do this.",
                role.plural_noun()
            )));
        }
        Ok(profile)
    }
}

/// Extracts the bearer token. A missing header is anonymous access; a
/// malformed one is rejected.
fn bearer_token(headers: &HeaderMap) -> Result<Option<String>, AppError> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value.to_str().map_err(|_| AppError::Unauthorized)?;
    // The scheme name is case-insensitive.
    let Some((scheme, token)) = value.split_once(' ') else {
        return Err(AppError::Unauthorized);
    };
    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(AppError::Unauthorized);
    }
    Ok(Some(token.to_string()))
}

/// Resolves identity → profile and attaches the [`Caller`] to the request.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let caller = match bearer_token(request.headers())? {
        None => Caller::anonymous(),
        Some(token) => {
            let identity = state.identity.verify(&token).await.map_err(|e| {
                tracing::warn!("token rejected: {e}");
                AppError::from(e)
            })?;
            let profile = state.store.profile_by_user(identity.id).await?;
            if profile.is_none() {
                tracing::debug!("identity {} has no profile yet", identity.id);
            }
            Caller {
                identity: Some(identity),
                profile,
                access_token: Some(token),
            }
        }
    };

    request.extensions_mut().insert(Arc::new(caller));
    Ok(next.run(request).await)
}
