//! GoTrue client. The only place that talks to the external auth service.
//!
//! Endpoints used: `GET /auth/v1/user`, `POST /auth/v1/token?grant_type=password`,
//! `POST /auth/v1/logout`. Every request carries the project's anon key in the
//! `apikey` header.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::auth::{AuthError, AuthSession, Identity, IdentityProvider};

const MAX_ATTEMPTS: u32 = 3;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

/// GoTrue reports errors in several shapes depending on endpoint and version.
#[derive(Debug, Default, Deserialize)]
struct GoTrueError {
    error_description: Option<String>,
    msg: Option<String>,
    message: Option<String>,
    error: Option<String>,
}

/// Which failures `send` may retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Retry {
    /// Transport errors and 5xx responses. For idempotent calls.
    Transient,
    /// Transport errors only. A 5xx on a password grant may still have
    /// counted as an attempt against the provider's lockout limit.
    TransportOnly,
}

impl Retry {
    fn on_status(self, status: StatusCode) -> bool {
        self == Retry::Transient && status.is_server_error()
    }
}

#[derive(Clone)]
pub struct GoTrueClient {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl GoTrueClient {
    pub fn new(base_url: &str, anon_key: String) -> anyhow::Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    /// Sends the request built by `build`, retrying per `retry` with
    /// exponential backoff. Other statuses are returned as-is.
    async fn send<F>(&self, retry: Retry, build: F) -> Result<Response, AuthError>
    where
        F: Fn() -> RequestBuilder,
    {
        let mut last_error: Option<AuthError> = None;

        for attempt in 0..MAX_ATTEMPTS {
            if attempt > 0 {
                // 200ms, 400ms
                let delay = Duration::from_millis(200 * (1 << (attempt - 1)));
                warn!(
                    "Auth call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match build().header("apikey", &self.anon_key).send().await {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(AuthError::Http(e));
                    continue;
                }
            };

            if retry.on_status(response.status()) {
                let status = response.status().as_u16();
                let body = response.text().await.unwrap_or_default();
                warn!("Auth API returned {status}: {body}");
                last_error = Some(AuthError::Api {
                    status,
                    message: extract_error_message(&body),
                });
                continue;
            }

            return Ok(response);
        }

        Err(last_error.unwrap_or(AuthError::Api {
            status: 503,
            message: format!("no response after {MAX_ATTEMPTS} attempts"),
        }))
    }
}

async fn api_error(response: Response) -> AuthError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    AuthError::Api {
        status,
        message: extract_error_message(&body),
    }
}

fn extract_error_message(body: &str) -> String {
    let parsed: GoTrueError = serde_json::from_str(body).unwrap_or_default();
    parsed
        .error_description
        .or(parsed.msg)
        .or(parsed.message)
        .or(parsed.error)
        .unwrap_or_else(|| body.trim().to_string())
}

#[async_trait]
impl IdentityProvider for GoTrueClient {
    async fn verify(&self, access_token: &str) -> Result<Identity, AuthError> {
        let response = self
            .send(Retry::Transient, || {
                self.client.get(self.url("user")).bearer_auth(access_token)
            })
            .await?;

        match response.status() {
            s if s.is_success() => {
                let identity: Identity = response.json().await?;
                debug!("Verified identity {}", identity.id);
                Ok(identity)
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(AuthError::InvalidToken),
            _ => Err(api_error(response).await),
        }
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let grant = PasswordGrant { email, password };
        let response = self
            .send(Retry::TransportOnly, || {
                self.client
                    .post(self.url("token"))
                    .query(&[("grant_type", "password")])
                    .json(&grant)
            })
            .await?;

        match response.status() {
            s if s.is_success() => Ok(response.json().await?),
            // GoTrue answers a bad password with 400 invalid_grant.
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => {
                Err(AuthError::InvalidCredentials)
            }
            _ => Err(api_error(response).await),
        }
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        let response = self
            .send(Retry::Transient, || {
                self.client.post(self.url("logout")).bearer_auth(access_token)
            })
            .await?;

        match response.status() {
            s if s.is_success() => Ok(()),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(AuthError::InvalidToken),
            _ => Err(api_error(response).await),
        }
    }
}
