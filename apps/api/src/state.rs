use std::sync::Arc;

use crate::auth::IdentityProvider;
use crate::config::Config;
use crate::resumes::storage::FileStore;
use crate::store::Store;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Relational data. `PgStore` in production.
    pub store: Arc<dyn Store>,
    /// External auth service. `GoTrueClient` in production.
    pub identity: Arc<dyn IdentityProvider>,
    /// Resume documents. `S3FileStore` in production.
    pub files: Arc<dyn FileStore>,
    pub config: Config,
}
