use std::sync::Arc;

use sqlx::PgPool;

use crate::applications::storage::ResumeStore;
use crate::auth::token::TokenKeys;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    /// Signing and verification keys for session tokens.
    pub tokens: TokenKeys,
    /// Where uploaded résumés are written. Default: LocalDiskStore under UPLOAD_DIR.
    pub resumes: Arc<dyn ResumeStore>,
}
