//! Shared application state for all routes. Read-only after startup.

use crate::auth::TokenVerifier;
use crate::repository::Repository;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn Repository>,
    pub verifier: Arc<TokenVerifier>,
}

impl AppState {
    pub fn new(repo: Arc<dyn Repository>, verifier: TokenVerifier) -> Self {
        Self {
            repo,
            verifier: Arc::new(verifier),
        }
    }
}
