//! Identity-provider tokens: verification and per-request auth context.
//!
//! [`auth_context`] runs on every request. A valid `Authorization: Bearer` token puts an
//! [`Identity`] into the request extensions; anything else leaves the request anonymous.
//! Routes marked with [`require_auth`] reject anonymous requests before the handler runs.

use crate::config::{AuthConfig, AuthKey};
use crate::error::{AppError, ConfigError};
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Verified caller, set by [`auth_context`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Provider user id.
    pub sub: String,
    pub exp: usize,
}

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("invalid token: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),
    #[error("token has an empty subject")]
    EmptySubject,
}

pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(config: &AuthConfig) -> Result<Self, ConfigError> {
        let (key, algorithm) = match &config.key {
            AuthKey::Secret(secret) => (DecodingKey::from_secret(secret.as_bytes()), Algorithm::HS256),
            AuthKey::RsaPem(pem) => {
                let key = DecodingKey::from_rsa_pem(pem.as_bytes())
                    .map_err(|e| ConfigError::InvalidEnvVar("AUTH_JWT_PUBLIC_KEY", e.to_string()))?;
                (key, Algorithm::RS256)
            }
        };
        let mut validation = Validation::new(algorithm);
        if let Some(issuer) = &config.issuer {
            validation.set_issuer(&[issuer]);
        }
        match &config.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }
        Ok(Self { key, validation })
    }

    /// Check signature and expiry and return the subject.
    pub fn verify(&self, token: &str) -> Result<String, TokenError> {
        let data = decode::<Claims>(token, &self.key, &self.validation)?;
        if data.claims.sub.is_empty() {
            return Err(TokenError::EmptySubject);
        }
        Ok(data.claims.sub)
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split_once(' '))
        .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
        .map(|(_, token)| token.trim())
        .filter(|s| !s.is_empty())
}

/// Middleware: resolve the caller from the bearer token, if any.
pub async fn auth_context(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let identity = bearer_token(request.headers()).and_then(|token| match state.verifier.verify(token) {
        Ok(user_id) => Some(Identity { user_id }),
        Err(e) => {
            tracing::debug!(error = %e, "ignoring bearer token");
            None
        }
    });
    if let Some(identity) = identity {
        request.extensions_mut().insert(identity);
    }
    next.run(request).await
}

/// Route layer: 401 unless [`auth_context`] resolved a caller.
pub async fn require_auth(request: Request, next: Next) -> Response {
    if request.extensions().get::<Identity>().is_none() {
        return AppError::Unauthorized.into_response();
    }
    next.run(request).await
}
