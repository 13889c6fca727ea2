//! Extract the authenticated caller from the request context.

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};

use crate::auth::Identity;
use crate::error::AppError;

/// Caller id of an authenticated request. Rejects with 401 when the request is anonymous.
#[derive(Clone, Debug)]
pub struct Caller(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .map(|identity| Caller(identity.user_id.clone()))
            .ok_or(AppError::Unauthorized)
    }
}
