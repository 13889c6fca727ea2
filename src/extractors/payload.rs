//! Request body extractor accepting JSON or url-encoded forms.

use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
    Form,
};
use serde::de::DeserializeOwned;

use crate::error::AppError;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Typed body. An empty body yields `T::default()` so missing fields surface as validation errors.
#[derive(Debug)]
pub struct Payload<T>(pub T);

fn invalid_body() -> AppError {
    AppError::Validation("Invalid request body".into())
}

#[async_trait]
impl<S, T> FromRequest<S> for Payload<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.starts_with(FORM_CONTENT_TYPE))
            .unwrap_or(false);

        if is_form {
            let Form(value) = Form::<T>::from_request(req, state).await.map_err(|e| {
                tracing::debug!(error = %e, "form body rejected");
                invalid_body()
            })?;
            return Ok(Payload(value));
        }

        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            tracing::debug!(error = %e, "body read failed");
            invalid_body()
        })?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Payload(T::default()));
        }
        serde_json::from_slice(&bytes).map(Payload).map_err(|e| {
            tracing::debug!(error = %e, "json body rejected");
            invalid_body()
        })
    }
}
