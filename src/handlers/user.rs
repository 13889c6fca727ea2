//! User profile sync from the identity provider's client-side session.

use crate::error::AppError;
use crate::extractors::{Caller, Payload};
use crate::models::SyncUserRequest;
use crate::response::ok;
use crate::state::AppState;
use axum::extract::State;
use axum::response::IntoResponse;

#[tracing::instrument(name = "sync_user", skip_all)]
pub async fn sync_user(
    State(state): State<AppState>,
    Caller(user_id): Caller,
    Payload(body): Payload<SyncUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    let new_user = body.into_new_user(user_id).ok_or_else(AppError::missing_fields)?;
    let user = state.repo.upsert_user(new_user).await?;
    Ok(ok(user))
}
