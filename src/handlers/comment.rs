//! Comment handlers: create on a product, delete own.

use crate::error::AppError;
use crate::extractors::{Caller, Payload};
use crate::handlers::ensure_owner;
use crate::models::{required, CreateCommentRequest, NewComment};
use crate::response::{created, message};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::response::IntoResponse;

#[tracing::instrument(name = "create_comment", skip(state, user_id, body))]
pub async fn create_comment(
    State(state): State<AppState>,
    Caller(user_id): Caller,
    Path(product_id): Path<String>,
    Payload(body): Payload<CreateCommentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let content = required(body.content).ok_or_else(AppError::missing_fields)?;
    if state.repo.product_by_id(&product_id).await?.is_none() {
        return Err(AppError::NotFound("Product"));
    }
    let comment = state
        .repo
        .create_comment(NewComment {
            content,
            product_id,
            user_id,
        })
        .await?;
    Ok(created(comment))
}

#[tracing::instrument(name = "delete_comment", skip(state, user_id))]
pub async fn delete_comment(
    State(state): State<AppState>,
    Caller(user_id): Caller,
    Path(comment_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let comment = state
        .repo
        .comment_by_id(&comment_id)
        .await?
        .ok_or(AppError::NotFound("Comment"))?;
    ensure_owner(&comment.user_id, &user_id)?;
    state.repo.delete_comment(&comment_id).await?;
    Ok(message("Comment deleted successfully"))
}
