//! HTTP handlers for products, comments and user sync.

pub mod comment;
pub mod product;
pub mod user;

use crate::error::AppError;

/// Only the owner may mutate a record.
pub(crate) fn ensure_owner(owner_id: &str, caller_id: &str) -> Result<(), AppError> {
    if owner_id == caller_id {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}
