//! /api/comments routes. The segment is a product id for POST and a comment id for DELETE.

use crate::handlers::comment::{create_comment, delete_comment};
use crate::routes::authed;
use crate::state::AppState;
use axum::{routing::post, Router};

pub fn comment_routes() -> Router<AppState> {
    Router::new().route("/:id", authed(post(create_comment).delete(delete_comment)))
}
