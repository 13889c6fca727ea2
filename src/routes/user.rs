//! /api/users routes.

use crate::handlers::user::sync_user;
use crate::routes::authed;
use crate::state::AppState;
use axum::{routing::post, Router};

pub fn user_routes() -> Router<AppState> {
    Router::new().route("/sync", authed(post(sync_user)))
}
