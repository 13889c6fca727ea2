//! Route tables. Mutating routes carry the [`authed`] marker.

pub mod comment;
pub mod common;
pub mod product;
pub mod user;

pub use comment::comment_routes;
pub use common::common_routes;
pub use product::product_routes;
pub use user::user_routes;

use crate::auth::require_auth;
use crate::state::AppState;
use axum::{middleware, routing::MethodRouter};

/// Reject anonymous callers on these methods with 401.
pub fn authed(route: MethodRouter<AppState>) -> MethodRouter<AppState> {
    route.route_layer(middleware::from_fn(require_auth))
}
