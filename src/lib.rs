//! Marketplace API: products, comments and user sync behind an external identity provider.

pub mod auth;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod response;
pub mod routes;
pub mod state;
pub mod store;

pub use auth::{Identity, TokenVerifier};
pub use config::Config;
pub use error::{AppError, ConfigError};
pub use repository::{PgRepository, Repository, RepositoryError};
pub use state::AppState;
pub use store::{ensure_database_exists, ensure_tables};

use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware, Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

/// Full application router: common routes plus the three resource routers, wrapped in
/// request tracing, CORS for `frontend_url`, and auth-context injection.
pub fn app(state: AppState, frontend_url: &str) -> Result<Router, ConfigError> {
    let origin = HeaderValue::from_str(frontend_url)
        .map_err(|e| ConfigError::InvalidEnvVar("FRONTEND_URL", e.to_string()))?;
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list([origin]))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .allow_credentials(true);

    let router = Router::new()
        .merge(routes::common_routes())
        .nest("/api/users", routes::user_routes())
        .nest("/api/products", routes::product_routes())
        .nest("/api/comments", routes::comment_routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(middleware::from_fn_with_state(state.clone(), auth::auth_context)),
        )
        .with_state(state);
    Ok(router)
}
