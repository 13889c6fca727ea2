//! Server binary: load config, bootstrap the database, serve the API.

use marketplace_api::{app, ensure_database_exists, ensure_tables, AppState, Config, PgRepository, TokenVerifier};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("marketplace_api=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;
    tracing::debug!(?config, "configuration loaded");

    ensure_database_exists(&config.database_url).await?;
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await?;
    ensure_tables(&pool).await?;

    let verifier = TokenVerifier::new(&config.auth)?;
    let state = AppState::new(Arc::new(PgRepository::new(pool)), verifier);
    let router = app(state, &config.frontend_url)?;

    let listener = TcpListener::bind(config.socket_addr()).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router).await?;
    Ok(())
}
