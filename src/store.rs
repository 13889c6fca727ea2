//! Database bootstrap: create the database if missing and the marketplace tables (idempotent DDL).

use crate::repository::RepositoryError;
use sqlx::postgres::PgConnectOptions;
use sqlx::ConnectOptions;
use sqlx::PgPool;
use std::str::FromStr;

/// Tables in creation order. `comments` references `products` and is dropped with it.
const TABLES: &[(&str, &str)] = &[
    (
        "users",
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            email TEXT NOT NULL,
            name TEXT NOT NULL,
            image_url TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
    (
        "products",
        r#"
        CREATE TABLE IF NOT EXISTS products (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            image_url TEXT NOT NULL,
            user_id TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
    (
        "comments",
        r#"
        CREATE TABLE IF NOT EXISTS comments (
            id TEXT PRIMARY KEY,
            content TEXT NOT NULL,
            product_id TEXT NOT NULL REFERENCES products(id) ON DELETE CASCADE,
            user_id TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
];

const INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS products_user_id_idx ON products (user_id)",
    "CREATE INDEX IF NOT EXISTS comments_product_id_idx ON comments (product_id)",
];

/// Create users, products and comments tables plus lookup indexes.
pub async fn ensure_tables(pool: &PgPool) -> Result<(), RepositoryError> {
    for (name, ddl) in TABLES {
        tracing::debug!(table = name, "ensure table");
        sqlx::query(ddl).execute(pool).await?;
    }
    for ddl in INDEXES {
        sqlx::query(ddl).execute(pool).await?;
    }
    Ok(())
}

/// Connect to the server's `postgres` database and create the target database if it does not exist.
/// An unreachable admin database is logged, not fatal; the pool connection reports a missing target.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), RepositoryError> {
    let Some((admin, db_name)) = admin_options(database_url)? else {
        return Ok(());
    };
    let mut conn: sqlx::PgConnection = match admin.connect().await {
        Ok(conn) => conn,
        Err(e) => {
            tracing::warn!(error = %e, database = %db_name, "admin connection failed; skipping database creation");
            return Ok(());
        }
    };
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

/// Options for the server's `postgres` database, keeping host, credentials and TLS settings,
/// plus the target database name. None when the URL names no database or names `postgres`.
fn admin_options(database_url: &str) -> Result<Option<(PgConnectOptions, String)>, RepositoryError> {
    let opts = PgConnectOptions::from_str(database_url)?;
    let db_name = match opts.get_database() {
        Some(name) if !name.is_empty() && name != "postgres" => name.to_string(),
        _ => return Ok(None),
    };
    Ok(Some((opts.database("postgres"), db_name)))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
