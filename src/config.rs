//! Process configuration loaded once at startup from the environment.
//!
//! Required: `DATABASE_URL`, `FRONTEND_URL`, and one of `AUTH_JWT_PUBLIC_KEY` (RS256 PEM)
//! or `AUTH_JWT_SECRET` (HS256). Optional: `HOST` (default 0.0.0.0), `PORT` (default 3000),
//! `DATABASE_MAX_CONNECTIONS` (default 5), `AUTH_ISSUER`, `AUTH_AUDIENCE`.

use crate::error::ConfigError;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub frontend_url: String,
    pub host: IpAddr,
    pub port: u16,
    pub auth: AuthConfig,
}

/// How bearer tokens from the identity provider are verified.
#[derive(Clone)]
pub struct AuthConfig {
    pub key: AuthKey,
    pub issuer: Option<String>,
    pub audience: Option<String>,
}

#[derive(Clone)]
pub enum AuthKey {
    /// HS256 shared secret.
    Secret(String),
    /// RS256 public key, PEM encoded.
    RsaPem(String),
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("database_max_connections", &self.database_max_connections)
            .field("frontend_url", &self.frontend_url)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("auth_issuer", &self.auth.issuer)
            .finish()
    }
}

impl Config {
    /// Read from process environment. `main` loads `.env` beforehand.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let required = |key: &'static str| get(key).ok_or(ConfigError::MissingEnvVar(key));

        let database_url = required("DATABASE_URL")?;
        let frontend_url = required("FRONTEND_URL")?.trim_end_matches('/').to_string();
        let host = parse_or("HOST", get("HOST"), IpAddr::V4(Ipv4Addr::UNSPECIFIED))?;
        let port = parse_or("PORT", get("PORT"), 3000u16)?;
        let database_max_connections = parse_or("DATABASE_MAX_CONNECTIONS", get("DATABASE_MAX_CONNECTIONS"), 5u32)?;

        let key = match (get("AUTH_JWT_PUBLIC_KEY"), get("AUTH_JWT_SECRET")) {
            // .env files usually carry the PEM on one line with escaped newlines
            (Some(pem), _) => AuthKey::RsaPem(pem.replace("\\n", "\n")),
            (None, Some(secret)) => AuthKey::Secret(secret),
            (None, None) => return Err(ConfigError::MissingAuthKey),
        };

        Ok(Config {
            database_url,
            database_max_connections,
            frontend_url,
            host,
            port,
            auth: AuthConfig {
                key,
                issuer: get("AUTH_ISSUER"),
                audience: get("AUTH_AUDIENCE"),
            },
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_or<T>(key: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        Some(v) => v.parse().map_err(|e: T::Err| ConfigError::InvalidEnvVar(key, e.to_string())),
        None => Ok(default),
    }
}
