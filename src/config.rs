use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    /// Upper bound for pool acquisition and for every store call.
    pub timeout_seconds: u64,
}

impl DatabaseConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database = DatabaseConfig {
            url: database_url_from_env()?,
            max_connections: parse_env("DB_MAX_CONNECTIONS").unwrap_or(10),
            timeout_seconds: parse_env("DB_TIMEOUT_SECONDS").unwrap_or(5),
        };
        let jwt = JwtConfig {
            secret: require_secret(std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?)?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "cuentas".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "cuentas-users".into()),
            ttl_minutes: parse_env("JWT_TTL_MINUTES").unwrap_or(DEFAULT_TOKEN_TTL_MINUTES),
        };
        if jwt.ttl_minutes != DEFAULT_TOKEN_TTL_MINUTES {
            tracing::warn!(
                ttl_minutes = jwt.ttl_minutes,
                "JWT_TTL_MINUTES overrides the standard one-hour token lifetime"
            );
        }
        let host = std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = parse_env("APP_PORT")
            .or_else(|| parse_env("PORT"))
            .unwrap_or(3001);
        Ok(Self {
            database,
            jwt,
            host,
            port,
        })
    }
}

/// Tokens live one hour unless an operator overrides `JWT_TTL_MINUTES`.
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 60;

/// An empty HMAC key would sign tokens anyone can forge.
fn require_secret(secret: String) -> anyhow::Result<String> {
    if secret.trim().is_empty() {
        anyhow::bail!("JWT_SECRET must not be empty");
    }
    Ok(secret)
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse::<T>().ok())
}

/// `DATABASE_URL` wins; otherwise the URL is assembled from the discrete
/// `DB_*` variables.
fn database_url_from_env() -> anyhow::Result<String> {
    if let Ok(url) = std::env::var("DATABASE_URL") {
        return Ok(url);
    }
    let host = std::env::var("DB_HOST").context("DATABASE_URL or DB_HOST must be set")?;
    let user = std::env::var("DB_USER").context("DB_USER must be set")?;
    let password = std::env::var("DB_PASSWORD").unwrap_or_default();
    let name = std::env::var("DB_NAME").context("DB_NAME must be set")?;
    let port: u16 = parse_env("DB_PORT").unwrap_or(5432);
    Ok(assemble_database_url(&host, port, &user, &password, &name))
}

fn assemble_database_url(host: &str, port: u16, user: &str, password: &str, name: &str) -> String {
    if password.is_empty() {
        format!("postgres://{user}@{host}:{port}/{name}")
    } else {
        format!("postgres://{user}:{password}@{host}:{port}/{name}")
    }
}
