//! Environment driven configuration.
//!
//! Values are read from the process environment after an optional `.env`
//! file has been loaded. Anything left unset falls back to a local
//! development default.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use sqlx::postgres::{PgConnectOptions, PgSslMode};

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8088";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 64 * 1024;

#[derive(Clone)]
pub struct Config {
    pub listen_addr: String,
    pub http: HttpConfig,
    pub database: DatabaseConfig,
    /// OTLP collector endpoint. Export is disabled when unset.
    pub otlp_endpoint: Option<String>,
}

/// Limits applied to every inbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    pub request_timeout: Duration,
    pub body_limit: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            body_limit: DEFAULT_BODY_LIMIT_BYTES,
        }
    }
}

#[derive(Clone)]
pub struct DatabaseConfig {
    /// Full connection string, takes precedence over the individual fields.
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub ssl_mode: PgSslMode,
    pub pool_size: u32,
    pub acquire_timeout: Duration,
    pub run_migrations: bool,
}

impl DatabaseConfig {
    pub fn connect_options(&self) -> anyhow::Result<PgConnectOptions> {
        if let Some(url) = &self.url {
            return PgConnectOptions::from_str(url)
                .context("DATABASE_URL is not a valid connection string");
        }

        Ok(PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name)
            .ssl_mode(self.ssl_mode))
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let text = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let http = HttpConfig {
            request_timeout: Duration::from_secs(parse(
                &lookup,
                "REQUEST_TIMEOUT_SECS",
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )?),
            body_limit: parse(&lookup, "BODY_LIMIT_BYTES", DEFAULT_BODY_LIMIT_BYTES)?,
        };

        let database = DatabaseConfig {
            url: lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()),
            host: text("DB_HOST", "localhost"),
            port: parse(&lookup, "DB_PORT", 5432)?,
            user: text("DB_USER", "newuser"),
            password: text("DB_PASSWORD", "1234"),
            name: text("DB_NAME", "newdb"),
            ssl_mode: parse(&lookup, "DB_SSLMODE", PgSslMode::Disable)?,
            pool_size: parse(&lookup, "DB_POOL_SIZE", 10)?,
            acquire_timeout: Duration::from_secs(parse(&lookup, "DB_ACQUIRE_TIMEOUT_SECS", 5)?),
            run_migrations: parse(&lookup, "RUN_MIGRATIONS", true)?,
        };

        if database.pool_size == 0 {
            anyhow::bail!("DB_POOL_SIZE must be at least 1");
        }
        if database.acquire_timeout.is_zero() {
            anyhow::bail!("DB_ACQUIRE_TIMEOUT_SECS must be at least 1");
        }
        if http.request_timeout.is_zero() {
            anyhow::bail!("REQUEST_TIMEOUT_SECS must be at least 1");
        }

        Ok(Self {
            listen_addr: text("LISTEN_ADDR", DEFAULT_LISTEN_ADDR),
            http,
            database,
            otlp_endpoint: lookup("OTEL_EXPORTER_OTLP_ENDPOINT").filter(|e| !e.trim().is_empty()),
        })
    }
}

fn parse<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid value for {key}: {raw:?}")),
        None => Ok(default),
    }
}
