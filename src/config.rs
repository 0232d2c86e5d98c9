use anyhow::{bail, Context};
use tracing::warn;

use crate::messages::Messages;

/// Signing secret used when `JWT_SECRET` is not configured.
/// Tokens signed with it can be forged by anyone who reads this file.
pub const INSECURE_DEFAULT_SECRET: &str = "default_secret_key";

/// Accepted range for `JWT_TTL_DAYS`.
pub const TTL_DAYS_RANGE: std::ops::RangeInclusive<i64> = 1..=365;

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_days: i64,
}

impl JwtConfig {
    pub fn uses_insecure_default(&self) -> bool {
        self.secret == INSECURE_DEFAULT_SECRET
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
    pub db_max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub server: ServerConfig,
    pub messages: Messages,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .context("DATABASE_URL must be set")?;

        let secret = match std::env::var("JWT_SECRET") {
            Ok(v) if !v.is_empty() => v,
            _ => {
                warn!(
                    "JWT_SECRET is not set; falling back to the built-in default secret. \
                     Tokens are forgeable until a real secret is configured"
                );
                INSECURE_DEFAULT_SECRET.to_string()
            }
        };

        let ttl_days = parse_or("JWT_TTL_DAYS", 7);
        if !TTL_DAYS_RANGE.contains(&ttl_days) {
            bail!(
                "JWT_TTL_DAYS must be between {} and {}, got {ttl_days}",
                TTL_DAYS_RANGE.start(),
                TTL_DAYS_RANGE.end()
            );
        }
        let jwt = JwtConfig { secret, ttl_days };

        let server = ServerConfig {
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: parse_or("APP_PORT", 8080),
            request_timeout_secs: parse_or("REQUEST_TIMEOUT_SECS", 10),
            db_max_connections: parse_or("DB_MAX_CONNECTIONS", 10),
        };

        let messages = match std::env::var("APP_LOCALE").as_deref() {
            Ok("en") => Messages::english(),
            Ok("ru") | Err(_) => Messages::russian(),
            Ok(other) => {
                warn!(locale = %other, "unknown APP_LOCALE; using ru");
                Messages::russian()
            }
        };

        Ok(Self {
            database_url,
            jwt,
            server,
            messages,
        })
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}
