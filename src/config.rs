use std::env;

use crate::auth::password::{MAX_COST, MIN_COST};
use crate::error::AppError;

/// Runtime configuration read from the environment (after `dotenv` has loaded `.env`).
#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string. When absent the in-memory store is used.
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub server_port: u16,
    pub server_host: String,
    /// HMAC secret signing session cookies.
    pub session_secret: String,
    pub session_ttl_hours: i64,
    /// bcrypt work factor for password digests.
    pub bcrypt_cost: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let session_secret = lookup("SESSION_SECRET")
            .filter(|secret| !secret.is_empty())
            .ok_or_else(|| AppError::Internal("SESSION_SECRET must be set".into()))?;

        let bcrypt_cost = parse_or(&lookup, "BCRYPT_COST", 4u32)?;
        if !(MIN_COST..=MAX_COST).contains(&bcrypt_cost) {
            return Err(AppError::Internal(format!(
                "BCRYPT_COST must be between {} and {}",
                MIN_COST, MAX_COST
            )));
        }

        Ok(Self {
            database_url: lookup("DATABASE_URL").filter(|url| !url.is_empty()),
            database_max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 5)?,
            server_port: parse_or(&lookup, "SERVER_PORT", 8080)?,
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            session_secret,
            session_ttl_hours: parse_or(&lookup, "SESSION_TTL_HOURS", 24)?,
            bcrypt_cost,
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Internal(format!("{} must be a number", key))),
        None => Ok(default),
    }
}
