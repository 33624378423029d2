use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::{env, str::FromStr};

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,
    pub access_token_ttl: usize,

    // Rate limiting
    pub rate_login_per_min: u32,
    pub rate_register_per_min: u32,
    pub rate_protected_per_min: u32,

    pub api_prefix: String,
    /// Browser origins allowed to call the API; `*` allows any.
    pub cors_origins: Vec<String>,

    pub log_dir: String,
    pub log_level: tracing::Level,
}

/// Reads `key`, falling back to `default` when unset.
fn env_or<T>(key: &str, default: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .with_context(|| format!("{} has an invalid value", key))
}

/// Database location alone, for tools that never serve HTTP.
pub fn database_url() -> Result<String> {
    dotenv().ok();
    env_or("DATABASE_URL", "sqlite://hr_management.db")
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_addr: env_or("SERVER_ADDR", "127.0.0.1:3001")?,
            database_url: database_url()?,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            access_token_ttl: env_or("ACCESS_TOKEN_TTL", "86400")?, // 24h

            rate_login_per_min: env_or("RATE_LOGIN_PER_MIN", "60")?,
            rate_register_per_min: env_or("RATE_REGISTER_PER_MIN", "30")?,
            rate_protected_per_min: env_or("RATE_PROTECTED_PER_MIN", "1000")?,

            api_prefix: env_or("API_PREFIX", "/api")?,
            cors_origins: env_or::<String>("CORS_ORIGINS", "http://localhost:3000")?
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(String::from)
                .collect(),

            log_dir: env_or("LOG_DIR", "logs")?,
            log_level: env_or("LOG_LEVEL", "debug")?,
        })
    }
}
