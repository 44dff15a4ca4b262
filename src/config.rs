//! Environment-driven settings

use anyhow::Context;
use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::sync::OnceLock;

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";
const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_MAX_AVATAR_BYTES: usize = 10 * 1024 * 1024;

static SETTINGS: OnceLock<Settings> = OnceLock::new();

#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub max_connections: u32,
    pub bind_address: String,
    pub allowed_origins: Vec<String>,
    /// Upper bound for request bodies, which in practice means avatar uploads.
    pub max_avatar_bytes: usize,
}

impl Settings {
    /// Reads settings from the process environment, loading `.env` first if present.
    pub fn from_env() -> anyhow::Result<Settings> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

        Ok(Settings {
            database_url,
            max_connections: parse_or(
                "DATABASE_MAX_CONNECTIONS",
                env::var("DATABASE_MAX_CONNECTIONS").ok(),
                DEFAULT_MAX_CONNECTIONS,
            )?,
            bind_address: env::var("BIND_ADDRESS")
                .unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_owned()),
            allowed_origins: parse_origins(
                &env::var("ALLOWED_ORIGINS").unwrap_or_else(|_| DEFAULT_ALLOWED_ORIGINS.to_owned()),
            ),
            max_avatar_bytes: parse_or(
                "MAX_AVATAR_BYTES",
                env::var("MAX_AVATAR_BYTES").ok(),
                DEFAULT_MAX_AVATAR_BYTES,
            )?,
        })
    }

    /// Makes these settings the process-wide instance read by DI-built services.
    ///
    /// The first installed instance wins; later calls return it unchanged.
    pub fn install(self) -> &'static Settings {
        SETTINGS.get_or_init(|| self)
    }

    pub fn installed() -> Option<&'static Settings> {
        SETTINGS.get()
    }
}

#[cfg(test)]
pub(crate) fn test_settings() -> Settings {
    Settings {
        database_url: "sqlite::memory:".to_owned(),
        max_connections: 2,
        bind_address: DEFAULT_BIND_ADDRESS.to_owned(),
        allowed_origins: Vec::new(),
        max_avatar_bytes: 1024,
    }
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match raw {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{key} has invalid value {value:?}: {e}")),
        None => Ok(default),
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_owned)
        .collect()
}
