//! Environment-backed configuration.
//!
//! Everything defaults so a dev instance starts with nothing but
//! `DATABASE_URL` set; the KAMIS cert pair is optional because the client
//! can run against a stub base URL in tests.

use anyhow::{Context, Result};
use std::env;

use crate::db::DbPoolConfig;

pub const DEFAULT_KAMIS_BASE_URL: &str = "https://www.kamis.or.kr";
/// Outbound market-price lookups are cancelled after this long and treated
/// as "no data found".
pub const DEFAULT_KAMIS_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct KamisConfig {
    pub base_url: String,
    pub cert_id: Option<String>,
    pub cert_key: Option<String>,
    pub timeout_secs: u64,
}

impl KamisConfig {
    pub fn from_env() -> Self {
        Self {
            base_url: env::var("KAMIS_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_KAMIS_BASE_URL.to_string()),
            cert_id: env::var("KAMIS_CERT_ID").ok(),
            cert_key: env::var("KAMIS_CERT_KEY").ok(),
            timeout_secs: env::var("KAMIS_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_KAMIS_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub kamis: KamisConfig,
    pub db_pool: DbPoolConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
            database_url: env::var("DATABASE_URL")
                .context("DATABASE_URL environment variable must be set")?,
            kamis: KamisConfig::from_env(),
            db_pool: DbPoolConfig::from_env_with_defaults(DbPoolConfig::default()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kamis_defaults() {
        // Not reading the process env here; defaults are what matter
        let config = KamisConfig {
            base_url: DEFAULT_KAMIS_BASE_URL.to_string(),
            cert_id: None,
            cert_key: None,
            timeout_secs: DEFAULT_KAMIS_TIMEOUT_SECS,
        };
        assert_eq!(config.timeout_secs, 30);
        assert!(config.base_url.starts_with("https://"));
    }
}
