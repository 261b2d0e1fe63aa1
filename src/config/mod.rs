//! Configuration module for the HRIS backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::{AddrParseError, SocketAddr};
use std::path::PathBuf;

use crate::client::OrgClient;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Base URL the org chart data loader talks to
    pub api_base_url: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AddrParseError> {
        dotenvy::dotenv().ok();

        let db_path = env::var("HRIS_DB_PATH")
            .unwrap_or_else(|_| "./data/hris.sqlite".to_string())
            .into();

        let bind_addr: SocketAddr = env::var("HRIS_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()?;

        let log_level = env::var("HRIS_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let api_base_url =
            env::var("HRIS_API_BASE_URL").unwrap_or_else(|_| format!("http://{}/api", bind_addr));

        Ok(Self {
            db_path,
            bind_addr,
            log_level,
            api_base_url,
        })
    }

    /// A data loader pointed at the configured API.
    pub fn org_client(&self) -> OrgClient {
        OrgClient::new(self.api_base_url.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        // Single test so env mutation doesn't race
        env::remove_var("HRIS_DB_PATH");
        env::remove_var("HRIS_BIND_ADDR");
        env::remove_var("HRIS_LOG_LEVEL");
        env::remove_var("HRIS_API_BASE_URL");

        let config = Config::from_env().unwrap();

        assert_eq!(config.db_path, PathBuf::from("./data/hris.sqlite"));
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.api_base_url, "http://127.0.0.1:8080/api");
        assert_eq!(config.org_client().base_url(), "http://127.0.0.1:8080/api");

        env::set_var("HRIS_BIND_ADDR", "not-an-address");
        assert!(Config::from_env().is_err());
        env::remove_var("HRIS_BIND_ADDR");
    }
}
