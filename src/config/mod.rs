//! Configuration module for the incident client.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Collection URL of the remote incident store
    pub store_url: String,
    /// Optional API key sent with every request
    pub api_key: Option<String>,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let store_url = env::var("INCIDENT_STORE_URL")
            .unwrap_or_else(|_| "http://localhost:3080/incidents".to_string());

        let api_key = env::var("INCIDENT_API_KEY").ok();

        let log_level = env::var("INCIDENT_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Self {
            store_url,
            api_key,
            log_level,
        }
    }
}
