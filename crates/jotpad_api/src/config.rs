//! Environment-based server configuration.
//!
//! # Responsibility
//! - Collect runtime settings from the process environment (with `.env`
//!   support) and apply documented defaults.
//!
//! # Invariants
//! - Unparseable numeric values fall back to defaults instead of
//!   aborting startup.
//! - The log directory is always absolute, as required by the logging
//!   bootstrap.

use std::env;
use std::path::PathBuf;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_DB_FILE: &str = "jotpad.sqlite3";
const DEFAULT_LOG_SUBDIR: &str = "logs";

/// Runtime configuration for the API server.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind host, `HOST` (default `0.0.0.0`).
    pub host: String,
    /// Bind port, `PORT` (default 5000).
    pub port: u16,
    /// SQLite database path, `JOTPAD_DB` (default `jotpad.sqlite3`).
    pub db_path: PathBuf,
    /// Absolute log directory, `JOTPAD_LOG_DIR`.
    pub log_dir: PathBuf,
    /// Log level, `JOTPAD_LOG_LEVEL` (default per build mode).
    pub log_level: String,
    /// CORS origin whitelist, `ALLOWED_ORIGINS` (comma-separated).
    pub allowed_origins: Vec<String>,
}

impl Config {
    /// Loads configuration from `.env` (if present) and the environment.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT")
            .ok()
            .and_then(|value| value.trim().parse().ok())
            .unwrap_or(DEFAULT_PORT);
        let db_path = env::var("JOTPAD_DB")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DB_FILE));
        let log_dir = env::var("JOTPAD_LOG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_log_dir());
        let log_level = env::var("JOTPAD_LOG_LEVEL")
            .unwrap_or_else(|_| jotpad_core::default_log_level().to_string());
        let allowed_origins = parse_allowed_origins(env::var("ALLOWED_ORIGINS").ok());

        Self {
            host,
            port,
            db_path,
            log_dir,
            log_level,
            allowed_origins,
        }
    }
}

fn default_log_dir() -> PathBuf {
    env::current_dir()
        .unwrap_or_else(|_| env::temp_dir())
        .join(DEFAULT_LOG_SUBDIR)
}

/// Parses the comma-separated CORS whitelist.
///
/// Defaults cover the frontend dev-server origins.
fn parse_allowed_origins(raw: Option<String>) -> Vec<String> {
    let origins: Vec<String> = raw
        .as_deref()
        .unwrap_or("")
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect();

    if origins.is_empty() {
        return vec![
            "http://localhost:5173".to_string(),
            "http://localhost:5174".to_string(),
        ];
    }

    origins
}

#[cfg(test)]
mod tests {
    use super::parse_allowed_origins;

    #[test]
    fn allowed_origins_default_to_dev_frontend() {
        let origins = parse_allowed_origins(None);
        assert_eq!(
            origins,
            vec![
                "http://localhost:5173".to_string(),
                "http://localhost:5174".to_string()
            ]
        );
    }

    #[test]
    fn allowed_origins_split_and_trim() {
        let origins =
            parse_allowed_origins(Some("https://notes.example.com , http://localhost:3000".into()));
        assert_eq!(
            origins,
            vec![
                "https://notes.example.com".to_string(),
                "http://localhost:3000".to_string()
            ]
        );
    }

    #[test]
    fn blank_origin_list_falls_back_to_defaults() {
        let origins = parse_allowed_origins(Some("  ,  ".into()));
        assert_eq!(origins.len(), 2);
    }
}
