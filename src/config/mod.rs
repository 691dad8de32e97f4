//! Configuration module for the dashboard.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::errors::AppError;

/// Client-side timeout applied to every REST call unless overridden.
pub const DEFAULT_API_TIMEOUT: Duration = Duration::from_secs(10);

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the REST backend, without a trailing slash
    pub api_url: String,
    /// Timeout for a single REST call
    pub api_timeout: Duration,
    /// Directory backing the local storage (session, theme, budget cache)
    pub storage_dir: PathBuf,
    /// Directory CSV exports are saved to
    pub export_dir: PathBuf,
    /// Rows per table page
    pub page_size: usize,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:8080/api".to_string(),
            api_timeout: DEFAULT_API_TIMEOUT,
            storage_dir: "./data/storage".into(),
            export_dir: "./exports".into(),
            page_size: 10,
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let defaults = Config::default();

        let api_url = env::var("YOUTH_API_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_url);

        let api_timeout = match env::var("YOUTH_API_TIMEOUT_SECS") {
            Ok(raw) => Duration::from_secs(parse_number("YOUTH_API_TIMEOUT_SECS", &raw)?),
            Err(_) => defaults.api_timeout,
        };

        let storage_dir = env::var("YOUTH_STORAGE_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.storage_dir);

        let export_dir = env::var("YOUTH_EXPORT_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.export_dir);

        let page_size = match env::var("YOUTH_PAGE_SIZE") {
            Ok(raw) => parse_number::<usize>("YOUTH_PAGE_SIZE", &raw)?.max(1),
            Err(_) => defaults.page_size,
        };

        let log_level = env::var("YOUTH_LOG_LEVEL").unwrap_or(defaults.log_level);

        let log_format = match env::var("YOUTH_LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            Ok("pretty") | Err(_) => LogFormat::Pretty,
            Ok(other) => {
                return Err(AppError::Config(format!(
                    "Invalid YOUTH_LOG_FORMAT '{}', expected 'pretty' or 'json'",
                    other
                )))
            }
        };

        Ok(Self {
            api_url,
            api_timeout,
            storage_dir,
            export_dir,
            page_size,
            log_level,
            log_format,
        })
    }
}

fn parse_number<N: std::str::FromStr>(name: &str, raw: &str) -> Result<N, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::Config(format!("Invalid {} value '{}'", name, raw)))
}
