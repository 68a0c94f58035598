use std::env;
use std::path::PathBuf;

use crate::query::DEFAULT_PAGE_SIZE;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deployment {
    Local,
    Dev,
    Stage,
    Prod,
}

impl Deployment {
    #[must_use]
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "dev" | "development" => Self::Dev,
            "stage" | "staging" => Self::Stage,
            "prod" | "production" => Self::Prod,
            _ => Self::Local,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    // Database
    pub database_url: String,

    // API settings
    pub api_host: String,
    pub api_port: u16,
    pub page_size: u64,

    // Rate limiting
    pub disable_rate_limiting: bool,
    pub rate_limit_records_per_second: u64,
    pub rate_limit_records_burst: u32,
    pub rate_limit_summary_per_second: u64,
    pub rate_limit_summary_burst: u32,

    // Import
    pub gbfs_base_url: String,
    pub import_stations_on_startup: bool,
    pub trips_csv_path: Option<PathBuf>,
    pub import_retry_max: u32,
    pub import_retry_delay_seconds: u64,

    // Application metadata
    pub deployment: Deployment,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if required environment variables are not set.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            // Database
            database_url: env::var("DATABASE_URL")
                .map_err(|_| ConfigError::Missing("DATABASE_URL"))?,

            // API settings
            api_host: env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            api_port: parse_or("API_PORT", 3000),
            page_size: parse_or("PAGE_SIZE", DEFAULT_PAGE_SIZE).max(1),

            // Rate limiting
            disable_rate_limiting: parse_or("DISABLE_RATE_LIMITING", false),
            rate_limit_records_per_second: parse_or("RATE_LIMIT_RECORDS_PER_SECOND", 10),
            rate_limit_records_burst: parse_or("RATE_LIMIT_RECORDS_BURST", 60),
            rate_limit_summary_per_second: parse_or("RATE_LIMIT_SUMMARY_PER_SECOND", 2),
            rate_limit_summary_burst: parse_or("RATE_LIMIT_SUMMARY_BURST", 20),

            // Import
            gbfs_base_url: env::var("GBFS_BASE_URL")
                .unwrap_or_else(|_| "https://gbfs.bluebikes.com/gbfs/en".to_string()),
            import_stations_on_startup: parse_or("IMPORT_STATIONS_ON_STARTUP", false),
            trips_csv_path: env::var("TRIPS_CSV_PATH")
                .ok()
                .filter(|path| !path.trim().is_empty())
                .map(PathBuf::from),
            import_retry_max: parse_or("IMPORT_RETRY_MAX", 3),
            import_retry_delay_seconds: parse_or("IMPORT_RETRY_DELAY_SECONDS", 30),

            // Application metadata
            deployment: Deployment::from_str(
                &env::var("DEPLOYMENT").unwrap_or_else(|_| "local".to_string()),
            ),
        })
    }

    /// Defaults for everything except the database URL.
    #[must_use]
    pub fn with_database_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            api_host: "0.0.0.0".to_string(),
            api_port: 3000,
            page_size: DEFAULT_PAGE_SIZE,
            disable_rate_limiting: false,
            rate_limit_records_per_second: 10,
            rate_limit_records_burst: 60,
            rate_limit_summary_per_second: 2,
            rate_limit_summary_burst: 20,
            gbfs_base_url: "https://gbfs.bluebikes.com/gbfs/en".to_string(),
            import_stations_on_startup: false,
            trips_csv_path: None,
            import_retry_max: 3,
            import_retry_delay_seconds: 30,
            deployment: Deployment::Local,
        }
    }

    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api_host, self.api_port)
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
