//! # API Configuration Module
//!
//! Loads the server configuration from environment variables, with defaults
//! where a value is optional.
//!
//! ## Environment Variables
//!
//! - `API_HOST`: The host address to bind the server to (default: "0.0.0.0")
//! - `API_PORT`: The port to listen on (default: 3000)
//! - `LOG_LEVEL`: Logging level (default: "info")
//! - `API_CORS_ORIGINS`: Comma-separated list of allowed CORS origins
//! - `API_REQUEST_TIMEOUT_SECONDS`: Request timeout (default: 30)
//! - `LAUNDRY_STORE`: Where the ledger lives: `file`, `postgres` or `memory` (default: `file`)
//! - `LAUNDRY_DATA_FILE`: Ledger file for the file store (default: "./data/bookings.json")
//! - `DATABASE_URL`: PostgreSQL connection string (required for the postgres store)
//! - `LAUNDRY_BOOKING_POLICY`: `single` or `dual` (default: `single`)
//! - `LAUNDRY_FULL_SLOTS`: Comma-separated full slot labels (default: "7-10,10-13,13-16,16-19,19-22")
//! - `LAUNDRY_SHORT_SLOTS`: Comma-separated short slot labels

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use eyre::{eyre, Result, WrapErr};
use laundrybook_core::catalog::SlotCatalog;
use laundrybook_core::policy::{BookingPolicy, BookingRules};
use tracing::Level;

pub const DEFAULT_DATA_FILE: &str = "./data/bookings.json";

/// Backing store for the ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StoreKind {
    #[default]
    File,
    Postgres,
    Memory,
}

impl FromStr for StoreKind {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(StoreKind::File),
            "postgres" => Ok(StoreKind::Postgres),
            "memory" => Ok(StoreKind::Memory),
            other => Err(eyre!(
                "unknown store '{other}', expected 'file', 'postgres' or 'memory'"
            )),
        }
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreKind::File => f.write_str("file"),
            StoreKind::Postgres => f.write_str("postgres"),
            StoreKind::Memory => f.write_str("memory"),
        }
    }
}

/// Configuration for the laundry booking server
///
/// # Example
///
/// ```no_run
/// use eyre::Result;
/// use laundrybook_api::config::ApiConfig;
///
/// fn example() -> Result<()> {
///     let config = ApiConfig::from_env()?;
///     println!("Starting server on {}", config.server_addr());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host address for the API server (e.g., "127.0.0.1", "0.0.0.0")
    pub host: String,

    /// Port for the API server to listen on
    pub port: u16,

    /// Log level for the application
    pub log_level: Level,

    /// CORS allowed origins (optional)
    pub cors_origins: Option<Vec<String>>,

    /// Request timeout in seconds
    pub request_timeout: u64,

    pub store: StoreKind,

    pub data_file: PathBuf,

    /// Only read when `store` is [`StoreKind::Postgres`]
    pub database_url: Option<String>,

    pub policy: BookingPolicy,

    /// Raw `LAUNDRY_FULL_SLOTS` list; `None` means the default slots
    pub full_slots: Option<String>,

    /// Raw `LAUNDRY_SHORT_SLOTS` list
    pub short_slots: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: Level::INFO,
            cors_origins: None,
            request_timeout: 30,
            store: StoreKind::default(),
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            database_url: None,
            policy: BookingPolicy::default(),
            full_slots: None,
            short_slots: None,
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl ApiConfig {
    /// Creates a new ApiConfig from environment variables
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The API_PORT or API_REQUEST_TIMEOUT_SECONDS value cannot be parsed
    /// - API_REQUEST_TIMEOUT_SECONDS is 0
    /// - The slot lists do not form a valid catalog
    /// - LAUNDRY_STORE or LAUNDRY_BOOKING_POLICY name an unknown option
    /// - The postgres store is selected and DATABASE_URL is not set
    pub fn from_env() -> Result<Self> {
        // Network settings
        let host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("API_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .wrap_err("Invalid API_PORT value")?;

        // Logging settings
        let log_level = match env::var("LOG_LEVEL")
            .unwrap_or_else(|_| "info".to_string())
            .as_str()
        {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };

        // CORS settings
        let cors_origins = env::var("API_CORS_ORIGINS")
            .ok()
            .map(|origins| origins.split(',').map(|s| s.trim().to_string()).collect());

        // Performance settings
        let request_timeout = env::var("API_REQUEST_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .wrap_err("Invalid API_REQUEST_TIMEOUT_SECONDS value")?;

        // Storage settings
        let store = match non_empty_var("LAUNDRY_STORE") {
            Some(raw) => raw
                .parse::<StoreKind>()
                .wrap_err("Invalid LAUNDRY_STORE value")?,
            None => StoreKind::default(),
        };
        let data_file = non_empty_var("LAUNDRY_DATA_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE));
        let database_url = non_empty_var("DATABASE_URL");
        if store == StoreKind::Postgres && database_url.is_none() {
            return Err(eyre!(
                "DATABASE_URL environment variable must be set for the postgres store"
            ));
        }

        // Booking settings
        let policy = match non_empty_var("LAUNDRY_BOOKING_POLICY") {
            Some(raw) => raw
                .parse::<BookingPolicy>()
                .wrap_err("Invalid LAUNDRY_BOOKING_POLICY value")?,
            None => BookingPolicy::default(),
        };
        let full_slots = non_empty_var("LAUNDRY_FULL_SLOTS");
        let short_slots = non_empty_var("LAUNDRY_SHORT_SLOTS");

        let config = Self {
            host,
            port,
            log_level,
            cors_origins,
            request_timeout,
            store,
            data_file,
            database_url,
            policy,
            full_slots,
            short_slots,
        };
        config.validate()?;

        Ok(config)
    }

    /// Checks values that parse but cannot run a server.
    pub fn validate(&self) -> Result<()> {
        if self.request_timeout == 0 {
            return Err(eyre!(
                "API_REQUEST_TIMEOUT_SECONDS must be at least 1"
            ));
        }
        self.rules()?;
        Ok(())
    }

    /// Returns the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// The slot catalog and policy described by this configuration.
    ///
    /// Without `LAUNDRY_SHORT_SLOTS`, the dual policy offers every full slot
    /// split into one-hour short slots and the single policy offers none.
    pub fn rules(&self) -> Result<BookingRules> {
        let full = match &self.full_slots {
            Some(list) => {
                SlotCatalog::parse_labels(list).wrap_err("Invalid LAUNDRY_FULL_SLOTS value")?
            }
            None => SlotCatalog::default().full_slots().to_vec(),
        };

        let catalog = match (&self.short_slots, self.policy) {
            (Some(list), _) => {
                let short = SlotCatalog::parse_labels(list)
                    .wrap_err("Invalid LAUNDRY_SHORT_SLOTS value")?;
                SlotCatalog::new(full, short)
            }
            (None, BookingPolicy::Dual) => SlotCatalog::hourly_from(full),
            (None, BookingPolicy::Single) => SlotCatalog::new(full, Vec::new()),
        }
        .wrap_err("Invalid slot catalog")?;

        Ok(BookingRules::new(catalog, self.policy))
    }
}
