//! Configuration management with TOML, environment variables, and CLI overrides.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Name of the storefront session cookie
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// Cart endpoint receiving order posts
    #[serde(default = "default_cart_url")]
    pub cart_url: String,

    /// Timeout for every HTTP request, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// First shopping-list row in the worksheet
    #[serde(default = "default_first_row")]
    pub first_row: u32,

    /// Last shopping-list row in the worksheet (inclusive)
    #[serde(default = "default_max_rows")]
    pub max_rows: u32,

    /// Service-account key file for the Sheets API
    #[serde(default = "default_google_api_auth")]
    pub google_api_auth: PathBuf,

    /// Sheets API base URL
    #[serde(default = "default_sheets_api_url")]
    pub sheets_api_url: String,

    /// Output format
    #[serde(default)]
    pub format: OutputFormat,
}

fn default_cookie_name() -> String {
    "4every1_ses".to_string()
}

fn default_cart_url() -> String {
    "https://www.grizly.cz/kosik".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_first_row() -> u32 {
    4
}

fn default_max_rows() -> u32 {
    200
}

fn default_google_api_auth() -> PathBuf {
    PathBuf::from("google_api_auth.json")
}

fn default_sheets_api_url() -> String {
    "https://sheets.googleapis.com".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            cart_url: default_cart_url(),
            timeout_secs: default_timeout_secs(),
            first_row: default_first_row(),
            max_rows: default_max_rows(),
            google_api_auth: default_google_api_auth(),
            sheets_api_url: default_sheets_api_url(),
            format: OutputFormat::Table,
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        let local_config = Path::new("grizly-orders.toml");
        if local_config.exists() {
            debug!("Found grizly-orders.toml in current directory");
            return Self::from_file(local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("grizly-orders").join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides.
    pub fn with_env(mut self) -> Self {
        if let Ok(timeout) = std::env::var("GRIZLY_TIMEOUT") {
            if let Ok(t) = timeout.parse() {
                self.timeout_secs = t;
            }
        }

        if let Ok(max_rows) = std::env::var("GRIZLY_MAX_ROWS") {
            if let Ok(m) = max_rows.parse() {
                self.max_rows = m;
            }
        }

        if let Ok(cart_url) = std::env::var("GRIZLY_CART_URL") {
            self.cart_url = cart_url;
        }

        if let Ok(auth) = std::env::var("GOOGLE_API_AUTH") {
            self.google_api_auth = PathBuf::from(auth);
        }

        self
    }

    /// Checks the row window is usable.
    pub fn validate(&self) -> Result<()> {
        if self.first_row == 0 {
            anyhow::bail!("first_row must be at least 1");
        }
        if self.max_rows < self.first_row {
            anyhow::bail!(
                "max_rows ({}) must not be below first_row ({})",
                self.max_rows,
                self.first_row
            );
        }
        Ok(())
    }
}

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use: table, json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
