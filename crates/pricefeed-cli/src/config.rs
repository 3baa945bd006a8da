//! Application configuration.

use crate::error::{AppError, AppResult};
use pricefeed_core::PriceFormat;
use pricefeed_sources::peg::PEG_ASSET;
use pricefeed_sources::{primary_source, Endpoints, PEG_SOURCES, PRIMARY_SOURCES};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "PRICEFEED_CONFIG";

/// Configuration file used when neither `--config` nor the env var is set.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// HTTP client settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout (ms). Also bounds the ticker feed collection.
    #[serde(default = "default_http_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_http_timeout_ms() -> u64 {
    10_000
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_http_timeout_ms(),
        }
    }
}

/// Peg-rate consensus settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PegConfig {
    /// Pegged asset the consensus prices. Only USDT has sources.
    #[serde(default = "default_peg_asset")]
    pub asset: String,
    /// Fan-out deadline (ms). Zero polls each source once.
    #[serde(default = "default_peg_deadline_ms")]
    pub deadline_ms: u64,
    /// Peg sources, in registration order.
    #[serde(default = "default_peg_sources")]
    pub sources: Vec<String>,
}

fn default_peg_asset() -> String {
    PEG_ASSET.to_string()
}

fn default_peg_deadline_ms() -> u64 {
    3_000
}

fn default_peg_sources() -> Vec<String> {
    PEG_SOURCES.iter().map(|s| s.to_string()).collect()
}

impl Default for PegConfig {
    fn default() -> Self {
        Self {
            asset: default_peg_asset(),
            deadline_ms: default_peg_deadline_ms(),
            sources: default_peg_sources(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Default log filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Main application configuration. An empty file is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Primary source whose prices are reported.
    #[serde(default = "default_primary")]
    pub primary: String,
    /// Override of the primary source's output convention: "fixed" or "exact".
    #[serde(default)]
    pub price_format: Option<String>,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub peg: PegConfig,
    #[serde(default)]
    pub endpoints: Endpoints,
    /// Symbol table overrides, keyed by primary source name.
    #[serde(default)]
    pub symbols: BTreeMap<String, BTreeMap<String, String>>,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

fn default_primary() -> String {
    "binance".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            primary: default_primary(),
            price_format: None,
            http: HttpConfig::default(),
            peg: PegConfig::default(),
            endpoints: Endpoints::default(),
            symbols: BTreeMap::new(),
            telemetry: TelemetryConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load from `PRICEFEED_CONFIG`, else the default path, else defaults.
    pub fn load() -> AppResult<Self> {
        let config_path =
            std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        if Path::new(&config_path).exists() {
            Self::from_file(&config_path)
        } else {
            tracing::debug!(path = %config_path, "Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load from a specific file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config {path}: {e}")))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> AppResult<Self> {
        toml::from_str(content)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))
    }

    /// Reject names no source is registered under and setups that cannot
    /// produce a conversion rate.
    pub fn validate(&self) -> AppResult<()> {
        if !PRIMARY_SOURCES.contains(&self.primary.as_str()) {
            return Err(AppError::Config(format!(
                "unknown primary source '{}' (expected one of {})",
                self.primary,
                PRIMARY_SOURCES.join(", ")
            )));
        }

        if let Some(name) = self
            .peg
            .sources
            .iter()
            .find(|s| !PEG_SOURCES.contains(&s.as_str()))
        {
            return Err(AppError::Config(format!(
                "unknown peg source '{name}' (expected any of {})",
                PEG_SOURCES.join(", ")
            )));
        }

        if let Some(name) = self
            .symbols
            .keys()
            .find(|s| !PRIMARY_SOURCES.contains(&s.as_str()))
        {
            return Err(AppError::Config(format!(
                "symbol overrides for unknown source '{name}'"
            )));
        }

        self.price_format()?;

        let pegged = primary_source(&self.primary, &self.endpoints, &BTreeMap::new(), 0)
            .and_then(|s| s.quote_unit().pegged_asset().map(str::to_string));
        if let Some(asset) = pegged {
            if asset != self.peg.asset {
                return Err(AppError::Config(format!(
                    "primary source '{}' quotes in {asset} but peg.asset is {}",
                    self.primary, self.peg.asset
                )));
            }
            if self.peg.sources.is_empty() {
                return Err(AppError::Config(format!(
                    "primary source '{}' quotes in {asset}; peg.sources must not be empty",
                    self.primary
                )));
            }
        }

        Ok(())
    }

    /// Configured output convention, if overridden.
    pub fn price_format(&self) -> AppResult<Option<PriceFormat>> {
        self.price_format
            .as_deref()
            .map(|s| s.parse::<PriceFormat>().map_err(|e| AppError::Config(e.to_string())))
            .transpose()
    }

    /// Symbol overrides for the selected primary source.
    pub fn symbol_overrides(&self) -> BTreeMap<String, String> {
        self.symbols.get(&self.primary).cloned().unwrap_or_default()
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_millis(self.http.timeout_ms)
    }

    pub fn peg_deadline(&self) -> Duration {
        Duration::from_millis(self.peg.deadline_ms)
    }
}
