//! Configuration loading, validation, and management for Lifeline.
//!
//! Loads configuration from `~/.lifeline/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use lifeline_core::ThresholdClassifier;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Multiplier used when the config does not set a usable one.
pub const DEFAULT_LOW_COMPUTE_MULTIPLIER: f64 = 4.0;

/// The root configuration structure.
///
/// Maps directly to `~/.lifeline/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Account whose balance drives each cycle (none = skip balance lookup)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_address: Option<String>,

    /// Downstream compute scale factor under scarcity (default 4)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low_compute_multiplier: Option<f64>,

    /// Balance source configuration
    #[serde(default)]
    pub balance: BalanceConfig,

    /// Survival tier thresholds
    #[serde(default)]
    pub tiers: TierConfig,

    /// Heartbeat configuration
    #[serde(default)]
    pub heartbeat: HeartbeatConfig,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct BalanceConfig {
    /// JSON-RPC endpoint queried for the token balance
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,

    /// ERC-20 contract holding the account's funds
    #[serde(default = "default_token_contract")]
    pub token_contract: String,

    /// Token decimals (USDC = 6)
    #[serde(default = "default_decimals")]
    pub decimals: u32,

    /// Request timeout for a single balance lookup
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_rpc_url() -> String {
    "https://mainnet.base.org".into()
}
fn default_token_contract() -> String {
    // USDC on Base
    "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913".into()
}
fn default_decimals() -> u32 {
    6
}
fn default_timeout_secs() -> u64 {
    15
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            token_contract: default_token_contract(),
            decimals: default_decimals(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Hosted RPC providers put the API key in the path or query string, so
/// Debug output only shows scheme and host.
fn redact_url(url: &str) -> String {
    let Some(scheme_end) = url.find("://") else {
        return "[REDACTED]".into();
    };
    let rest = &url[scheme_end + 3..];
    match rest.find(['/', '?']) {
        Some(idx) if idx + 1 < rest.len() => {
            format!("{}/[REDACTED]", &url[..scheme_end + 3 + idx])
        }
        _ => url.to_string(),
    }
}

impl std::fmt::Debug for BalanceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BalanceConfig")
            .field("rpc_url", &redact_url(&self.rpc_url))
            .field("token_contract", &self.token_contract)
            .field("decimals", &self.decimals)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Credit thresholds, in cents. A balance strictly above a threshold
/// reaches that tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierConfig {
    #[serde(default = "default_high")]
    pub high: u64,

    #[serde(default = "default_normal")]
    pub normal: u64,

    #[serde(default = "default_low_compute")]
    pub low_compute: u64,
}

fn default_high() -> u64 {
    500
}
fn default_normal() -> u64 {
    50
}
fn default_low_compute() -> u64 {
    10
}

impl Default for TierConfig {
    fn default() -> Self {
        Self {
            high: default_high(),
            normal: default_normal(),
            low_compute: default_low_compute(),
        }
    }
}

impl TierConfig {
    pub fn classifier(&self) -> ThresholdClassifier {
        ThresholdClassifier {
            high: self.high,
            normal: self.normal,
            low_compute: self.low_compute,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeartbeatConfig {
    #[serde(default = "default_heartbeat_interval")]
    pub interval_seconds: u64,
}

fn default_heartbeat_interval() -> u64 {
    60
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self {
            interval_seconds: default_heartbeat_interval(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.lifeline/config.toml).
    ///
    /// Environment variables override the file:
    /// - `LIFELINE_ACCOUNT_ADDRESS`
    /// - `LIFELINE_RPC_URL`
    /// - `LIFELINE_LOW_COMPUTE_MULTIPLIER`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from an environment lookup (highest priority).
    fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(address) = lookup("LIFELINE_ACCOUNT_ADDRESS") {
            self.account_address = Some(address);
        }

        if let Some(url) = lookup("LIFELINE_RPC_URL") {
            self.balance.rpc_url = url;
        }

        if let Some(raw) = lookup("LIFELINE_LOW_COMPUTE_MULTIPLIER") {
            let multiplier = raw.trim().parse::<f64>().map_err(|_| {
                ConfigError::ValidationError(format!(
                    "LIFELINE_LOW_COMPUTE_MULTIPLIER is not a number: {raw}"
                ))
            })?;
            self.low_compute_multiplier = Some(multiplier);
        }

        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".lifeline")
    }

    /// Get the state directory handed to each cycle as its storage handle.
    pub fn state_dir() -> PathBuf {
        Self::config_dir().join("state")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(m) = self.low_compute_multiplier {
            if !m.is_finite() || m <= 0.0 {
                return Err(ConfigError::ValidationError(
                    "low_compute_multiplier must be a positive number".into(),
                ));
            }
        }

        let tiers = &self.tiers;
        if !(tiers.high > tiers.normal && tiers.normal > tiers.low_compute) {
            return Err(ConfigError::ValidationError(
                "tier thresholds must satisfy high > normal > low_compute".into(),
            ));
        }

        if self.heartbeat.interval_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "heartbeat.interval_seconds must be > 0".into(),
            ));
        }

        if self.balance.decimals > 36 {
            return Err(ConfigError::ValidationError(
                "balance.decimals must be <= 36".into(),
            ));
        }

        Ok(())
    }

    /// The effective low-compute multiplier: the configured value when it is
    /// positive, otherwise [`DEFAULT_LOW_COMPUTE_MULTIPLIER`].
    pub fn low_compute_multiplier(&self) -> f64 {
        match self.low_compute_multiplier {
            Some(m) if m.is_finite() && m > 0.0 => m,
            Some(m) => {
                tracing::warn!(
                    configured = m,
                    "Ignoring non-positive low_compute_multiplier, using default"
                );
                DEFAULT_LOW_COMPUTE_MULTIPLIER
            }
            None => DEFAULT_LOW_COMPUTE_MULTIPLIER,
        }
    }

    /// Generate a default config TOML string (for `init` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            account_address: None,
            low_compute_multiplier: None,
            balance: BalanceConfig::default(),
            tiers: TierConfig::default(),
            heartbeat: HeartbeatConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
