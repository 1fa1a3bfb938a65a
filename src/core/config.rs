use crate::models::address::Address;
use crate::models::user::BiometricToken;
use crate::stores::user_registry::{
    RegistrySettings, DEFAULT_FAILED_ATTEMPT_THRESHOLD, DEFAULT_TRANSFER_WINDOW,
};
use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub registry: RegistryConfig,
    pub security: SecurityConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_num_threads")]
    pub num_threads: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegistryConfig {
    /// Hex address of the initial admin
    pub owner_address: String,
    /// Hex biometric reference of the initial owner
    #[serde(default)]
    pub owner_biometric: Option<String>,
    #[serde(default = "default_failed_attempt_threshold")]
    pub failed_attempt_threshold: u32,
    #[serde(default)]
    pub lockout_on_threshold: bool,
    #[serde(default = "default_alert_log_capacity")]
    pub alert_log_capacity: usize,
    #[serde(default = "default_transfer_window_secs")]
    pub transfer_window_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    /// Shared secret of the gateway that attests callers
    pub api_key: String,
    #[serde(default = "default_max_verifications_per_minute")]
    pub max_verifications_per_minute: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub console: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            console: false,
        }
    }
}

// Default value functions
fn default_port() -> u16 {
    8080
}

fn default_num_threads() -> usize {
    num_cpus::get()
}

fn default_failed_attempt_threshold() -> u32 {
    DEFAULT_FAILED_ATTEMPT_THRESHOLD
}

fn default_alert_log_capacity() -> usize {
    1024
}

fn default_transfer_window_secs() -> u64 {
    DEFAULT_TRANSFER_WINDOW
}

fn default_max_verifications_per_minute() -> u32 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

impl RegistryConfig {
    pub fn owner(&self) -> Result<Address> {
        self.owner_address
            .parse::<Address>()
            .map_err(|e| anyhow!("Invalid owner_address '{}': {}", self.owner_address, e))
    }

    pub fn owner_biometric(&self) -> Result<Option<BiometricToken>> {
        let Some(encoded) = &self.owner_biometric else {
            return Ok(None);
        };
        let token = BiometricToken::from_hex(encoded)
            .map_err(|e| anyhow!("Invalid owner_biometric: {}", e))?;
        if token.is_empty() {
            bail!("owner_biometric must not be empty");
        }
        Ok(Some(token))
    }

    pub fn settings(&self) -> Result<RegistrySettings> {
        Ok(RegistrySettings {
            owner: self.owner()?,
            owner_biometric: self.owner_biometric()?,
            failed_attempt_threshold: self.failed_attempt_threshold,
            lockout_on_threshold: self.lockout_on_threshold,
            transfer_window: self.transfer_window_secs,
        })
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Failed to parse config file")?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            bail!("Server port must be greater than 0");
        }

        if self.server.num_threads == 0 {
            bail!("num_threads must be greater than 0");
        }

        let owner = self.registry.owner()?;
        if owner.is_zero() {
            bail!("owner_address must not be the zero address");
        }

        if self.registry.failed_attempt_threshold == 0 {
            bail!("failed_attempt_threshold must be greater than 0");
        }

        self.registry.owner_biometric()?;

        if self.registry.alert_log_capacity == 0 {
            bail!("alert_log_capacity must be greater than 0");
        }

        if self.registry.transfer_window_secs == 0 {
            bail!("transfer_window_secs must be greater than 0");
        }

        if self.security.api_key.is_empty() {
            bail!("api_key must not be empty");
        }

        if self.security.max_verifications_per_minute == 0 {
            bail!("max_verifications_per_minute must be greater than 0");
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            bail!(
                "Invalid log level '{}'. Must be one of: trace, debug, info, warn, error",
                self.logging.level
            );
        }

        let valid_formats = ["json", "console"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            bail!(
                "Invalid log format '{}'. Must be one of: json, console",
                self.logging.format
            );
        }

        Ok(())
    }
}
