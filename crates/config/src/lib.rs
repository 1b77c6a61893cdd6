#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for semgate
//!
//! This crate handles loading and merging configuration from:
//! - Default values (hard-coded)
//! - Configuration file (~/.config/semgate/config.toml)
//! - Environment variables
//! - CLI flags (applied by the binary)

pub mod constants;

use serde::{Deserialize, Serialize};
use semgate_errors::{ConfigError, Error};
use semgate_resources::{GateLimits, IntoGateLimits};
use semgate_types::{ColorChoice, OutputFormat, ReleasePolicy};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub gate: GateConfig,

    #[serde(default)]
    pub printer: PrinterConfig,

    #[serde(default)]
    pub tables: TablesConfig,
}

/// General configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_output_format")]
    pub default_output: OutputFormat,
    #[serde(default = "default_color_choice")]
    pub color: ColorChoice,
}

/// Gate behaviour shared by every demo
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GateConfig {
    #[serde(default)]
    pub release_policy: ReleasePolicy,
}

/// Printer demo configuration (binary gate)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrinterConfig {
    #[serde(default = "default_printer_users")]
    pub users: Vec<String>,
    #[serde(default = "default_hold_ms")]
    pub hold_ms: u64,
}

/// Library tables demo configuration (counting gate)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TablesConfig {
    #[serde(default = "default_tables")]
    pub tables: usize,
    #[serde(default = "default_students")]
    pub students: usize,
    #[serde(default = "default_hold_ms")]
    pub hold_ms: u64,
}

// Default implementations

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_output: OutputFormat::Tty,
            color: ColorChoice::Auto,
        }
    }
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self {
            users: default_printer_users(),
            hold_ms: constants::DEFAULT_HOLD_MS,
        }
    }
}

impl Default for TablesConfig {
    fn default() -> Self {
        Self {
            tables: constants::DEFAULT_TABLES,
            students: constants::DEFAULT_STUDENTS,
            hold_ms: constants::DEFAULT_HOLD_MS,
        }
    }
}

// Default value functions for serde
fn default_output_format() -> OutputFormat {
    OutputFormat::Tty
}

fn default_color_choice() -> ColorChoice {
    ColorChoice::Auto
}

fn default_printer_users() -> Vec<String> {
    constants::DEFAULT_PRINTER_USERS
        .iter()
        .map(ToString::to_string)
        .collect()
}

fn default_hold_ms() -> u64 {
    constants::DEFAULT_HOLD_MS
}

fn default_tables() -> usize {
    constants::DEFAULT_TABLES
}

fn default_students() -> usize {
    constants::DEFAULT_STUDENTS
}

impl Config {
    /// Get the default config file path
    ///
    /// # Errors
    ///
    /// Returns an error if the system config directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, Error> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::NotFound {
            path: "config directory".to_string(),
        })?;
        Ok(config_dir
            .join(constants::APP_NAME)
            .join(constants::CONFIG_FILE))
    }

    /// Directory for debug log files
    #[must_use]
    pub fn logs_path() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join(constants::APP_NAME)
            .join(constants::LOGS_DIR)
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the file contents
    /// contain invalid TOML syntax that cannot be parsed.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)
            .await
            .map_err(|_| ConfigError::NotFound {
                path: path.display().to_string(),
            })?;

        let config: Self = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?;
        config.validate()?;
        debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Load configuration with fallback to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or contains invalid TOML syntax.
    pub async fn load() -> Result<Self, Error> {
        let config_path = Self::default_path()?;

        if config_path.exists() {
            Self::load_from_file(&config_path).await
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an optional path or use default
    ///
    /// If path is provided, loads from that file.
    /// If path is None, uses the default loading behavior.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(config_path) => Self::load_from_file(config_path).await,
            None => Self::load().await,
        }
    }

    /// Merge with environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values
    /// that cannot be parsed into the expected types.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        // SEMGATE_OUTPUT
        if let Ok(output) = std::env::var("SEMGATE_OUTPUT") {
            self.general.default_output = match output.as_str() {
                "plain" => OutputFormat::Plain,
                "tty" => OutputFormat::Tty,
                "json" => OutputFormat::Json,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: "SEMGATE_OUTPUT".to_string(),
                        value: output,
                    }
                    .into())
                }
            };
        }

        // SEMGATE_COLOR
        if let Ok(color) = std::env::var("SEMGATE_COLOR") {
            self.general.color = match color.as_str() {
                "always" => ColorChoice::Always,
                "auto" => ColorChoice::Auto,
                "never" => ColorChoice::Never,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: "SEMGATE_COLOR".to_string(),
                        value: color,
                    }
                    .into())
                }
            };
        }

        // SEMGATE_RELEASE_POLICY
        if let Ok(policy) = std::env::var("SEMGATE_RELEASE_POLICY") {
            self.gate.release_policy =
                ReleasePolicy::parse(&policy).ok_or_else(|| ConfigError::InvalidValue {
                    field: "SEMGATE_RELEASE_POLICY".to_string(),
                    value: policy.clone(),
                })?;
        }

        // SEMGATE_HOLD_MS applies to both demos
        if let Ok(hold) = std::env::var("SEMGATE_HOLD_MS") {
            let hold_ms: u64 = hold.parse().map_err(|_| ConfigError::InvalidValue {
                field: "SEMGATE_HOLD_MS".to_string(),
                value: hold,
            })?;
            self.printer.hold_ms = hold_ms;
            self.tables.hold_ms = hold_ms;
        }

        // SEMGATE_TABLES
        if let Ok(tables) = std::env::var("SEMGATE_TABLES") {
            self.tables.tables = tables.parse().map_err(|_| ConfigError::InvalidValue {
                field: "SEMGATE_TABLES".to_string(),
                value: tables,
            })?;
        }

        // SEMGATE_STUDENTS
        if let Ok(students) = std::env::var("SEMGATE_STUDENTS") {
            self.tables.students = students.parse().map_err(|_| ConfigError::InvalidValue {
                field: "SEMGATE_STUDENTS".to_string(),
                value: students,
            })?;
        }

        self.validate()
    }

    /// Check values that the file format alone cannot rule out
    ///
    /// # Errors
    ///
    /// Returns an error if a gate would be built with zero capacity or a
    /// demo would have no workers.
    pub fn validate(&self) -> Result<(), Error> {
        if self.tables.tables == 0 {
            return Err(ConfigError::InvalidValue {
                field: "tables.tables".to_string(),
                value: "0".to_string(),
            }
            .into());
        }
        if self.tables.students == 0 {
            return Err(ConfigError::InvalidValue {
                field: "tables.students".to_string(),
                value: "0".to_string(),
            }
            .into());
        }
        if self.printer.users.is_empty() {
            return Err(ConfigError::Invalid {
                message: "printer.users must name at least one user".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Render the configuration as TOML
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String, Error> {
        toml::to_string_pretty(self).map_err(|e| {
            ConfigError::SerializeError {
                error: e.to_string(),
            }
            .into()
        })
    }
}

impl IntoGateLimits for &Config {
    fn into_gate_limits(self) -> GateLimits {
        GateLimits {
            printers: 1,
            tables: self.tables.tables,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_demo_programs() {
        let config = Config::default();
        assert_eq!(config.printer.users, vec!["User1", "User2"]);
        assert_eq!(config.tables.tables, 3);
        assert_eq!(config.tables.students, 6);
        assert_eq!(config.gate.release_policy, ReleasePolicy::Strict);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_gate_limits_from_config() {
        let mut config = Config::default();
        config.tables.tables = 5;
        let limits = (&config).into_gate_limits();
        assert_eq!(limits.printers, 1);
        assert_eq!(limits.tables, 5);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = Config::default();
        let rendered = config.to_toml().unwrap();
        let parsed: Config = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed.tables.students, config.tables.students);
        assert_eq!(parsed.printer.users, config.printer.users);
    }
}
