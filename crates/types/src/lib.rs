#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Core type definitions for semgate
//!
//! This crate provides the value types shared between the gate, the demo
//! operations, configuration and the CLI.

pub mod reports;
pub mod snapshot;

// Re-export commonly used types
pub use reports::{RunKind, RunReport, WorkerRecord};
pub use snapshot::GateSnapshot;
pub use uuid::Uuid;

use serde::{Deserialize, Serialize};

/// What a gate does with a release that has no matching acquire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleasePolicy {
    /// Reject the release with an `UnbalancedRelease` error
    Strict,
    /// Ignore the release; the counter stays pinned at capacity
    Clamp,
}

impl ReleasePolicy {
    /// Parse a policy name as used in config files and environment variables
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "strict" => Some(Self::Strict),
            "clamp" => Some(Self::Clamp),
            _ => None,
        }
    }
}

impl std::fmt::Display for ReleasePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Strict => write!(f, "strict"),
            Self::Clamp => write!(f, "clamp"),
        }
    }
}

impl Default for ReleasePolicy {
    fn default() -> Self {
        Self::Strict
    }
}

impl clap::ValueEnum for ReleasePolicy {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Strict, Self::Clamp]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(match self {
            Self::Strict => clap::builder::PossibleValue::new("strict"),
            Self::Clamp => clap::builder::PossibleValue::new("clamp"),
        })
    }
}

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Plain,
    Tty,
    Json,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Tty
    }
}

/// Color output choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    Always,
    Auto,
    Never,
}

// Implement clap::ValueEnum for ColorChoice
impl clap::ValueEnum for ColorChoice {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Always, Self::Auto, Self::Never]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(match self {
            Self::Always => clap::builder::PossibleValue::new("always"),
            Self::Auto => clap::builder::PossibleValue::new("auto"),
            Self::Never => clap::builder::PossibleValue::new("never"),
        })
    }
}

impl Default for ColorChoice {
    fn default() -> Self {
        Self::Auto
    }
}
