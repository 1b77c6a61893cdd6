#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Error types for semgate
//!
//! Each domain has its own error enum; [`Error`] wraps them at crate
//! boundaries. Errors are `Clone` so a worker's failure can be carried out
//! of its thread and into a run report or event.

use std::borrow::Cow;

use thiserror::Error;

pub mod config;
pub mod gate;
pub mod ops;

pub use config::ConfigError;
pub use gate::GateError;
pub use ops::OpsError;

/// Error crossing crate boundaries
#[derive(Debug, Clone, Error)]
pub enum Error {
    #[error("gate error: {0}")]
    Gate(#[from] GateError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("ops error: {0}")]
    Ops(#[from] OpsError),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Ops(OpsError::SerializationError {
            message: err.to_string(),
        })
    }
}

/// What the CLI and failure events show for an error
pub trait UserFacingError {
    /// Short message suitable for CLI output.
    fn user_message(&self) -> Cow<'_, str>;

    /// Optional remediation hint.
    fn user_hint(&self) -> Option<&'static str> {
        None
    }

    /// Whether retrying the same operation is likely to succeed.
    fn is_retryable(&self) -> bool {
        false
    }

    /// Stable dotted code, e.g. `gate.timeout`.
    fn user_code(&self) -> Option<&'static str> {
        None
    }
}

impl UserFacingError for Error {
    fn user_message(&self) -> Cow<'_, str> {
        match self {
            Error::Gate(err) => err.user_message(),
            Error::Config(err) => err.user_message(),
            Error::Ops(err) => err.user_message(),
        }
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Error::Gate(err) => err.user_hint(),
            Error::Config(_) => Some("Check your semgate configuration file."),
            Error::Ops(err) => err.user_hint(),
        }
    }

    fn is_retryable(&self) -> bool {
        match self {
            Error::Gate(err) => err.is_retryable(),
            Error::Config(err) => err.is_retryable(),
            Error::Ops(err) => err.is_retryable(),
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        match self {
            Error::Gate(err) => err.user_code(),
            Error::Config(err) => err.user_code(),
            Error::Ops(err) => err.user_code(),
        }
    }
}
