//! CLI error handling

use std::fmt;

use semgate_errors::UserFacingError;

/// CLI-specific error type
#[derive(Debug)]
pub enum CliError {
    /// Error from configuration or an operation
    Ops(semgate_errors::Error),
    /// The blocking task running the operation did not finish
    Task(String),
    /// I/O error
    Io(std::io::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Ops(e) => {
                let message = e.user_message();
                write!(f, "{message}")?;
                if let Some(code) = e.user_code() {
                    write!(f, "\n  Code: {code}")?;
                }
                if let Some(hint) = e.user_hint() {
                    write!(f, "\n  Hint: {hint}")?;
                }
                if e.is_retryable() {
                    write!(f, "\n  Retry: safe to retry this operation.")?;
                }
                Ok(())
            }
            CliError::Task(msg) => write!(f, "Operation task failed: {msg}"),
            CliError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Ops(e) => Some(e),
            CliError::Io(e) => Some(e),
            CliError::Task(_) => None,
        }
    }
}

impl From<semgate_errors::Error> for CliError {
    fn from(e: semgate_errors::Error) -> Self {
        CliError::Ops(e)
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}

impl From<tokio::task::JoinError> for CliError {
    fn from(e: tokio::task::JoinError) -> Self {
        CliError::Task(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use semgate_errors::GateError;

    #[test]
    fn test_display_includes_code_and_hint() {
        let err = CliError::from(semgate_errors::Error::from(GateError::InvalidCapacity {
            capacity: 0,
        }));
        let rendered = err.to_string();
        assert!(rendered.contains("Code: gate.invalid_capacity"));
        assert!(rendered.contains("Hint:"));
        assert!(!rendered.contains("Retry:"));
    }

    #[test]
    fn test_timeout_is_marked_retryable() {
        let err = CliError::from(semgate_errors::Error::from(GateError::Timeout {
            waited_ms: 5,
        }));
        assert!(err.to_string().contains("Retry:"));
    }
}
