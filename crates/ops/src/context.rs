//! Operations context for dependency injection

use semgate_config::Config;
use semgate_errors::{Error, OpsError};
use semgate_events::{EventEmitter, EventSender};

/// Operations context shared by every demo run
#[derive(Clone)]
pub struct OpsCtx {
    /// Event sender for progress reporting
    pub tx: EventSender,
    /// System configuration
    pub config: Config,
}

impl EventEmitter for OpsCtx {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(&self.tx)
    }
}

/// Builder for operations context
#[derive(Default)]
pub struct OpsContextBuilder {
    tx: Option<EventSender>,
    config: Option<Config>,
}

impl OpsContextBuilder {
    /// Create new context builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set event sender
    #[must_use]
    pub fn with_event_sender(mut self, tx: EventSender) -> Self {
        self.tx = Some(tx);
        self
    }

    /// Set configuration
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Build the context
    ///
    /// # Errors
    ///
    /// Returns an error if any required component is missing.
    pub fn build(self) -> Result<OpsCtx, Error> {
        let tx = self.tx.ok_or_else(|| OpsError::MissingComponent {
            component: "event_sender".to_string(),
        })?;

        let config = self.config.ok_or_else(|| OpsError::MissingComponent {
            component: "config".to_string(),
        })?;

        Ok(OpsCtx { tx, config })
    }
}
