use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::Level;
use uuid::Uuid;

/// Envelope sent alongside every event
///
/// Run events carry their run id as `correlation_id`, so a log of several
/// concurrent runs can be split back into one timeline per run.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMeta {
    pub event_id: Uuid,
    pub correlation_id: Option<String>,
    /// Captured when the event was emitted, not when it was rendered
    pub timestamp: DateTime<Utc>,
    pub level: EventLevel,
    pub source: EventSource,
}

impl EventMeta {
    #[must_use]
    pub fn new(level: impl Into<EventLevel>, source: EventSource) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            correlation_id: None,
            timestamp: Utc::now(),
            level: level.into(),
            source,
        }
    }

    /// Tie this event to others sharing `correlation_id`
    #[must_use]
    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }

    #[must_use]
    pub fn tracing_level(&self) -> Level {
        self.level.into()
    }
}

/// Severity of an event, mirrored onto `tracing` levels
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum EventLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<EventLevel> for Level {
    fn from(level: EventLevel) -> Self {
        match level {
            EventLevel::Trace => Level::TRACE,
            EventLevel::Debug => Level::DEBUG,
            EventLevel::Info => Level::INFO,
            EventLevel::Warn => Level::WARN,
            EventLevel::Error => Level::ERROR,
        }
    }
}

impl From<Level> for EventLevel {
    fn from(level: Level) -> Self {
        match level {
            Level::TRACE => EventLevel::Trace,
            Level::DEBUG => EventLevel::Debug,
            Level::INFO => EventLevel::Info,
            Level::WARN => EventLevel::Warn,
            Level::ERROR => EventLevel::Error,
        }
    }
}

/// Domain an event came from
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EventSource {
    Gate,
    Run,
}

impl EventSource {
    /// Name used for the `source` field in logs
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gate => "gate",
            Self::Run => "run",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_carries_correlation() {
        let meta = EventMeta::new(EventLevel::Warn, EventSource::Gate).with_correlation_id("run-1");
        assert_eq!(meta.source.as_str(), "gate");
        assert_eq!(meta.correlation_id.as_deref(), Some("run-1"));
        assert_eq!(meta.tracing_level(), Level::WARN);
    }

    #[test]
    fn test_level_conversions() {
        assert_eq!(EventLevel::from(Level::DEBUG), EventLevel::Debug);
        assert_eq!(Level::from(EventLevel::Error), Level::ERROR);
    }

    #[test]
    fn test_source_serializes_as_name() {
        let json = serde_json::to_string(&EventSource::Run).unwrap();
        assert_eq!(json, r#""run""#);
    }
}
