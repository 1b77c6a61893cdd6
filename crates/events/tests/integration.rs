//! Integration tests for events

#[cfg(test)]
mod tests {
    use semgate_errors::GateError;
    use semgate_events::*;
    use semgate_types::{ReleasePolicy, RunKind, Uuid};

    #[tokio::test]
    async fn test_event_sender_emit() {
        let (tx, mut rx) = channel();

        tx.emit_gate(GateEvent::Created {
            capacity: 2,
            policy: ReleasePolicy::Strict,
        });
        tx.emit_run(RunEvent::Failed {
            run_id: Uuid::new_v4(),
            kind: RunKind::Contend,
            failure: FailureContext::from_error(&GateError::GateDestroyed),
        });

        let first = rx.recv().await.unwrap();
        assert!(matches!(
            first.event,
            AppEvent::Gate(GateEvent::Created { capacity: 2, .. })
        ));
        assert_eq!(first.meta.source, EventSource::Gate);
        assert_eq!(first.meta.level, EventLevel::Info);
        assert!(first.meta.correlation_id.is_none());

        let second = rx.recv().await.unwrap();
        assert!(matches!(second.event, AppEvent::Run(RunEvent::Failed { .. })));
        assert_eq!(second.meta.level, EventLevel::Error);
    }

    #[test]
    fn test_clamped_return_is_a_warning() {
        let returned = |outcome| {
            AppEvent::Run(RunEvent::SlotReturned {
                run_id: Uuid::new_v4(),
                kind: RunKind::Contend,
                worker: 1,
                label: "Worker 1".into(),
                outcome,
            })
        };
        assert_eq!(
            returned(ReleaseOutcome::Clamped).log_level(),
            tracing::Level::WARN
        );
        assert_eq!(
            returned(ReleaseOutcome::HandedOff).log_level(),
            tracing::Level::DEBUG
        );
    }

    #[tokio::test]
    async fn test_run_events_are_correlated() {
        let (tx, mut rx) = channel();
        let run_id = Uuid::new_v4();

        tx.emit_run(RunEvent::WorkerGranted {
            run_id,
            kind: RunKind::Tables,
            worker: 1,
            label: "Student 1".into(),
            available: 2,
            waited: false,
        });

        let message = rx.recv().await.unwrap();
        assert_eq!(message.meta.source, EventSource::Run);
        assert_eq!(message.meta.level, EventLevel::Debug);
        assert_eq!(
            message.meta.correlation_id.as_deref(),
            Some(run_id.to_string().as_str())
        );
    }

    #[tokio::test]
    async fn test_dropped_receiver() {
        let (tx, rx) = channel();
        drop(rx);

        // Should not panic when receiver is dropped
        tx.emit_gate(GateEvent::Destroyed { capacity: 1 });
    }

    #[test]
    fn test_failure_context_from_error() {
        let failure = FailureContext::from_error(&GateError::Timeout { waited_ms: 5 });
        assert_eq!(failure.code.as_deref(), Some("gate.timeout"));
        assert!(failure.retryable);
        assert!(failure.hint.is_some());
    }

    #[test]
    fn test_release_outcome_serialization() {
        let json = serde_json::to_string(&ReleaseOutcome::Freed { available: 2 }).unwrap();
        assert_eq!(json, r#"{"kind":"freed","available":2}"#);
    }

    #[test]
    fn test_app_event_serialization() {
        let event = AppEvent::Gate(GateEvent::Destroyed { capacity: 3 });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["domain"], "gate");
        assert_eq!(json["event"]["type"], "Destroyed");
        assert_eq!(event.log_target(), "semgate::events::gate");
    }
}
