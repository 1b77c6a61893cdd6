//! Integration tests for error types

#[cfg(test)]
mod tests {
    use semgate_errors::*;

    #[test]
    fn test_error_conversion() {
        let gate_err = GateError::InvalidCapacity { capacity: 0 };
        let err: Error = gate_err.into();
        assert!(matches!(
            err,
            Error::Gate(GateError::InvalidCapacity { capacity: 0 })
        ));
    }

    #[test]
    fn test_error_display() {
        let err = GateError::GateInUse {
            holders: 2,
            waiters: 1,
        };
        assert_eq!(err.to_string(), "gate in use: 2 holder(s), 1 waiter(s)");
    }

    #[test]
    fn test_error_clone() {
        let err = GateError::UnbalancedRelease { capacity: 3 };
        let cloned = err.clone();
        assert_eq!(err, cloned);
    }

    #[test]
    fn test_only_timeout_is_retryable() {
        assert!(GateError::Timeout { waited_ms: 10 }.is_retryable());
        assert!(!GateError::UnbalancedRelease { capacity: 1 }.is_retryable());
        assert!(!GateError::GateDestroyed.is_retryable());
    }

    #[test]
    fn test_user_codes_pass_through() {
        let err: Error = GateError::UnbalancedRelease { capacity: 1 }.into();
        assert_eq!(err.user_code(), Some("gate.unbalanced_release"));
        assert!(err.user_hint().is_some());

        let err: Error = ConfigError::InvalidValue {
            field: "SEMGATE_TABLES".into(),
            value: "many".into(),
        }
        .into();
        assert_eq!(err.user_code(), Some("config.invalid_value"));
    }

    #[test]
    fn test_json_error_becomes_ops_error() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(
            err,
            Error::Ops(OpsError::SerializationError { .. })
        ));
        assert_eq!(err.user_code(), Some("ops.serialization_error"));
    }
}
