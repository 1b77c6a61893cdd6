//! Integration tests for config

#[cfg(test)]
mod tests {
    use semgate_config::*;
    use semgate_types::{ColorChoice, OutputFormat, ReleasePolicy};
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    // Mutex to ensure env var tests don't run concurrently
    static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());

    const ENV_VARS: [&str; 6] = [
        "SEMGATE_OUTPUT",
        "SEMGATE_COLOR",
        "SEMGATE_RELEASE_POLICY",
        "SEMGATE_HOLD_MS",
        "SEMGATE_TABLES",
        "SEMGATE_STUDENTS",
    ];

    fn clear_env() {
        for var in ENV_VARS {
            std::env::remove_var(var);
        }
    }

    #[tokio::test]
    async fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[general]
default_output = "plain"
color = "never"

[gate]
release_policy = "clamp"

[printer]
users = ["Ada", "Grace", "Linus"]
hold_ms = 50

[tables]
tables = 2
students = 5
        "#
        )
        .unwrap();

        let config = Config::load_from_file(temp_file.path()).await.unwrap();
        assert_eq!(config.general.default_output, OutputFormat::Plain);
        assert_eq!(config.general.color, ColorChoice::Never);
        assert_eq!(config.gate.release_policy, ReleasePolicy::Clamp);
        assert_eq!(config.printer.users.len(), 3);
        assert_eq!(config.printer.hold_ms, 50);
        assert_eq!(config.tables.tables, 2);
        assert_eq!(config.tables.students, 5);
        // Unset keys fall back to defaults
        assert_eq!(config.tables.hold_ms, constants::DEFAULT_HOLD_MS);
    }

    #[tokio::test]
    async fn test_zero_tables_rejected() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[tables]\ntables = 0").unwrap();

        assert!(Config::load_from_file(temp_file.path()).await.is_err());
    }

    #[tokio::test]
    async fn test_missing_file() {
        let result = Config::load_from_file(std::path::Path::new("/nonexistent/semgate.toml")).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_merge_env() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        clear_env();

        std::env::set_var("SEMGATE_OUTPUT", "json");
        std::env::set_var("SEMGATE_COLOR", "always");
        std::env::set_var("SEMGATE_RELEASE_POLICY", "clamp");
        std::env::set_var("SEMGATE_HOLD_MS", "25");
        std::env::set_var("SEMGATE_TABLES", "4");

        let mut config = Config::default();
        config.merge_env().unwrap();

        assert_eq!(config.general.default_output, OutputFormat::Json);
        assert_eq!(config.general.color, ColorChoice::Always);
        assert_eq!(config.gate.release_policy, ReleasePolicy::Clamp);
        assert_eq!(config.printer.hold_ms, 25);
        assert_eq!(config.tables.hold_ms, 25);
        assert_eq!(config.tables.tables, 4);

        clear_env();
    }

    #[test]
    fn test_invalid_env_value() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        clear_env();

        std::env::set_var("SEMGATE_RELEASE_POLICY", "lenient");

        let mut config = Config::default();
        assert!(config.merge_env().is_err());

        clear_env();
    }

    #[test]
    fn test_zero_tables_from_env_rejected() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        clear_env();

        std::env::set_var("SEMGATE_TABLES", "0");

        let mut config = Config::default();
        assert!(config.merge_env().is_err());

        clear_env();
    }
}
