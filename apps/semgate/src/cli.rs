//! Command line interface definition

use clap::{Parser, Subcommand};
use semgate_types::{ColorChoice, ReleasePolicy};
use std::path::PathBuf;

/// semgate - Bounded resource gate demos
#[derive(Parser)]
#[command(name = "semgate")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Bounded resource gate: printer and library table demos")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Global arguments available for all commands
#[derive(Parser)]
pub struct GlobalArgs {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging to the cache directory
    #[arg(long, global = true)]
    pub debug: bool,

    /// Color output control
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorChoice>,

    /// Use alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// What to do with a release that has nothing to give back
    #[arg(long, global = true, value_enum)]
    pub release_policy: Option<ReleasePolicy>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Users take turns on a single printer (capacity 1)
    Printer {
        /// Names of the users sharing the printer
        #[arg(long, num_args = 1.., value_name = "NAME")]
        users: Vec<String>,

        /// How long each user prints, in milliseconds
        #[arg(long, value_name = "MS")]
        hold_ms: Option<u64>,
    },

    /// Students share a fixed number of library tables
    Tables {
        /// Number of tables
        #[arg(long, value_name = "N")]
        tables: Option<usize>,

        /// Number of students
        #[arg(long, value_name = "N")]
        students: Option<usize>,

        /// How long each student studies, in milliseconds
        #[arg(long, value_name = "MS")]
        hold_ms: Option<u64>,
    },

    /// Any number of workers competing for a gate of any capacity
    #[command(alias = "contend")]
    Run {
        /// Gate capacity
        #[arg(long, value_name = "N")]
        capacity: usize,

        /// Number of workers
        #[arg(long, value_name = "N")]
        workers: usize,

        /// How long each worker holds its slot, in milliseconds
        #[arg(long, value_name = "MS")]
        hold_ms: Option<u64>,

        /// Give up waiting after this many milliseconds
        #[arg(long, value_name = "MS")]
        timeout_ms: Option<u64>,
    },

    /// Print the effective configuration as TOML
    Config,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_printer_users() {
        let cli = Cli::parse_from(["semgate", "printer", "--users", "Ada", "Grace"]);
        match cli.command {
            Commands::Printer { users, hold_ms } => {
                assert_eq!(users, ["Ada", "Grace"]);
                assert!(hold_ms.is_none());
            }
            _ => panic!("expected printer command"),
        }
    }

    #[test]
    fn test_parse_run_with_globals() {
        let cli = Cli::parse_from([
            "semgate",
            "run",
            "--capacity",
            "2",
            "--workers",
            "5",
            "--timeout-ms",
            "10",
            "--json",
            "--release-policy",
            "clamp",
        ]);
        assert!(cli.global.json);
        assert_eq!(cli.global.release_policy, Some(ReleasePolicy::Clamp));
        assert!(matches!(
            cli.command,
            Commands::Run {
                capacity: 2,
                workers: 5,
                hold_ms: None,
                timeout_ms: Some(10),
            }
        ));
    }
}
