//! semgate - bounded resource gate demos
//!
//! This is the CLI application that runs the printer, library tables and
//! contention demos through the ops crate and renders their progress.

mod cli;
mod display;
mod error;
mod events;
mod logging;

use crate::cli::{Cli, Commands};
use crate::display::OutputRenderer;
use crate::error::CliError;
use crate::events::EventHandler;
use clap::Parser;
use semgate_config::{constants, Config};
use semgate_events::{EventReceiver, EventSender};
use semgate_ops::{ContendRequest, OperationResult, OpsContextBuilder, OpsCtx};
use semgate_types::{ColorChoice, OutputFormat, RunReport};
use std::process;
use std::time::Duration;
use tokio::select;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Parse command line arguments first to check for JSON mode
    let cli = Cli::parse();
    let json_mode = cli.global.json;

    // Initialize tracing with JSON awareness
    init_tracing(json_mode, cli.global.debug);

    // Run the application and handle errors
    if let Err(e) = run(cli).await {
        error!("Application error: {}", e);
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Main application logic
async fn run(cli: Cli) -> Result<(), CliError> {
    info!("Starting semgate v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration with proper precedence:
    // 1. Start with file config (or defaults)
    let mut config = Config::load_or_default(cli.global.config.as_deref()).await?;

    // 2. Merge environment variables
    config.merge_env()?;

    // 3. Apply CLI flags (highest precedence)
    apply_cli_config(&mut config, &cli.global, &cli.command);

    let json_output = cli.global.json || config.general.default_output == OutputFormat::Json;

    // Create event channel
    let (event_sender, event_receiver) = semgate_events::channel();

    // Build operations context
    let ops_ctx = build_ops_context(event_sender, config.clone())?;

    // Create output renderer
    let renderer = OutputRenderer::new(json_output, config.general.color);

    // Create event handler
    let colors_enabled = match config.general.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => {
            config.general.default_output == OutputFormat::Tty
                && console::Term::stdout().features().colors_supported()
        }
    };
    let mut event_handler = EventHandler::new(colors_enabled, cli.global.debug, json_output);

    // Execute command with event handling
    let result =
        execute_command_with_events(cli.command, ops_ctx, event_receiver, &mut event_handler)
            .await?;

    // Render final result
    renderer.render_result(&result)?;

    info!("Command completed successfully");
    Ok(())
}

/// Execute command with concurrent event handling
async fn execute_command_with_events(
    command: Commands,
    ops_ctx: OpsCtx,
    mut event_receiver: EventReceiver,
    event_handler: &mut EventHandler,
) -> Result<OperationResult, CliError> {
    let mut command_future = Box::pin(execute_command(command, ops_ctx));
    let mut channel_open = true;

    // Handle events concurrently with command execution
    loop {
        select! {
            // Command completed
            result = &mut command_future => {
                // Drain any remaining events
                while let Ok(event) = event_receiver.try_recv() {
                    event_handler.handle_event(event);
                }
                return result;
            }

            // Event received
            event = event_receiver.recv(), if channel_open => {
                match event {
                    Some(event) => event_handler.handle_event(event),
                    None => channel_open = false,
                }
            }
        }
    }
}

/// Execute the specified command
async fn execute_command(command: Commands, ctx: OpsCtx) -> Result<OperationResult, CliError> {
    let report = match command {
        Commands::Config => {
            let rendered = semgate_ops::show_config(&ctx)?;
            return Ok(OperationResult::Success(rendered));
        }

        Commands::Printer { .. } => {
            run_blocking(move || {
                semgate_ops::printer(
                    &ctx,
                    &ctx.config.printer.users,
                    Duration::from_millis(ctx.config.printer.hold_ms),
                )
            })
            .await?
        }

        Commands::Tables { .. } => {
            run_blocking(move || {
                semgate_ops::tables(
                    &ctx,
                    ctx.config.tables.tables,
                    ctx.config.tables.students,
                    Duration::from_millis(ctx.config.tables.hold_ms),
                )
            })
            .await?
        }

        Commands::Run {
            capacity,
            workers,
            hold_ms,
            timeout_ms,
        } => {
            let hold = Duration::from_millis(hold_ms.unwrap_or(constants::DEFAULT_HOLD_MS));
            let mut request = ContendRequest::new(capacity, workers, hold);
            if let Some(timeout_ms) = timeout_ms {
                request = request.with_timeout(Duration::from_millis(timeout_ms));
            }
            run_blocking(move || semgate_ops::contend(&ctx, &request)).await?
        }
    };

    Ok(OperationResult::Run(report))
}

/// Demo runs park OS threads; keep them off the runtime workers
async fn run_blocking<F>(run: F) -> Result<RunReport, CliError>
where
    F: FnOnce() -> Result<RunReport, semgate_errors::Error> + Send + 'static,
{
    let report = tokio::task::spawn_blocking(run).await??;
    Ok(report)
}

/// Build operations context with all required components
fn build_ops_context(event_sender: EventSender, config: Config) -> Result<OpsCtx, CliError> {
    let ctx = OpsContextBuilder::new()
        .with_event_sender(event_sender)
        .with_config(config)
        .build()?;

    Ok(ctx)
}

/// Initialize tracing/logging
fn init_tracing(json_mode: bool, debug_enabled_flag: bool) {
    // Check if debug logging is enabled
    let debug_enabled = std::env::var("RUST_LOG").is_ok() || debug_enabled_flag;

    if json_mode {
        // JSON mode: suppress all console output to avoid contaminating JSON
        if debug_enabled {
            // In debug mode with JSON, still log to file
            if let Some(file) = create_log_file() {
                tracing_subscriber::fmt()
                    .json()
                    .with_writer(file)
                    .with_env_filter(debug_filter())
                    .init();
                return;
            }
        }
        // Fallback: disable all logging in JSON mode
        tracing_subscriber::fmt()
            .with_writer(std::io::sink)
            .with_env_filter("off")
            .init();
    } else if debug_enabled {
        // Debug mode: structured JSON logs to file
        if let Some(file) = create_log_file() {
            tracing_subscriber::fmt()
                .json()
                .with_writer(file)
                .with_env_filter(debug_filter())
                .init();
        } else {
            // Fallback to stderr
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_env_filter(debug_filter())
                .init();
        }
    } else {
        // Normal mode: minimal logging to stderr
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new("warn,semgate=warn,semgate_ops=warn")
                }),
            )
            .init();
    }
}

fn debug_filter() -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(
            "info,semgate=debug,semgate_ops=debug,semgate_resources=debug",
        )
    })
}

/// Create a timestamped log file under the cache directory
fn create_log_file() -> Option<std::fs::File> {
    let log_dir = Config::logs_path();
    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("Warning: Failed to create log directory: {e}");
        return None;
    }

    let log_file = log_dir.join(format!(
        "semgate-{}.log",
        chrono::Utc::now().format("%Y%m%d-%H%M%S")
    ));

    match std::fs::File::create(&log_file) {
        Ok(file) => {
            eprintln!("Debug logging enabled: {}", log_file.display());
            Some(file)
        }
        Err(e) => {
            eprintln!("Warning: Failed to create log file: {e}");
            None
        }
    }
}

/// Apply CLI configuration overrides (highest precedence)
fn apply_cli_config(config: &mut Config, global: &cli::GlobalArgs, command: &Commands) {
    // Global CLI flags override everything
    if let Some(color) = global.color {
        config.general.color = color;
    }
    if let Some(policy) = global.release_policy {
        config.gate.release_policy = policy;
    }
    if global.json {
        config.general.default_output = OutputFormat::Json;
    }

    // Command-specific CLI flags
    match command {
        Commands::Printer { users, hold_ms } => {
            if !users.is_empty() {
                config.printer.users.clone_from(users);
            }
            if let Some(hold_ms) = hold_ms {
                config.printer.hold_ms = *hold_ms;
            }
        }
        Commands::Tables {
            tables,
            students,
            hold_ms,
        } => {
            if let Some(tables) = tables {
                config.tables.tables = *tables;
            }
            if let Some(students) = students {
                config.tables.students = *students;
            }
            if let Some(hold_ms) = hold_ms {
                config.tables.hold_ms = *hold_ms;
            }
        }
        Commands::Run { .. } | Commands::Config => {}
    }
}
