use clap::Parser;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::PathBuf;

mod cli;
mod commands;

use cli::{Cli, Commands};
use dd_install_telemetry::config::{Config, LogLevel};

fn open_log_file() -> Result<(PathBuf, fs::File)> {
    let log_dir = Config::log_dir();
    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("dd-install-telemetry.log");

    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)
        .context("Failed to open log file")?;

    Ok((log_file, file))
}

/// Log to the log file, or to stderr when the file cannot be opened
fn setup_logging(log_level: &LogLevel) {
    // RUST_LOG env var takes precedence, otherwise use config log_level
    let mut builder = env_logger::Builder::new();

    if std::env::var("RUST_LOG").is_ok() {
        builder.parse_default_env();
    } else {
        builder.filter_level(log_level.to_level_filter());
    }

    match open_log_file() {
        Ok((path, file)) => {
            builder.target(env_logger::Target::Pipe(Box::new(file))).init();
            log::debug!("Logging initialized, writing to: {}", path.display());
        }
        Err(e) => {
            builder.target(env_logger::Target::Stderr).init();
            log::warn!("Logging to stderr: {:#}", e);
        }
    }

    log::debug!(
        "Log level: {} (from {})",
        log_level.as_filter(),
        if std::env::var("RUST_LOG").is_ok() { "RUST_LOG env" } else { "config" }
    );
}

fn run(cli: Cli, config: Config) -> Result<i32> {
    match cli.command {
        Commands::Report { action, strict } => commands::report::run(action, strict, &cli.properties, &config),
        Commands::Preview { event, format } => {
            commands::preview::run(&event, cli::OutputFormat::resolve(format), &cli.properties, &config)?;
            Ok(0)
        }
        Commands::Config { action } => {
            commands::config::run(action, &config)?;
            Ok(0)
        }
        Commands::Completions { shell } => {
            commands::completions::run(shell)?;
            Ok(0)
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration (before logging, so log messages in Config::load are silent).
    // A non-strict report must not fail the install, so it falls back to defaults.
    let (config, config_error) = match Config::load(cli.config.as_ref()) {
        Ok(config) => (config, None),
        Err(e) if cli.is_best_effort() => (Config::default(), Some(e)),
        Err(e) => return Err(e.wrap_err("Failed to load configuration")),
    };

    setup_logging(&config.log_level);

    info!("Starting dd-install-telemetry {}", env!("GIT_DESCRIBE"));
    if let Some(e) = config_error {
        log::warn!("Failed to load configuration, using defaults: {:#}", e);
    }

    let code = run(cli, config).context("Command failed")?;
    if code != 0 {
        std::process::exit(code);
    }

    Ok(())
}
