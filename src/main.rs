use clap::Parser;
use eyre::{Context, Result};
use log::{info, warn};
use std::fs;
use std::path::PathBuf;

mod cli;
mod commands;
mod config;
mod event;
mod formatter;

use cli::{Cli, Commands};
use config::{Config, LogLevel};

fn effective_level(cli: &Cli, config: &Config) -> LogLevel {
    if cli.verbose {
        LogLevel::Debug
    } else if cli.quiet {
        LogLevel::Error
    } else {
        config.log_level
    }
}

fn open_log_file(config: &Config) -> Result<(PathBuf, fs::File)> {
    let log_dir = config.log_dir();
    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("stagelog.log");
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)
        .context("Failed to open log file")?;
    Ok((log_file, file))
}

fn setup_logging(log_level: LogLevel, config: &Config) {
    // RUST_LOG env var takes precedence, otherwise use config log_level
    let mut builder = env_logger::Builder::new();

    if std::env::var("RUST_LOG").is_ok() {
        builder.parse_default_env();
    } else {
        builder.filter_level(log_level.to_level_filter());
    }

    // stdout carries the formatted stream, so diagnostics go to a file, or
    // to stderr when the file can't be opened
    match open_log_file(config) {
        Ok((log_file, file)) => {
            builder.target(env_logger::Target::Pipe(Box::new(file))).init();
            info!("Logging initialized, writing to: {}", log_file.display());
        }
        Err(e) => {
            builder.target(env_logger::Target::Stderr).init();
            warn!("Logging to stderr: {:#}", e);
        }
    }

    info!(
        "Log level: {} (from {})",
        log_level.as_filter(),
        if std::env::var("RUST_LOG").is_ok() { "RUST_LOG env" } else { "config" }
    );
}

fn run(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Commands::Format { input } => commands::format::run(input.as_deref()),
        Commands::Stages { role, format } => {
            commands::stages::run(role.as_deref(), cli::OutputFormat::resolve(format))
        }
        Commands::Config { action } => commands::config::run(action, &config),
        Commands::Completions { shell } => commands::completions::run(shell),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration (before logging, so log messages in Config::load are silent)
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    setup_logging(effective_level(&cli, &config), &config);

    info!("Starting stagelog with config from: {:?}", cli.config);

    run(cli, config).context("Command failed")?;

    Ok(())
}
