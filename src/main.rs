#![allow(missing_docs)]

use anyhow::{Context, Result};
use clap::Parser;
use mcp_sync::{
    app_config::AppConfig,
    cli::Cli,
    editor::Editor,
    interrupt,
    prompt::default_operator,
    sync_operations::{run_session, SyncOptions},
};
use tracing::{debug, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() {
    let cli = Cli::parse();

    initialize_tracing(cli.debug, cli.trace);

    match run(&cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            debug!("{e:?}");
            eprintln!("Error: {e:#}");
            std::process::exit(1);
        },
    }
}

/// Initialize tracing with the given debug/trace flags
fn initialize_tracing(debug: bool, trace: bool) {
    let log_level = if trace {
        Level::TRACE
    } else if debug {
        Level::DEBUG
    } else {
        Level::WARN
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::builder().with_default_directive(log_level.into()).from_env_lossy())
        .init();
}

/// Load application configuration and log its status
fn load_and_log_config() -> Result<Option<AppConfig>> {
    let app_config = AppConfig::load().context("Failed to load app configuration")?;

    if app_config.is_some() {
        debug!("Loaded app configuration from: {}", AppConfig::config_path()?.display());
    } else {
        debug!("No app configuration file found at: {}", AppConfig::config_path()?.display());
    }

    Ok(app_config)
}

fn run(cli: &Cli) -> Result<i32> {
    interrupt::install()?;
    SyncOptions::validate(cli)?;
    let defaults = load_and_log_config()?.map(|c| c.defaults()).unwrap_or_default();
    let options = SyncOptions::from_cli(cli, &defaults)?;
    debug!("Resolved options: {options:?}");

    let editor = Editor::resolve(defaults.editor.as_deref());
    let mut operator = default_operator();

    let outcome = run_session(&options, operator.as_mut(), &editor)?;
    debug!("Session finished: {outcome:?}");

    Ok(outcome.exit_code())
}
