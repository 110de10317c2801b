mod app;
mod cli;
mod commands;
mod row;

use crate::app::App;
use crate::cli::{Command, CLI};
use crate::commands::visit::StdoutNavigator;
use clap::Parser;
use pocketlink_telemetry::init_tracing;
use std::io::{self, Write};
use std::process::ExitCode;
use tracing::{info, warn};

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<ExitCode> {
    let config = CLI::parse();
    init_tracing(config.log_format.into(), &config.log)?;

    info!(
        data_dir = %config.data_dir.display(),
        base_url = %config.base_url,
        log_format = %config.log_format,
        "starting pocketlink"
    );

    let app = App::open(&config.data_dir, &config.base_url)?;
    if !app.repository.ensure_init() {
        warn!(data_dir = %config.data_dir.display(), "storage is not available, continuing");
    }

    let mut out = io::stdout().lock();
    let code = match config.command {
        Command::Shorten { rows, json } => commands::shorten::run(&app, &rows, json, &mut out)?,
        Command::Check { rows } => commands::check::run(&rows, &mut out)?,
        // stdout only carries the target URL, the state report goes to stderr
        Command::Visit { path, referrer } => commands::visit::run(
            &app,
            &path,
            referrer.as_deref(),
            &StdoutNavigator,
            &mut io::stderr(),
        )?,
        Command::Stats { clicks } => commands::stats::run(&app, clicks.as_deref(), &mut out)?,
        Command::Purge => commands::purge::run(&app, &mut out)?,
    };
    out.flush()?;

    Ok(code)
}
