// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use rest_app_common::{bootstrap, Bootstrapped, CliArgs, Config, LogThresholds};

/// Bootstrap an application instance and print its effective configuration.
#[derive(Debug, Parser)]
#[command(name = "rest-app", version)]
struct Cli {
    #[command(flatten)]
    args: CliArgs,

    /// Application name; also names the data source file.
    #[arg(long, default_value = "rest-app")]
    app_name: String,

    /// Application base path; defaults to the directory of this executable.
    #[arg(long)]
    app_path: Option<String>,

    /// Log name; defaults to the application name.
    #[arg(long)]
    log_name: Option<String>,

    /// Glob pattern of extra files to delete on --reset. Repeatable.
    #[arg(long = "reset-glob")]
    reset_globs: Vec<String>,

    /// Partial configuration (JSON) to persist as the override before printing.
    #[arg(long = "override")]
    override_json: Option<String>,
}

fn executable_dir() -> String {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(PathBuf::from))
        .map(|dir| dir.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let override_config = match cli.override_json.as_deref().map(serde_json::from_str::<Config>) {
        Some(Ok(config)) => Some(config),
        Some(Err(e)) => {
            eprintln!("invalid --override: {e}");
            return ExitCode::from(2);
        }
        None => None,
    };

    let identity = Config {
        log_name: Some(cli.log_name.clone().unwrap_or_else(|| cli.app_name.clone())),
        app_name: Some(cli.app_name),
        app_path: Some(cli.app_path.unwrap_or_else(executable_dir)),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
        ..Config::default()
    };

    let Bootstrapped { context, logging } =
        match bootstrap(identity, &cli.args, &LogThresholds::default(), &cli.reset_globs) {
            Ok(booted) => booted,
            Err(e) => {
                eprintln!("fatal: {e}");
                return ExitCode::FAILURE;
            }
        };
    if let Err(e) = logging.install() {
        eprintln!("fatal: {e}");
        return ExitCode::FAILURE;
    }

    if let Some(config) = override_config {
        if let Err(e) = context.set(&config) {
            error!(error = %e, "Storing configuration override failed");
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    }

    match context.get() {
        Ok(config) => {
            info!(%config, "Effective configuration");
            println!("{config}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Reading configuration failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
