// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Startup sequence.
//!
//! The steps run in a fixed order:
//!
//! 1. validate the identity fields and the log level index
//! 2. resolve and create the persistent directory
//! 3. locate the data source and note whether it already exists
//! 4. reset, when requested (before logging, since logs are deleted)
//! 5. create the application and audit logs
//! 6. open the configuration store
//! 7. assemble the Default Configuration
//!
//! Any failure is a [`BootstrapError`]; the caller is expected to halt.
//! [`bootstrap_from_args`] and [`bootstrap_from`] parse the flags first.

use std::ffi::OsString;
use std::fs;

use clap::Parser;
use tracing::info;

use crate::audit;
use crate::config::{CliArgs, CONFIG_KEY};
use crate::error::{BootstrapError, ConfigError};
use crate::logging::{LogFormat, LogLevel, LogThresholds, Logging};
use crate::models::Config;
use crate::state::AppContext;
use crate::storage::{check_reset, KvStore, StoragePaths};

/// Result of a successful startup.
#[derive(Debug)]
pub struct Bootstrapped {
    pub context: AppContext,
    /// Not yet installed globally; see [`Logging::install`].
    pub logging: Logging,
}

#[derive(Debug, Parser)]
struct BootstrapCli {
    #[command(flatten)]
    args: CliArgs,
}

/// Parse the process arguments, then [`bootstrap`].
///
/// Invalid flags print usage and exit, as `clap` does.
pub fn bootstrap_from_args(
    identity: Config,
    thresholds: &LogThresholds,
    reset_patterns: &[String],
) -> Result<Bootstrapped, BootstrapError> {
    match bootstrap_from(std::env::args_os(), identity, thresholds, reset_patterns) {
        Err(BootstrapError::Args(e)) => e.exit(),
        other => other,
    }
}

/// Parse `args` (program name first), then [`bootstrap`].
///
/// Unknown or malformed flags and `--help` come back as
/// [`BootstrapError::Args`].
pub fn bootstrap_from<I, T>(
    args: I,
    identity: Config,
    thresholds: &LogThresholds,
    reset_patterns: &[String],
) -> Result<Bootstrapped, BootstrapError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = BootstrapCli::try_parse_from(args).map_err(BootstrapError::Args)?;
    bootstrap(identity, &cli.args, thresholds, reset_patterns)
}

/// Run the startup sequence.
///
/// `identity` must carry `app_name`, `app_path` and `log_name`; any other
/// fields it carries (version, JWT settings, password rules) pass through to
/// the Default Configuration. `reset_patterns` are glob patterns of extra
/// files to delete when `--reset` is given.
pub fn bootstrap(
    identity: Config,
    cli: &CliArgs,
    thresholds: &LogThresholds,
    reset_patterns: &[String],
) -> Result<Bootstrapped, BootstrapError> {
    let (app_name, app_path, log_name) =
        match (&identity.app_name, &identity.app_path, &identity.log_name) {
            (Some(app_name), Some(app_path), Some(log_name)) => {
                (app_name.clone(), app_path.clone(), log_name.clone())
            }
            _ => return Err(BootstrapError::MissingIdentity(identity.missing_identity_fields())),
        };
    let level = LogLevel::from_index(cli.log_level).map_err(BootstrapError::Log)?;

    let paths = StoragePaths::resolve(&cli.persistent_directory, &app_path, &app_name);
    if !paths.root().as_os_str().is_empty() {
        fs::create_dir_all(paths.root()).map_err(|source| BootstrapError::CreateDirectory {
            path: paths.root().to_path_buf(),
            source,
        })?;
    }

    let data_source = paths.data_source();
    let existed = data_source.exists();

    check_reset(cli.reset, &data_source, reset_patterns, &cli.log_filepath)
        .map_err(|e| BootstrapError::Reset(ConfigError::from(e)))?;
    let new_data_source = !existed || cli.reset;

    let logging = Logging::create(
        &log_name,
        &cli.log_filepath,
        level,
        LogFormat::from_env(),
        thresholds,
    )
    .map_err(BootstrapError::Log)?;

    logging.in_scope(|| {
        info!("{} is starting....", logging.log_name());
        audit!("{} is starting....", logging.log_name());
        info!("logFilepath:{}", logging.log_filepath());
        info!("auditLogFilepath:{}", logging.audit_log_filepath());
    });

    let store = KvStore::open(&data_source, CONFIG_KEY).map_err(|source| BootstrapError::Store {
        path: data_source.clone(),
        source,
    })?;

    let mut default_config = identity;
    default_config.https_port = Some(cli.https_port);
    default_config.log_filepath = Some(cli.log_filepath.clone());
    default_config.log_level = Some(level.index());
    default_config.persistent_directory = Some(paths.root().to_string_lossy().into_owned());
    default_config.audit_log_name = Some(logging.audit_log_name().to_string());
    default_config.data_source_name = Some(data_source.to_string_lossy().into_owned());
    default_config.new_data_source = Some(new_data_source);

    logging.in_scope(|| {
        info!(
            data_source = %data_source.display(),
            new_data_source,
            reset = cli.reset,
            "Configuration store ready"
        );
    });

    Ok(Bootstrapped {
        context: AppContext::new(default_config, store),
        logging,
    })
}
