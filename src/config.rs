// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration Constants
//!
//! This module defines the command-line surface, the environment variable
//! names that mirror each flag, and the fixed constants used by the
//! configuration store.
//!
//! ## Flags
//!
//! | Flag | Environment Variable | Description | Default |
//! |------|----------------------|-------------|---------|
//! | `--https-port` | `REST_APP_HTTPS_PORT` | HTTPS port | `8080` |
//! | `--log-filepath` | `REST_APP_LOG_FILEPATH` | Log file path, blank for STDOUT | blank |
//! | `--log-level` | `REST_APP_LOG_LEVEL` | Zero based index into the level list | `0` (debug) |
//! | `--persistent-directory` | `REST_APP_PERSISTENT_DIRECTORY` | Directory for persisted data | app path |
//! | `--reset` | `REST_APP_RESET` | Remove all persisted data for this instance | `false` |
//! | - | `LOG_FORMAT` | Primary log format (`json` or `pretty`) | `pretty` |

use clap::builder::BoolishValueParser;
use clap::{ArgAction, Args};

use crate::logging::LogLevel;

/// Store name and record key for the persisted override.
///
/// The store (redb table) and the single record inside it share this name.
pub const CONFIG_KEY: &str = "config";

/// Default HTTPS port.
pub const DEFAULT_HTTPS_PORT: u16 = 8080;

/// Extension of the data source file created in the persistent directory.
pub const DATA_SOURCE_EXTENSION: &str = "db";

/// Suffix appended to the log name and log file path for the audit log.
pub const AUDIT_SUFFIX: &str = "audit";

/// Environment variable selecting the primary log format.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

// Environment variables mirroring each flag; the flag wins when both are set.
pub const HTTPS_PORT_ENV: &str = "REST_APP_HTTPS_PORT";
pub const LOG_FILEPATH_ENV: &str = "REST_APP_LOG_FILEPATH";
pub const LOG_LEVEL_ENV: &str = "REST_APP_LOG_LEVEL";
pub const PERSISTENT_DIRECTORY_ENV: &str = "REST_APP_PERSISTENT_DIRECTORY";
pub const RESET_ENV: &str = "REST_APP_RESET";

/// Command-line flags consumed by the bootstrap sequence.
///
/// Flattened into an application's own `clap` parser, or parsed on its own
/// through [`crate::bootstrap::bootstrap_from_args`].
#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct CliArgs {
    /// HTTPS port.
    #[arg(long, default_value_t = DEFAULT_HTTPS_PORT, env = HTTPS_PORT_ENV)]
    pub https_port: u16,

    /// Fully qualified path to log file; default (blank) for STDOUT.
    #[arg(long, default_value = "", env = LOG_FILEPATH_ENV)]
    pub log_filepath: String,

    /// Logging level. Zero based index into: debug, info, warning, error, audit.
    #[arg(long, default_value_t = LogLevel::Debug.index(), env = LOG_LEVEL_ENV)]
    pub log_level: u8,

    /// Fully qualified path to directory for persisted data; default to the application path.
    #[arg(long, default_value = "", env = PERSISTENT_DIRECTORY_ENV)]
    pub persistent_directory: String,

    /// Remove all persisted data for this instance; includes user accounts, settings, log files, etc.
    #[arg(
        long,
        env = RESET_ENV,
        action = ArgAction::SetTrue,
        value_parser = BoolishValueParser::new()
    )]
    pub reset: bool,
}

impl Default for CliArgs {
    fn default() -> Self {
        Self {
            https_port: DEFAULT_HTTPS_PORT,
            log_filepath: String::new(),
            log_level: LogLevel::Debug.index(),
            persistent_directory: String::new(),
            reset: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, FromArgMatches, Parser};

    #[derive(Debug, Parser)]
    struct TestCli {
        #[command(flatten)]
        args: CliArgs,
    }

    #[test]
    fn defaults_match_flag_table() {
        let cli = TestCli::try_parse_from(["rest-app"]).unwrap();
        assert_eq!(cli.args, CliArgs::default());
        assert_eq!(cli.args.https_port, 8080);
        assert_eq!(cli.args.log_level, 0);
        assert!(cli.args.log_filepath.is_empty());
        assert!(!cli.args.reset);
    }

    #[test]
    fn parses_every_flag() {
        let cli = TestCli::try_parse_from([
            "rest-app",
            "--https-port",
            "8443",
            "--log-filepath",
            "/var/log/app.log",
            "--log-level",
            "2",
            "--persistent-directory",
            "/var/lib/app",
            "--reset",
        ])
        .unwrap();

        assert_eq!(cli.args.https_port, 8443);
        assert_eq!(cli.args.log_filepath, "/var/log/app.log");
        assert_eq!(cli.args.log_level, 2);
        assert_eq!(cli.args.persistent_directory, "/var/lib/app");
        assert!(cli.args.reset);
    }

    #[test]
    fn reset_env_accepts_boolean_spellings() {
        let cases = [
            ("REST_APP_RESET_SPELLING_ONE", "1", true),
            ("REST_APP_RESET_SPELLING_YES", "yes", true),
            ("REST_APP_RESET_SPELLING_ON", "on", true),
            ("REST_APP_RESET_SPELLING_ZERO", "0", false),
            ("REST_APP_RESET_SPELLING_NO", "no", false),
            ("REST_APP_RESET_SPELLING_FALSE", "false", false),
        ];
        for (var, value, expected) in cases {
            std::env::set_var(var, value);
            let matches = TestCli::command()
                .mut_arg("reset", |arg| arg.env(var))
                .try_get_matches_from(["rest-app"])
                .unwrap();
            let args = CliArgs::from_arg_matches(&matches).unwrap();
            assert_eq!(args.reset, expected, "{var}={value}");
        }
    }

    #[test]
    fn reset_env_rejects_garbage() {
        std::env::set_var("REST_APP_RESET_SPELLING_GARBAGE", "maybe");
        let result = TestCli::command()
            .mut_arg("reset", |arg| arg.env("REST_APP_RESET_SPELLING_GARBAGE"))
            .try_get_matches_from(["rest-app"]);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_non_numeric_port() {
        assert!(TestCli::try_parse_from(["rest-app", "--https-port", "https"]).is_err());
    }
}
