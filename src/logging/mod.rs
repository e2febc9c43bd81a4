// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Application and Audit Logging
//!
//! Two sinks share one `tracing` registry:
//!
//! - the **application log** receives every event except those targeted at
//!   [`AUDIT_TARGET`], gated by the configured [`LogLevel`];
//! - the **audit log** receives only [`AUDIT_TARGET`] events, emitted with
//!   the [`audit!`](crate::audit) macro.
//!
//! A blank file path writes to standard output. A file path enables
//! size-bounded rotation between `<path>.0` and `<path>.1`.
//!
//! Building the logs does not install anything globally: callers get a
//! [`Logging`] handle and decide when to [`Logging::install`] it.

pub mod rotating;

use std::fmt;
use std::io;
use std::sync::Mutex;

use tracing::level_filters::LevelFilter;
use tracing::Dispatch;
use tracing_subscriber::filter::{EnvFilter, Targets};
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{Layer, Registry};

use crate::config::LOG_FORMAT_ENV;
use crate::storage::paths::audit_log_target;

pub use rotating::RotatingFile;

/// Target that routes an event to the audit log.
pub const AUDIT_TARGET: &str = "audit";

/// Emit an event to the audit log.
///
/// ```ignore
/// audit!(user = "admin", "configuration replaced");
/// ```
#[macro_export]
macro_rules! audit {
    ($($arg:tt)+) => {
        ::tracing::event!(target: $crate::logging::AUDIT_TARGET, ::tracing::Level::INFO, $($arg)+)
    };
}

// =============================================================================
// Levels
// =============================================================================

/// Fixed, ordered level list. The CLI selects a level by its index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    Debug = 0,
    Info = 1,
    Warning = 2,
    Error = 3,
    Audit = 4,
}

impl LogLevel {
    pub const ALL: [LogLevel; 5] = [
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warning,
        LogLevel::Error,
        LogLevel::Audit,
    ];

    pub const fn index(self) -> u8 {
        self as u8
    }

    pub fn from_index(index: u8) -> Result<Self, LogError> {
        Self::ALL
            .get(usize::from(index))
            .copied()
            .ok_or(LogError::InvalidLevel(index))
    }

    /// Filter directive for the application log. `Audit` silences it;
    /// audit events have their own sink.
    fn directive(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error => "error",
            LogLevel::Audit => "off",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
            LogLevel::Audit => "audit",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Settings
// =============================================================================

/// Rotation thresholds for the application and audit logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogThresholds {
    /// Writes between size checks of the application log.
    pub check_interval: u32,
    /// Size in bytes at which the application log rotates.
    pub max_size: u64,
    pub audit_check_interval: u32,
    pub audit_max_size: u64,
}

impl Default for LogThresholds {
    fn default() -> Self {
        Self {
            check_interval: 100,
            max_size: 100_000_000,
            audit_check_interval: 100,
            audit_max_size: 2_000_000,
        }
    }
}

/// Output format of the application log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl LogFormat {
    /// Read `LOG_FORMAT`; anything but `json` selects the pretty format.
    pub fn from_env() -> Self {
        match std::env::var(LOG_FORMAT_ENV) {
            Ok(value) if value.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("error creating log {path}: {source}")]
    Create {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid log level index {0}; expected 0 (debug) through 4 (audit)")]
    InvalidLevel(u8),

    #[error("installing global subscriber: {0}")]
    Install(#[from] tracing::dispatcher::SetGlobalDefaultError),
}

// =============================================================================
// Logging
// =============================================================================

/// Application and audit logs, ready to be installed.
pub struct Logging {
    dispatch: Dispatch,
    log_name: String,
    log_filepath: String,
    audit_log_name: String,
    audit_log_filepath: String,
}

impl fmt::Debug for Logging {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logging")
            .field("log_name", &self.log_name)
            .field("log_filepath", &self.log_filepath)
            .field("audit_log_name", &self.audit_log_name)
            .field("audit_log_filepath", &self.audit_log_filepath)
            .finish_non_exhaustive()
    }
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

impl Logging {
    /// Create the application log and its audit log.
    ///
    /// The audit log name and path are derived from the application log:
    /// `<name>.audit` and `<path>.audit` when a file path is set.
    pub fn create(
        log_name: &str,
        log_filepath: &str,
        level: LogLevel,
        format: LogFormat,
        thresholds: &LogThresholds,
    ) -> Result<Self, LogError> {
        let (audit_log_name, audit_log_filepath) = audit_log_target(log_name, log_filepath);

        let primary_writer =
            make_writer(log_filepath, thresholds.check_interval, thresholds.max_size)?;
        let audit_writer = make_writer(
            &audit_log_filepath,
            thresholds.audit_check_interval,
            thresholds.audit_max_size,
        )?;

        let primary_filter =
            EnvFilter::builder().parse_lossy(format!("{},{AUDIT_TARGET}=off", level.directive()));
        let ansi = log_filepath.is_empty();
        let primary: BoxedLayer = match format {
            LogFormat::Json => tracing_subscriber::fmt::layer()
                .json()
                .with_timer(ChronoUtc::rfc_3339())
                .with_writer(primary_writer)
                .with_filter(primary_filter)
                .boxed(),
            LogFormat::Pretty => tracing_subscriber::fmt::layer()
                .with_ansi(ansi)
                .with_timer(ChronoUtc::rfc_3339())
                .with_writer(primary_writer)
                .with_filter(primary_filter)
                .boxed(),
        };

        let audit_filter = Targets::new().with_target(AUDIT_TARGET, LevelFilter::TRACE);
        let audit: BoxedLayer = tracing_subscriber::fmt::layer()
            .with_ansi(audit_log_filepath.is_empty())
            .with_target(false)
            .with_timer(ChronoUtc::rfc_3339())
            .with_writer(audit_writer)
            .with_filter(audit_filter)
            .boxed();

        let subscriber = tracing_subscriber::registry().with(vec![primary, audit]);

        Ok(Self {
            dispatch: Dispatch::new(subscriber),
            log_name: log_name.to_string(),
            log_filepath: log_filepath.to_string(),
            audit_log_name,
            audit_log_filepath,
        })
    }

    pub fn log_name(&self) -> &str {
        &self.log_name
    }

    pub fn log_filepath(&self) -> &str {
        &self.log_filepath
    }

    pub fn audit_log_name(&self) -> &str {
        &self.audit_log_name
    }

    pub fn audit_log_filepath(&self) -> &str {
        &self.audit_log_filepath
    }

    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    /// Run `f` with these logs as the current subscriber.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }

    /// Install these logs as the process-wide subscriber. Fails if one is
    /// already installed.
    pub fn install(&self) -> Result<(), LogError> {
        tracing::dispatcher::set_global_default(self.dispatch.clone())?;
        Ok(())
    }
}

fn make_writer(filepath: &str, check_interval: u32, max_size: u64) -> Result<BoxMakeWriter, LogError> {
    if filepath.is_empty() {
        return Ok(BoxMakeWriter::new(io::stdout));
    }
    let file = RotatingFile::open(filepath, check_interval, max_size).map_err(|source| {
        LogError::Create {
            path: filepath.to_string(),
            source,
        }
    })?;
    Ok(BoxMakeWriter::new(Mutex::new(file)))
}
