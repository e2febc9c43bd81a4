// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Error tiers.
//!
//! - [`ConfigError`]: recoverable failures of `get`/`set`/`delete`/`reset`,
//!   returned to the caller with the call site that produced them.
//! - [`BootstrapError`]: the application cannot run correctly; the entry
//!   point is expected to halt.

use std::panic::Location;
use std::path::PathBuf;

use crate::logging::LogError;
use crate::storage::{ResetError, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{location}: {source}")]
    Store {
        location: &'static Location<'static>,
        #[source]
        source: StoreError,
    },

    #[error("{location}: {source}")]
    Reset {
        location: &'static Location<'static>,
        #[source]
        source: ResetError,
    },
}

impl ConfigError {
    /// Source file, line and column where the error was raised.
    pub fn location(&self) -> &'static Location<'static> {
        match self {
            ConfigError::Store { location, .. } | ConfigError::Reset { location, .. } => location,
        }
    }
}

impl From<StoreError> for ConfigError {
    #[track_caller]
    fn from(source: StoreError) -> Self {
        ConfigError::Store {
            location: Location::caller(),
            source,
        }
    }
}

impl From<ResetError> for ConfigError {
    #[track_caller]
    fn from(source: ResetError) -> Self {
        ConfigError::Reset {
            location: Location::caller(),
            source,
        }
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Startup failures. Every variant is terminal.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("invalid arguments: {0}")]
    Args(#[source] clap::Error),

    #[error("{} are required to be set", .0.join(", "))]
    MissingIdentity(Vec<&'static str>),

    #[error("creating persistent directory {}: {source}", path.display())]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("reset error: {0}")]
    Reset(#[source] ConfigError),

    #[error("error creating log: {0}")]
    Log(#[source] LogError),

    #[error("could not open configuration store {}: {source}", path.display())]
    Store {
        path: PathBuf,
        #[source]
        source: StoreError,
    },
}
