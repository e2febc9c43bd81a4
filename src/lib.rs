// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! rest-app common - Configuration Bootstrap
//!
//! Process-wide configuration for server applications: command-line
//! defaults merged with a persisted override, application and audit
//! logging, and a reset path that deletes all persisted state.
//!
//! ## Modules
//!
//! - `bootstrap` - Startup sequence producing an [`AppContext`]
//! - `config` - CLI flags and fixed constants
//! - `logging` - Application and audit logs (tracing)
//! - `models` - The [`Config`] model and its merge rule
//! - `state` - Effective configuration: get / set / delete / reset
//! - `storage` - redb store, path layout, reset routine

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod state;
pub mod storage;

pub use bootstrap::{bootstrap, bootstrap_from, bootstrap_from_args, Bootstrapped};
pub use config::CliArgs;
pub use error::{BootstrapError, ConfigError, ConfigResult};
pub use logging::{LogLevel, LogThresholds, Logging};
pub use models::Config;
pub use state::AppContext;
