// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Persistent Storage Module
//!
//! All persisted state of an application instance lives in its persistent
//! directory.
//!
//! ## Storage Layout
//!
//! ```text
//! <persistent directory>/
//!   <app name>.db     # redb file; store "config" holds the override record
//! <log file path>.0   # rotated application logs (when a file is configured)
//! <log file path>.1
//! <log file path>.audit.0
//! <log file path>.audit.1
//! ```
//!
//! [`check_reset`] deletes all of the above plus caller-supplied patterns.

pub mod kv_store;
pub mod paths;
pub mod reset;

pub use kv_store::{KvStore, StoreError, StoreResult};
pub use paths::StoragePaths;
pub use reset::{check_reset, ResetError, ResetFailure};
