// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Path utilities for the persisted state layout.

use std::path::{Path, PathBuf};

use crate::config::{AUDIT_SUFFIX, DATA_SOURCE_EXTENSION};

/// Storage path utilities for one application instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePaths {
    root: PathBuf,
    app_name: String,
}

impl StoragePaths {
    /// Resolve the persistent directory: an explicit (non-blank) directory
    /// wins, otherwise the application path is used.
    pub fn resolve(persistent_directory: &str, app_path: &str, app_name: &str) -> Self {
        let root = if persistent_directory.is_empty() {
            app_path
        } else {
            persistent_directory
        };
        Self::new(root, app_name)
    }

    /// Create paths rooted at `root` (useful for testing).
    pub fn new(root: impl AsRef<Path>, app_name: impl Into<String>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            app_name: app_name.into(),
        }
    }

    /// Persistent directory. Empty when neither a directory nor an
    /// application path was supplied (current working directory).
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Data source file: `<root>/<app name>.db`.
    pub fn data_source(&self) -> PathBuf {
        self.root
            .join(format!("{}.{DATA_SOURCE_EXTENSION}", self.app_name))
    }
}

/// Audit log name and file path derived from the primary log.
///
/// Both are suffixed with `.audit` when a log file is configured and left
/// blank (standard output) otherwise.
pub fn audit_log_target(log_name: &str, log_filepath: &str) -> (String, String) {
    if log_filepath.is_empty() {
        return (String::new(), String::new());
    }
    (
        format!("{log_name}.{AUDIT_SUFFIX}"),
        format!("{log_filepath}.{AUDIT_SUFFIX}"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_directory_wins() {
        let paths = StoragePaths::resolve("/var/lib/app", "/opt/app", "app");
        assert_eq!(paths.root(), Path::new("/var/lib/app"));
    }

    #[test]
    fn blank_directory_falls_back_to_app_path() {
        let paths = StoragePaths::resolve("", "/opt/app", "app");
        assert_eq!(paths.root(), Path::new("/opt/app"));
    }

    #[test]
    fn data_source_is_named_after_app() {
        let paths = StoragePaths::new("/tmp/test-data", "billing");
        assert_eq!(
            paths.data_source(),
            PathBuf::from("/tmp/test-data/billing.db")
        );
    }

    #[test]
    fn audit_target_with_file() {
        let (name, path) = audit_log_target("app", "/var/log/app.log");
        assert_eq!(name, "app.audit");
        assert_eq!(path, "/var/log/app.log.audit");
    }

    #[test]
    fn audit_target_without_file_is_blank() {
        let (name, path) = audit_log_target("app", "");
        assert!(name.is_empty());
        assert!(path.is_empty());
    }
}
