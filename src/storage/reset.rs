// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Destructive reset of all persisted state.
//!
//! Removes the data source, every file matching the caller's glob patterns
//! and every rotated log file. Each step runs regardless of earlier
//! failures; all failures are reported together.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use glob::Pattern;

/// One failed deletion step.
#[derive(Debug, thiserror::Error)]
pub enum ResetFailure {
    #[error("deleting file: {}: {source}", path.display())]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid pattern {pattern}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("reading matches of {pattern}: {source}")]
    Glob {
        pattern: String,
        #[source]
        source: glob::GlobError,
    },
}

/// Every failure of a reset, in the order the steps ran.
#[derive(Debug, Default)]
pub struct ResetError {
    failures: Vec<ResetFailure>,
}

impl ResetError {
    pub fn failures(&self) -> &[ResetFailure] {
        &self.failures
    }

    fn push(&mut self, failure: ResetFailure) {
        tracing::warn!(error = %failure, "Reset step failed");
        self.failures.push(failure);
    }

    fn into_result(self) -> Result<(), ResetError> {
        if self.failures.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ResetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} reset step(s) failed", self.failures.len())?;
        for failure in &self.failures {
            write!(f, "; {failure}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ResetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.failures
            .first()
            .map(|f| f as &(dyn std::error::Error + 'static))
    }
}

/// Reset persisted state when `reset` is set; a no-op otherwise.
///
/// - removes `data_source` if it exists
/// - removes every file matching each of `extra_patterns`
/// - removes `<log_filepath>*` when a log file is configured
///
/// A target that does not exist is not a failure.
pub fn check_reset(
    reset: bool,
    data_source: &Path,
    extra_patterns: &[String],
    log_filepath: &str,
) -> Result<(), ResetError> {
    if !reset {
        return Ok(());
    }

    tracing::info!(data_source = %data_source.display(), "Resetting persisted state");
    let mut errors = ResetError::default();

    if data_source.is_file() {
        remove_file(data_source, &mut errors);
    }

    for pattern in extra_patterns {
        remove_all_files(pattern, &mut errors);
    }

    if !log_filepath.is_empty() {
        let rotated = format!("{}*", Pattern::escape(log_filepath));
        remove_all_files(&rotated, &mut errors);
    }

    errors.into_result()
}

/// Remove every regular file matching `pattern`. No match is success.
fn remove_all_files(pattern: &str, errors: &mut ResetError) {
    let paths = match glob::glob(pattern) {
        Ok(paths) => paths,
        Err(source) => {
            errors.push(ResetFailure::Pattern {
                pattern: pattern.to_string(),
                source,
            });
            return;
        }
    };

    for entry in paths {
        match entry {
            Ok(path) if path.is_dir() => {
                tracing::debug!(path = %path.display(), "Skipping directory during reset");
            }
            Ok(path) => remove_file(&path, errors),
            Err(source) => errors.push(ResetFailure::Glob {
                pattern: pattern.to_string(),
                source,
            }),
        }
    }
}

fn remove_file(path: &Path, errors: &mut ResetError) {
    match std::fs::remove_file(path) {
        Ok(()) => tracing::debug!(path = %path.display(), "Removed"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(source) => errors.push(ResetFailure::Remove {
            path: path.to_path_buf(),
            source,
        }),
    }
}
