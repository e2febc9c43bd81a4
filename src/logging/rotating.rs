// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Size-bounded log file that alternates between `<path>.0` and `<path>.1`.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Log file writer with size based rotation.
///
/// Every `check_interval` writes the size of the active file is compared
/// against `max_size`; once reached, writing switches to the other file,
/// which is truncated first.
#[derive(Debug)]
pub struct RotatingFile {
    base: PathBuf,
    index: usize,
    file: File,
    check_interval: u32,
    writes_since_check: u32,
    max_size: u64,
}

impl RotatingFile {
    /// Open the log at `base`, continuing the most recently written of the
    /// two rotation files.
    pub fn open(base: impl AsRef<Path>, check_interval: u32, max_size: u64) -> io::Result<Self> {
        let base = base.as_ref().to_path_buf();
        if let Some(parent) = base.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let index = newest_index(&base);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(rotation_path(&base, index))?;

        Ok(Self {
            base,
            index,
            file,
            check_interval: check_interval.max(1),
            writes_since_check: 0,
            max_size,
        })
    }

    /// Path of the file currently written.
    pub fn current_path(&self) -> PathBuf {
        rotation_path(&self.base, self.index)
    }

    fn rotate_if_needed(&mut self) -> io::Result<()> {
        self.writes_since_check += 1;
        if self.writes_since_check < self.check_interval {
            return Ok(());
        }
        self.writes_since_check = 0;

        if self.file.metadata()?.len() < self.max_size {
            return Ok(());
        }

        self.file.flush()?;
        self.index = 1 - self.index;
        self.file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(self.current_path())?;
        Ok(())
    }
}

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.file.write(buf)?;
        self.rotate_if_needed()?;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

fn rotation_path(base: &Path, index: usize) -> PathBuf {
    let mut name = base.as_os_str().to_owned();
    name.push(format!(".{index}"));
    PathBuf::from(name)
}

fn newest_index(base: &Path) -> usize {
    let modified = |index| -> Option<SystemTime> {
        fs::metadata(rotation_path(base, index))
            .and_then(|m| m.modified())
            .ok()
    };
    match (modified(0), modified(1)) {
        (Some(zero), Some(one)) if one > zero => 1,
        (None, Some(_)) => 1,
        _ => 0,
    }
}
