// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Application configuration context.
//!
//! [`AppContext`] holds the Default Configuration assembled at startup and
//! the store that persists the override. The effective configuration is
//! computed on every [`AppContext::get`] by overlaying the stored override
//! onto a copy of the default.
//!
//! There is no internal locking. Share the context behind whatever
//! synchronization the application already uses if it is mutated after
//! startup.

use std::path::Path;

use crate::audit;
use crate::config::CONFIG_KEY;
use crate::error::{ConfigError, ConfigResult};
use crate::models::Config;
use crate::storage::{check_reset, KvStore, StoreResult};

#[derive(Debug)]
pub struct AppContext {
    default_config: Config,
    store: KvStore,
}

impl AppContext {
    pub fn new(default_config: Config, store: KvStore) -> Self {
        Self {
            default_config,
            store,
        }
    }

    /// Open the configuration store in `data_source` and wrap it with `default_config`.
    pub fn open(default_config: Config, data_source: &Path) -> StoreResult<Self> {
        let store = KvStore::open(data_source, CONFIG_KEY)?;
        Ok(Self::new(default_config, store))
    }

    pub fn default_config(&self) -> &Config {
        &self.default_config
    }

    /// Replace the Default Configuration. The stored override is untouched.
    pub fn set_default_config(&mut self, config: Config) {
        self.default_config = config;
    }

    /// Raw store access.
    pub fn store(&self) -> &KvStore {
        &self.store
    }

    /// Effective configuration: the stored override overlaid on the default.
    ///
    /// No stored override is not an error; the default is returned as is.
    pub fn get(&self) -> ConfigResult<Config> {
        let mut merged = self.default_config.clone();
        match self.store.deserialize::<Config>(CONFIG_KEY) {
            Ok(overrides) => merged.overlay(overrides),
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(ConfigError::from(e)),
        }
        Ok(merged)
    }

    /// Persist `config` as the override, replacing any previous one.
    ///
    /// Only the fields present in `config` take effect on later reads.
    pub fn set(&self, config: &Config) -> ConfigResult<()> {
        self.store.serialize(CONFIG_KEY, config)?;
        audit!(config = %config, "Configuration override stored");
        Ok(())
    }

    /// Delete the whole configuration store.
    pub fn delete(&self) -> ConfigResult<()> {
        self.store.delete_store()?;
        audit!("Configuration store deleted");
        Ok(())
    }

    /// Close the store and remove the data source, rotated logs and every
    /// file matching `extra_patterns`.
    pub fn reset(self, extra_patterns: &[String]) -> ConfigResult<()> {
        let data_source = self.default_config.data_source_name.clone().unwrap_or_default();
        let log_filepath = self.default_config.log_filepath.clone().unwrap_or_default();
        drop(self.store);

        check_reset(true, Path::new(&data_source), extra_patterns, &log_filepath)?;
        Ok(())
    }
}
