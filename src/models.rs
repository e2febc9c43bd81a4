// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Configuration model.
//!
//! [`Config`] is both the in-memory effective configuration and the wire
//! format of the persisted override. Every field is optional: `None` means
//! "not set here" and is omitted from the serialized form, so a stored
//! override only carries the fields it overrides.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Every recognized setting of the application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    // =========================================================================
    // CLI
    // =========================================================================
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub https_port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_filepath: Option<String>,
    /// Zero based index into [`crate::logging::LogLevel::ALL`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persistent_directory: Option<String>,

    // =========================================================================
    // Identity and derived
    // =========================================================================
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit_log_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_source_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jwt_key_filepath: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "duration_nanos"
    )]
    pub jwt_auth_remove_interval: Option<Duration>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "duration_nanos"
    )]
    pub jwt_auth_timeout_interval: Option<Duration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_data_source: Option<bool>,
    /// Ordered password rules. Replaced as a whole by an override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_validation: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl Config {
    /// Overlay `overrides` onto `self`, field by field.
    ///
    /// A field present in `overrides` replaces the value in `self`; an absent
    /// field leaves `self` untouched.
    pub fn overlay(&mut self, overrides: Config) {
        let Config {
            https_port,
            log_filepath,
            log_level,
            persistent_directory,
            app_name,
            app_path,
            audit_log_name,
            data_source_name,
            jwt_key_filepath,
            jwt_auth_remove_interval,
            jwt_auth_timeout_interval,
            log_name,
            new_data_source,
            password_validation,
            version,
        } = overrides;

        overlay_field(&mut self.https_port, https_port);
        overlay_field(&mut self.log_filepath, log_filepath);
        overlay_field(&mut self.log_level, log_level);
        overlay_field(&mut self.persistent_directory, persistent_directory);
        overlay_field(&mut self.app_name, app_name);
        overlay_field(&mut self.app_path, app_path);
        overlay_field(&mut self.audit_log_name, audit_log_name);
        overlay_field(&mut self.data_source_name, data_source_name);
        overlay_field(&mut self.jwt_key_filepath, jwt_key_filepath);
        overlay_field(&mut self.jwt_auth_remove_interval, jwt_auth_remove_interval);
        overlay_field(&mut self.jwt_auth_timeout_interval, jwt_auth_timeout_interval);
        overlay_field(&mut self.log_name, log_name);
        overlay_field(&mut self.new_data_source, new_data_source);
        overlay_field(&mut self.password_validation, password_validation);
        overlay_field(&mut self.version, version);
    }

    /// Return a copy of `self` with `overrides` overlaid.
    pub fn merged(&self, overrides: Config) -> Config {
        let mut merged = self.clone();
        merged.overlay(overrides);
        merged
    }

    /// Names of the identity fields that must be set before bootstrap.
    pub fn missing_identity_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.app_name.is_none() {
            missing.push("app_name");
        }
        if self.app_path.is_none() {
            missing.push("app_path");
        }
        if self.log_name.is_none() {
            missing.push("log_name");
        }
        missing
    }
}

fn overlay_field<T>(base: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *base = value;
    }
}

/// Compact JSON wire form; absent fields omitted.
impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

/// Durations on the wire are integer nanoseconds.
mod duration_nanos {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(duration) => {
                let nanos = u64::try_from(duration.as_nanos())
                    .map_err(|_| <S::Error as serde::ser::Error>::custom("duration exceeds u64 nanoseconds"))?;
                serializer.serialize_some(&nanos)
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Duration>, D::Error> {
        let nanos: Option<u64> = Option::deserialize(deserializer)?;
        Ok(nanos.map(Duration::from_nanos))
    }
}
