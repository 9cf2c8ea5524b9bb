// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed application settings.
//!
//! [`Settings`] is materialized once from a [`ConfigurationService`] and then
//! held for the life of the process through [`init`] and [`get`].

pub mod database;
pub mod hosts;
pub mod storage;

pub use database::{DatabaseConfig, DatabaseEngine, UnknownEngine};
pub use hosts::HostPolicy;
pub use storage::{StorageBackend, StorageConfig};

use crate::domain::{keys, ConfigKey, ConfigurationService, Result};
use crate::service::SourceKind;
use once_cell::sync::OnceCell;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Default language.
pub const DEFAULT_LANGUAGE_CODE: &str = "es-es";
/// Default time zone.
pub const DEFAULT_TIME_ZONE: &str = "America/Mexico_City";

const REDACTED: &str = "***";

static SETTINGS: OnceCell<Settings> = OnceCell::new();

/// Fully resolved settings.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    /// Source the values came from
    pub source: SourceKind,
    /// Cloud project, when known
    pub project_id: Option<String>,
    /// Signing key
    pub secret_key: String,
    /// Debug mode
    pub debug: bool,
    /// Hosts and origins
    pub hosts: HostPolicy,
    /// Default database
    pub database: DatabaseConfig,
    /// Static and media files
    pub storage: StorageConfig,
    /// Language code
    pub language_code: String,
    /// Time zone name
    pub time_zone: String,
    /// Root for local data (`BASE_DIR_ROOT` or the base directory)
    pub data_root: PathBuf,
}

impl Settings {
    /// Builds typed settings from layered values.
    ///
    /// # Errors
    ///
    /// - `ConfigKeyNotFound` when `SECRET_KEY` is missing or blank.
    /// - Conversion errors for malformed values (`DEBUG`, service URL,
    ///   database URL).
    pub fn materialize<S>(
        service: &S,
        source: SourceKind,
        project_id: Option<String>,
        base_dir: &Path,
    ) -> Result<Self>
    where
        S: ConfigurationService + ?Sized,
    {
        let secret_key = service
            .get_optional(&keys::SECRET_KEY)?
            .ok_or_else(|| crate::domain::ConfigError::ConfigKeyNotFound {
                key: keys::SECRET_KEY.into_string(),
            })?
            .as_string();

        let debug = match service.get_optional(&keys::DEBUG)? {
            Some(value) => value.as_bool(keys::DEBUG.as_str())?,
            None => true,
        };

        let data_root = service
            .get_optional(&keys::BASE_DIR_ROOT)?
            .map(|v| PathBuf::from(v.as_str().trim()))
            .unwrap_or_else(|| base_dir.to_path_buf());

        let text_or = |key: &ConfigKey, default: &str| -> Result<String> {
            Ok(service
                .get_optional(key)?
                .map(|v| v.as_str().trim().to_string())
                .unwrap_or_else(|| default.to_string()))
        };

        let settings = Self {
            source,
            project_id,
            secret_key,
            debug,
            hosts: HostPolicy::from_service(service)?,
            database: DatabaseConfig::from_service(service, &data_root)?,
            storage: StorageConfig::from_service(service, &data_root)?,
            language_code: text_or(&keys::LANGUAGE_CODE, DEFAULT_LANGUAGE_CODE)?,
            time_zone: text_or(&keys::TIME_ZONE, DEFAULT_TIME_ZONE)?,
            data_root,
        };

        tracing::info!(
            "Settings materialized from {} (debug: {})",
            settings.source,
            settings.debug
        );
        Ok(settings)
    }

    /// A copy with the secret key and database password masked.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        copy.secret_key = REDACTED.to_string();
        if !copy.database.password.is_empty() {
            copy.database.password = REDACTED.to_string();
        }
        copy
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("source", &self.source)
            .field("project_id", &self.project_id)
            .field("secret_key", &REDACTED)
            .field("debug", &self.debug)
            .field("hosts", &self.hosts)
            .field("database", &self.database)
            .field("storage", &self.storage)
            .field("language_code", &self.language_code)
            .field("time_zone", &self.time_zone)
            .field("data_root", &self.data_root)
            .finish()
    }
}

/// Resolves settings with `loader` the first time it is called; later calls
/// return the same settings without running `loader`.
///
/// # Errors
///
/// Whatever `loader` returns. A failed load leaves the settings unset, so
/// a later call may try again.
pub fn init<F>(loader: F) -> Result<&'static Settings>
where
    F: FnOnce() -> Result<Settings>,
{
    SETTINGS.get_or_try_init(loader)
}

/// The process-wide settings, if [`init`] has succeeded.
pub fn get() -> Option<&'static Settings> {
    SETTINGS.get()
}
