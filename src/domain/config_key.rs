// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration key newtype and the well-known keys read during settings
//! materialization.
//!
//! Keys are environment-variable style names (`SECRET_KEY`, `DATABASE_URL`).
//! The same key is used to look a value up in the process environment, in a
//! local `.env` file, and in a secret-manager payload.

use std::borrow::Cow;
use std::fmt;

/// A type-safe wrapper for configuration keys.
///
/// Keys can be built at compile time from string literals, which lets the
/// crate expose the keys it understands as constants in [`keys`].
///
/// # Examples
///
/// ```
/// use envsettings::domain::config_key::{keys, ConfigKey};
///
/// let key = ConfigKey::from("DATABASE_URL");
/// assert_eq!(key, keys::DATABASE_URL);
/// assert_eq!(key.as_str(), "DATABASE_URL");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConfigKey(Cow<'static, str>);

impl ConfigKey {
    /// Creates a key from an owned `String`.
    pub fn new(key: String) -> Self {
        ConfigKey(Cow::Owned(key))
    }

    /// Creates a key from a string literal without allocating.
    pub const fn from_static(key: &'static str) -> Self {
        ConfigKey(Cow::Borrowed(key))
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Converts the key into an owned `String`.
    pub fn into_string(self) -> String {
        self.0.into_owned()
    }
}

impl From<String> for ConfigKey {
    fn from(s: String) -> Self {
        ConfigKey::new(s)
    }
}

impl From<&str> for ConfigKey {
    fn from(s: &str) -> Self {
        ConfigKey::new(s.to_string())
    }
}

impl From<ConfigKey> for String {
    fn from(key: ConfigKey) -> Self {
        key.into_string()
    }
}

impl AsRef<str> for ConfigKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Keys consumed while resolving and materializing settings.
pub mod keys {
    use super::ConfigKey;

    /// Application signing secret. Required.
    pub const SECRET_KEY: ConfigKey = ConfigKey::from_static("SECRET_KEY");
    /// Debug flag, boolean literal.
    pub const DEBUG: ConfigKey = ConfigKey::from_static("DEBUG");
    /// Database connection URL.
    pub const DATABASE_URL: ConfigKey = ConfigKey::from_static("DATABASE_URL");
    /// Object storage bucket for static and media files.
    pub const GS_BUCKET_NAME: ConfigKey = ConfigKey::from_static("GS_BUCKET_NAME");
    /// Public URL of the deployed service.
    pub const CLOUDRUN_SERVICE_URL: ConfigKey = ConfigKey::from_static("CLOUDRUN_SERVICE_URL");
    /// Forces the database host and port to the local auth proxy.
    pub const USE_CLOUD_SQL_AUTH_PROXY: ConfigKey =
        ConfigKey::from_static("USE_CLOUD_SQL_AUTH_PROXY");
    /// Cloud project id.
    pub const GOOGLE_CLOUD_PROJECT: ConfigKey = ConfigKey::from_static("GOOGLE_CLOUD_PROJECT");
    /// Legacy spelling of the cloud project id.
    pub const GCLOUD_PROJECT: ConfigKey = ConfigKey::from_static("GCLOUD_PROJECT");
    /// Name of the secret holding the settings payload.
    pub const SETTINGS_NAME: ConfigKey = ConfigKey::from_static("SETTINGS_NAME");
    /// CI marker.
    pub const TRAMPOLINE_CI: ConfigKey = ConfigKey::from_static("TRAMPOLINE_CI");
    /// Space-separated allowed hosts.
    pub const DJANGO_ALLOWED_HOSTS: ConfigKey = ConfigKey::from_static("DJANGO_ALLOWED_HOSTS");
    /// Space-separated CSRF trusted origins.
    pub const DJANGO_TRUSTED_ORIGINS: ConfigKey =
        ConfigKey::from_static("DJANGO_TRUSTED_ORIGINS");
    /// Database engine, backend path or bare name.
    pub const SQL_ENGINE: ConfigKey = ConfigKey::from_static("SQL_ENGINE");
    /// Database name (file path for SQLite).
    pub const SQL_DATABASE: ConfigKey = ConfigKey::from_static("SQL_DATABASE");
    /// Database user.
    pub const DB_USER: ConfigKey = ConfigKey::from_static("DB_USER");
    /// Database password.
    pub const DB_PASS: ConfigKey = ConfigKey::from_static("DB_PASS");
    /// Database host.
    pub const DB_HOST: ConfigKey = ConfigKey::from_static("DB_HOST");
    /// Database port.
    pub const DB_PORT: ConfigKey = ConfigKey::from_static("DB_PORT");
    /// Root directory for the `data/` tree (static, media, default SQLite file).
    pub const BASE_DIR_ROOT: ConfigKey = ConfigKey::from_static("BASE_DIR_ROOT");
    /// Language code.
    pub const LANGUAGE_CODE: ConfigKey = ConfigKey::from_static("LANGUAGE_CODE");
    /// Time zone name.
    pub const TIME_ZONE: ConfigKey = ConfigKey::from_static("TIME_ZONE");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_static_and_owned_keys_compare_equal() {
        let owned = ConfigKey::new("SECRET_KEY".to_string());
        assert_eq!(owned, keys::SECRET_KEY);
    }

    #[test]
    fn test_static_key_hashes_like_owned_key() {
        let mut map = HashMap::new();
        map.insert(keys::DEBUG, "true");

        assert_eq!(map.get(&ConfigKey::from("DEBUG")), Some(&"true"));
        assert_eq!(map.get(&ConfigKey::from("debug")), None);
    }

    #[test]
    fn test_config_key_display() {
        assert_eq!(format!("{}", keys::DATABASE_URL), "DATABASE_URL");
    }

    #[test]
    fn test_config_key_into_string() {
        let s: String = keys::GS_BUCKET_NAME.into();
        assert_eq!(s, "GS_BUCKET_NAME");
    }

    #[test]
    fn test_config_key_as_ref() {
        let key = ConfigKey::from("DB_HOST");
        let s: &str = key.as_ref();
        assert_eq!(s, "DB_HOST");
    }

    #[test]
    fn test_config_key_ordering() {
        let mut keys = vec![ConfigKey::from("DB_PORT"), ConfigKey::from("DB_HOST")];
        keys.sort();
        assert_eq!(keys[0].as_str(), "DB_HOST");
    }
}
