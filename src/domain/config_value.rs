// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration value type with typed coercions.
//!
//! Every source hands back raw strings. `ConfigValue` turns them into the
//! handful of shapes settings need: booleans, whitespace-separated lists,
//! URLs, and anything else implementing `FromStr`.

use crate::domain::errors::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

/// A raw configuration value as read from a source.
///
/// # Examples
///
/// ```
/// use envsettings::domain::config_value::ConfigValue;
///
/// let value = ConfigValue::from("on");
/// assert!(value.as_bool("DEBUG").unwrap());
///
/// let hosts = ConfigValue::from("localhost  example.com");
/// assert_eq!(hosts.as_list(), vec!["localhost", "example.com"]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigValue(String);

impl ConfigValue {
    /// Creates a new `ConfigValue` from a `String`.
    pub fn new(value: String) -> Self {
        ConfigValue(value)
    }

    /// Returns the value as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns an owned copy of the value.
    pub fn as_string(&self) -> String {
        self.0.clone()
    }

    /// Returns `true` when the value is empty or only whitespace.
    ///
    /// Optional settings treat a blank value the same as an unset one.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Converts the value to a boolean.
    ///
    /// Surrounding whitespace is ignored and matching is case-insensitive:
    /// - `true`: "true", "yes", "y", "on", "ok", "1"
    /// - `false`: "false", "no", "n", "off", "0"
    ///
    /// Anything else is a conversion error.
    ///
    /// # Examples
    ///
    /// ```
    /// use envsettings::domain::config_value::ConfigValue;
    ///
    /// assert!(ConfigValue::from(" Yes ").as_bool("DEBUG").unwrap());
    /// assert!(!ConfigValue::from("0").as_bool("DEBUG").unwrap());
    /// assert!(ConfigValue::from("maybe").as_bool("DEBUG").is_err());
    /// ```
    pub fn as_bool(&self, key: &str) -> Result<bool> {
        let normalized = self.0.trim().to_lowercase();
        match normalized.as_str() {
            "true" | "yes" | "y" | "on" | "ok" | "1" => Ok(true),
            "false" | "no" | "n" | "off" | "0" => Ok(false),
            _ => normalized
                .parse::<bool>()
                .map_err(|e| ConfigError::from_parse_bool_error(key.to_string(), e)),
        }
    }

    /// Splits the value on whitespace.
    ///
    /// Runs of whitespace never produce empty entries, so a blank value yields
    /// an empty list.
    pub fn as_list(&self) -> Vec<String> {
        self.0.split_whitespace().map(str::to_string).collect()
    }

    /// Parses the trimmed value as an absolute URL.
    ///
    /// # Examples
    ///
    /// ```
    /// use envsettings::domain::config_value::ConfigValue;
    ///
    /// let value = ConfigValue::from("https://app-xyz.a.run.app");
    /// let url = value.as_url("CLOUDRUN_SERVICE_URL").unwrap();
    /// assert_eq!(url.host_str(), Some("app-xyz.a.run.app"));
    /// ```
    pub fn as_url(&self, key: &str) -> Result<Url> {
        Url::parse(self.0.trim()).map_err(|e| ConfigError::from_url_error(key.to_string(), e))
    }

    /// Parses the trimmed value into any type that implements `FromStr`.
    ///
    /// # Examples
    ///
    /// ```
    /// use envsettings::domain::config_value::ConfigValue;
    ///
    /// let port: u16 = ConfigValue::from(" 5432 ").parse("DB_PORT").unwrap();
    /// assert_eq!(port, 5432);
    /// ```
    pub fn parse<T>(&self, key: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        self.0
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::TypeConversionError {
                key: key.to_string(),
                target_type: std::any::type_name::<T>().to_string(),
                source: Box::new(e),
            })
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        ConfigValue(s)
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue(s.to_string())
    }
}

impl From<ConfigValue> for String {
    fn from(value: ConfigValue) -> Self {
        value.0
    }
}

impl AsRef<str> for ConfigValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
