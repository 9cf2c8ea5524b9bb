// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration service trait definition.
//!
//! The `ConfigurationService` is the read side that settings materialization
//! talks to. It hides how many sources sit behind it and in which order they
//! are consulted.

use crate::domain::{ConfigError, ConfigKey, ConfigValue, Result};

/// The main configuration service trait.
///
/// # Examples
///
/// ```rust
/// use envsettings::domain::{ConfigError, ConfigKey, ConfigValue, ConfigurationService, Result};
///
/// struct Fixed;
///
/// impl ConfigurationService for Fixed {
///     fn get(&self, key: &ConfigKey) -> Result<ConfigValue> {
///         match key.as_str() {
///             "SECRET_KEY" => Ok(ConfigValue::from("s3cr3t")),
///             other => Err(ConfigError::ConfigKeyNotFound { key: other.to_string() }),
///         }
///     }
/// }
///
/// let service = Fixed;
/// assert_eq!(service.get(&ConfigKey::from("SECRET_KEY")).unwrap().as_str(), "s3cr3t");
/// assert!(service.get_optional(&ConfigKey::from("DEBUG")).unwrap().is_none());
/// ```
pub trait ConfigurationService {
    /// Retrieves the value for `key` from the highest-priority source that has it.
    ///
    /// # Errors
    ///
    /// Returns `ConfigKeyNotFound` when no source provides the key.
    fn get(&self, key: &ConfigKey) -> Result<ConfigValue>;

    /// Retrieves an optional value.
    ///
    /// Missing keys and blank values both yield `Ok(None)`. Any other error
    /// is propagated.
    fn get_optional(&self, key: &ConfigKey) -> Result<Option<ConfigValue>> {
        match self.get(key) {
            Ok(value) if value.is_blank() => Ok(None),
            Ok(value) => Ok(Some(value)),
            Err(ConfigError::ConfigKeyNotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
