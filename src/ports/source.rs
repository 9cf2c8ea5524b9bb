// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration source trait definition.
//!
//! A `ConfigSource` is one layer of raw key/value settings: the process
//! environment, a local `.env` file, a CI placeholder, or a payload fetched
//! from a secret manager.

use crate::domain::{ConfigKey, ConfigValue, Result};
use std::collections::HashMap;

/// Priority of the process environment.
pub const ENVIRONMENT_PRIORITY: u8 = 2;

/// Priority of the single selected settings source (file, placeholder, or
/// secret payload).
pub const SELECTED_SOURCE_PRIORITY: u8 = 1;

/// A trait for configuration sources.
///
/// # Priority
///
/// Higher priority values take precedence. The process environment
/// ([`ENVIRONMENT_PRIORITY`]) sits above the selected settings source
/// ([`SELECTED_SOURCE_PRIORITY`]), so an exported variable always wins over
/// the same key in a `.env` file or secret payload.
///
/// # Examples
///
/// ```rust
/// use envsettings::ports::ConfigSource;
/// use envsettings::domain::{ConfigKey, ConfigValue, Result};
///
/// struct Empty;
///
/// impl ConfigSource for Empty {
///     fn name(&self) -> &str { "empty" }
///     fn priority(&self) -> u8 { 1 }
///     fn get(&self, _key: &ConfigKey) -> Result<Option<ConfigValue>> { Ok(None) }
/// }
///
/// assert!(Empty.get(&ConfigKey::from("SECRET_KEY")).unwrap().is_none());
/// ```
pub trait ConfigSource: Send + Sync {
    /// Short identifier used in logs and errors ("env", "env-file", ...).
    fn name(&self) -> &str;

    /// Precedence of this source; higher wins.
    fn priority(&self) -> u8;

    /// Returns `Ok(None)` when the key is absent from this source.
    fn get(&self, key: &ConfigKey) -> Result<Option<ConfigValue>>;
}

/// Looks `key` up in a plain map, the storage most sources share.
pub(crate) fn lookup(values: &HashMap<String, String>, key: &ConfigKey) -> Option<ConfigValue> {
    values.get(key.as_str()).map(|v| ConfigValue::from(v.as_str()))
}
