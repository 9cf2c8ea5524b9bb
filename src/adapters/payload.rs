// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory key/value source.
//!
//! Used for settings that never touch the filesystem: the CI placeholder and
//! payloads fetched from a secret manager.

use crate::adapters::env_file::DotenvParser;
use crate::domain::{ConfigKey, ConfigValue, Result};
use crate::ports::source::lookup;
use crate::ports::{ConfigParser, ConfigSource, SELECTED_SOURCE_PRIORITY};
use std::collections::HashMap;

/// A named, fixed set of values.
///
/// # Examples
///
/// ```rust
/// use envsettings::adapters::PayloadAdapter;
/// use envsettings::domain::ConfigKey;
/// use envsettings::ports::ConfigSource;
///
/// let adapter = PayloadAdapter::parse("secret-manager", "SECRET_KEY=abc\n").unwrap();
/// assert_eq!(adapter.name(), "secret-manager");
/// assert!(adapter.get(&ConfigKey::from("SECRET_KEY")).unwrap().is_some());
/// ```
#[derive(Debug, Clone)]
pub struct PayloadAdapter {
    name: String,
    values: HashMap<String, String>,
}

impl PayloadAdapter {
    /// Wraps already-parsed values.
    pub fn from_values(name: impl Into<String>, values: HashMap<String, String>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Parses a dotenv-style payload.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` when the payload is malformed.
    pub fn parse(name: impl Into<String>, payload: &str) -> Result<Self> {
        let values = DotenvParser::new().parse(payload)?;
        Ok(Self::from_values(name, values))
    }

    /// Returns the wrapped values.
    pub fn values(&self) -> &HashMap<String, String> {
        &self.values
    }
}

impl ConfigSource for PayloadAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> u8 {
        SELECTED_SOURCE_PRIORITY
    }

    fn get(&self, key: &ConfigKey) -> Result<Option<ConfigValue>> {
        Ok(lookup(&self.values, key))
    }
}
