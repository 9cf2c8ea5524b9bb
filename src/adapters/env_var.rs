// SPDX-License-Identifier: MIT OR Apache-2.0

//! Environment variable configuration source adapter.
//!
//! Variables are read lazily on first access and cached for the life of the
//! adapter.
//! Keys are kept verbatim: `SECRET_KEY` is looked up as `SECRET_KEY`.

use crate::domain::{ConfigKey, ConfigValue, Result};
use crate::ports::source::lookup;
use crate::ports::{ConfigSource, ENVIRONMENT_PRIORITY};
use std::collections::HashMap;
use std::env;
use std::sync::RwLock;

/// Maximum length for environment variable keys (prevents DoS)
const MAX_ENV_KEY_LEN: usize = 512;

/// Maximum length for environment variable values (prevents DoS)
const MAX_ENV_VALUE_LEN: usize = 1048576; // 1MB

/// Configuration source adapter for the process environment.
///
/// # Priority
///
/// The environment has priority 2 and overrides whichever settings source
/// was selected (priority 1).
///
/// # Examples
///
/// ```rust
/// use envsettings::adapters::EnvVarAdapter;
/// use envsettings::domain::ConfigKey;
/// use envsettings::ports::ConfigSource;
/// use std::collections::HashMap;
///
/// let adapter = EnvVarAdapter::with_values(HashMap::from([
///     ("DEBUG".to_string(), "false".to_string()),
/// ]));
/// let value = adapter.get(&ConfigKey::from("DEBUG")).unwrap();
/// assert_eq!(value.unwrap().as_str(), "false");
/// ```
#[derive(Debug)]
pub struct EnvVarAdapter {
    /// `None` until first access
    cache: RwLock<Option<HashMap<String, String>>>,
}

impl EnvVarAdapter {
    /// Creates an adapter over the live process environment.
    pub fn new() -> Self {
        Self {
            cache: RwLock::new(None),
        }
    }

    /// Creates an adapter over a fixed snapshot.
    ///
    /// Resolution code and tests use this to work from an injected
    /// environment instead of mutating the process.
    pub fn with_values(values: HashMap<String, String>) -> Self {
        Self {
            cache: RwLock::new(Some(values)),
        }
    }

    /// Returns a copy of every variable this adapter sees.
    pub fn snapshot(&self) -> HashMap<String, String> {
        self.get_cache()
    }

    /// Loads the process environment, skipping oversized and non-Unicode entries.
    fn load() -> HashMap<String, String> {
        let mut cache = HashMap::new();

        for (key, value) in env::vars_os() {
            let (Some(key), Some(value)) = (key.to_str(), value.to_str()) else {
                tracing::debug!("Skipping non-Unicode environment variable");
                continue;
            };
            if key.len() > MAX_ENV_KEY_LEN || value.len() > MAX_ENV_VALUE_LEN {
                tracing::debug!(
                    "Skipping oversized environment variable: key_len={}, value_len={} \
                     (max key={}, max value={})",
                    key.len(),
                    value.len(),
                    MAX_ENV_KEY_LEN,
                    MAX_ENV_VALUE_LEN
                );
                continue;
            }
            cache.insert(key.to_string(), value.to_string());
        }

        tracing::debug!("Loaded {} environment variables", cache.len());
        cache
    }

    /// Gets the cache, loading it if necessary.
    fn get_cache(&self) -> HashMap<String, String> {
        {
            let guard = self.cache.read().unwrap_or_else(|e| e.into_inner());
            if let Some(cache) = guard.as_ref() {
                return cache.clone();
            }
        }

        let fresh = Self::load();
        let mut guard = self.cache.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(fresh.clone());
        fresh
    }
}

impl Default for EnvVarAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigSource for EnvVarAdapter {
    fn name(&self) -> &str {
        "env"
    }

    fn priority(&self) -> u8 {
        ENVIRONMENT_PRIORITY
    }

    fn get(&self, key: &ConfigKey) -> Result<Option<ConfigValue>> {
        Ok(lookup(&self.get_cache(), key))
    }
}
