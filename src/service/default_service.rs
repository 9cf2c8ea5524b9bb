// SPDX-License-Identifier: MIT OR Apache-2.0

//! Default configuration service implementation.
//!
//! Aggregates sources and answers lookups from the highest-priority source
//! that has the key. Used to layer the process environment over whichever
//! settings source the resolver selected.

use crate::domain::{ConfigError, ConfigKey, ConfigValue, ConfigurationService, Result};
use crate::ports::ConfigSource;
use std::collections::HashMap;
use std::sync::RwLock;

/// Default implementation of the configuration service.
///
/// # Examples
///
/// ```rust
/// use envsettings::adapters::{EnvVarAdapter, PayloadAdapter};
/// use envsettings::domain::{ConfigKey, ConfigurationService};
/// use envsettings::service::DefaultConfigService;
/// use std::collections::HashMap;
///
/// # fn main() -> envsettings::domain::Result<()> {
/// let service = DefaultConfigService::builder()
///     .with_source(Box::new(PayloadAdapter::parse("secret-manager", "DEBUG=true")?))
///     .with_source(Box::new(EnvVarAdapter::with_values(HashMap::from([
///         ("DEBUG".to_string(), "false".to_string()),
///     ]))))
///     .build()?;
///
/// // The environment outranks the selected source.
/// assert_eq!(service.get(&ConfigKey::from("DEBUG"))?.as_str(), "false");
/// # Ok(())
/// # }
/// ```
pub struct DefaultConfigService {
    /// Sources in priority order (highest first)
    sources: Vec<Box<dyn ConfigSource>>,
    /// Values already resolved
    cache: RwLock<HashMap<String, ConfigValue>>,
}

impl DefaultConfigService {
    /// Creates a service with no sources.
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a new configuration service builder.
    pub fn builder() -> ConfigurationServiceBuilder {
        ConfigurationServiceBuilder::new()
    }

    /// Adds a source; sources stay sorted by priority.
    pub fn add_source(&mut self, source: Box<dyn ConfigSource>) {
        self.sources.push(source);
        // Stable sort keeps insertion order among equal priorities.
        self.sources.sort_by_key(|s| std::cmp::Reverse(s.priority()));
        self.invalidate_cache();
    }

    /// Names of the sources, highest priority first.
    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    fn invalidate_cache(&self) {
        if let Ok(mut cache) = self.cache.write() {
            cache.clear();
        }
    }

    /// Queries all sources for a configuration value, respecting priority order.
    fn query_sources(&self, key: &ConfigKey) -> Option<ConfigValue> {
        for source in &self.sources {
            match source.get(key) {
                Ok(Some(value)) => return Some(value),
                Ok(None) => continue,
                Err(e) => {
                    tracing::debug!(
                        "Error querying source '{}' for key '{}': {}",
                        source.name(),
                        key,
                        e
                    );
                    continue;
                }
            }
        }
        None
    }
}

impl Default for DefaultConfigService {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigurationService for DefaultConfigService {
    fn get(&self, key: &ConfigKey) -> Result<ConfigValue> {
        if let Ok(cache) = self.cache.read() {
            if let Some(value) = cache.get(key.as_str()) {
                return Ok(value.clone());
            }
        }

        let value = self
            .query_sources(key)
            .ok_or_else(|| ConfigError::ConfigKeyNotFound {
                key: key.as_str().to_string(),
            })?;

        if let Ok(mut cache) = self.cache.write() {
            cache.insert(key.as_str().to_string(), value.clone());
        }

        Ok(value)
    }
}

/// Builder for constructing a `DefaultConfigService`.
pub struct ConfigurationServiceBuilder {
    sources: Vec<Box<dyn ConfigSource>>,
}

impl ConfigurationServiceBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Adds a configuration source.
    pub fn with_source(mut self, source: Box<dyn ConfigSource>) -> Self {
        self.sources.push(source);
        self
    }

    /// Builds the configuration service.
    pub fn build(self) -> Result<DefaultConfigService> {
        let mut service = DefaultConfigService::new();
        for source in self.sources {
            service.add_source(source);
        }
        Ok(service)
    }
}

impl Default for ConfigurationServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}
