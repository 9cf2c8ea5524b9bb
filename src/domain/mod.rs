// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain layer containing core types.
//!
//! Keys, raw values and their coercions, errors, the read-side service trait,
//! and secret resource names. Nothing here performs I/O.

pub mod config_key;
pub mod config_value;
pub mod errors;
pub mod secret_name;
pub mod service;

// Re-export commonly used types
pub use config_key::{keys, ConfigKey};
pub use config_value::ConfigValue;
pub use errors::{ConfigError, Result};
pub use secret_name::{SecretVersionName, DEFAULT_SETTINGS_NAME};
pub use service::ConfigurationService;
