// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prioritized settings resolution for web services.
//!
//! At startup exactly one settings source is selected:
//!
//! 1. a local `.env` file in the base directory;
//! 2. a CI placeholder when `TRAMPOLINE_CI` is set;
//! 3. a dotenv payload from Google Cloud Secret Manager when a project is
//!    discoverable (`GOOGLE_CLOUD_PROJECT`, `GCLOUD_PROJECT`, or ambient
//!    credentials);
//!
//! otherwise loading fails with [`domain::ConfigError::ConfigurationNotFound`].
//! The process environment is layered over the selected source, and the
//! result is materialized into typed [`settings::Settings`]: secret key,
//! debug flag, host policy, database connection parameters and file storage.
//!
//! # Architecture
//!
//! - **Domain**: keys, values, errors, secret names, the `ConfigurationService` trait
//! - **Ports**: `ConfigSource`, `ConfigParser`, and the cloud traits
//! - **Adapters**: environment, `.env` file, in-memory payload, Google Cloud
//! - **Service**: source resolver, layered lookup, settings loader
//! - **Settings**: typed settings and the process-wide cell
//!
//! # Feature Flags
//!
//! - `gcp`: Google credential discovery and the Secret Manager REST client (default)
//! - `cli`: the `envsettings` binary's dependencies (default)
//! - `full`: everything
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use envsettings::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let settings = envsettings::settings::init(|| {
//!     SettingsLoader::new(env!("CARGO_MANIFEST_DIR"))
//!         .with_google_cloud()?
//!         .load()
//! })?;
//! println!("{}", settings.database.engine);
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;
pub mod settings;

/// Commonly used types and traits.
pub mod prelude {
    pub use crate::adapters::{DotenvParser, EnvFileAdapter, EnvVarAdapter, PayloadAdapter};
    pub use crate::domain::{
        keys, ConfigError, ConfigKey, ConfigValue, ConfigurationService, Result, SecretVersionName,
    };
    pub use crate::ports::{ConfigParser, ConfigSource, CredentialProvider, SecretManagerClient};
    pub use crate::service::{DefaultConfigService, SettingsLoader, SourceKind, SourceResolver};
    pub use crate::settings::{DatabaseConfig, DatabaseEngine, HostPolicy, Settings, StorageConfig};

    #[cfg(feature = "gcp")]
    pub use crate::adapters::gcp::{GoogleCredentialProbe, SecretManagerRestClient};
}
