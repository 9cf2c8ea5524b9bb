// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service layer: source selection, layering and loading.
//!
//! [`SourceResolver`] picks the one settings source, [`DefaultConfigService`]
//! layers the environment over it, and [`SettingsLoader`] drives both.

pub mod default_service;
pub mod loader;
pub mod resolver;

pub use default_service::{ConfigurationServiceBuilder, DefaultConfigService};
pub use loader::SettingsLoader;
pub use resolver::{ResolvedSource, SourceKind, SourceResolver, ENV_FILE_NAME};
