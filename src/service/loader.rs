// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end settings loading: resolve a source, layer the environment over
//! it, and materialize typed settings.

use crate::adapters::EnvVarAdapter;
use crate::domain::Result;
use crate::ports::{CredentialProvider, SecretManagerClient};
use crate::service::{DefaultConfigService, ResolvedSource, SourceResolver};
use crate::settings::Settings;
use std::collections::HashMap;
use std::path::PathBuf;

/// Loads [`Settings`] for an application rooted at a base directory.
///
/// # Examples
///
/// ```rust,no_run
/// use envsettings::service::SettingsLoader;
///
/// # fn main() -> envsettings::domain::Result<()> {
/// let settings = envsettings::settings::init(|| {
///     SettingsLoader::new("/srv/app").with_google_cloud()?.load()
/// })?;
/// println!("database engine: {}", settings.database.engine);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SettingsLoader {
    resolver: SourceResolver,
}

impl SettingsLoader {
    /// Creates a loader that reads the process environment.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            resolver: SourceResolver::new(base_dir),
        }
    }

    /// Overrides the local file location.
    pub fn with_env_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.resolver = self.resolver.with_env_file(path);
        self
    }

    /// Replaces the environment snapshot used for both source selection and
    /// layering.
    pub fn with_environment(mut self, environment: HashMap<String, String>) -> Self {
        self.resolver = self.resolver.with_environment(environment);
        self
    }

    /// Sets the ambient credential probe.
    pub fn with_credentials(mut self, credentials: Box<dyn CredentialProvider>) -> Self {
        self.resolver = self.resolver.with_credentials(credentials);
        self
    }

    /// Sets the secret-manager client.
    pub fn with_secret_manager(mut self, secrets: Box<dyn SecretManagerClient>) -> Self {
        self.resolver = self.resolver.with_secret_manager(secrets);
        self
    }

    /// Wires the Google credential probe and Secret Manager REST client.
    ///
    /// Nothing is contacted until [`load`](Self::load) reaches the
    /// secret-manager step.
    #[cfg(feature = "gcp")]
    pub fn with_google_cloud(self) -> Result<Self> {
        use crate::adapters::gcp::{GoogleCredentialProbe, SecretManagerRestClient};

        let probe = GoogleCredentialProbe::from_env()?;
        let client = SecretManagerRestClient::new(Box::new(probe.clone()))?;
        Ok(self
            .with_credentials(Box::new(probe))
            .with_secret_manager(Box::new(client)))
    }

    /// Selects the source without materializing settings.
    pub fn resolve(&self) -> Result<ResolvedSource> {
        self.resolver.resolve()
    }

    /// Resolves, layers and materializes.
    ///
    /// # Errors
    ///
    /// `ConfigurationNotFound` when no source applies, plus any error from
    /// reading the source or converting its values.
    pub fn load(&self) -> Result<Settings> {
        let resolved = self.resolve()?;
        let service = self.layer(&resolved)?;
        Settings::materialize(
            &service,
            resolved.kind().clone(),
            resolved.project_id().map(str::to_string),
            self.resolver.base_dir(),
        )
    }

    /// The environment (priority 2) over the selected source (priority 1).
    fn layer(&self, resolved: &ResolvedSource) -> Result<DefaultConfigService> {
        DefaultConfigService::builder()
            .with_source(Box::new(resolved.to_adapter()))
            .with_source(Box::new(EnvVarAdapter::with_values(
                self.resolver.environment().clone(),
            )))
            .build()
    }
}
