// SPDX-License-Identifier: MIT OR Apache-2.0

//! Settings source selection.
//!
//! Exactly one source is selected, in this order:
//!
//! 1. a local `.env` file;
//! 2. the CI placeholder, when `TRAMPOLINE_CI` is set;
//! 3. the secret-manager payload, when a cloud project is discoverable;
//!
//! and if none applies, resolution fails with
//! [`ConfigError::ConfigurationNotFound`]. Sources are never merged.

use crate::adapters::{EnvFileAdapter, EnvVarAdapter, PayloadAdapter};
use crate::domain::{keys, ConfigError, ConfigKey, Result, SecretVersionName, DEFAULT_SETTINGS_NAME};
use crate::ports::{ConfigParser, CredentialProvider, SecretManagerClient};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Name of the local secret file looked up in the base directory.
pub const ENV_FILE_NAME: &str = ".env";

/// Which source won.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceKind {
    /// A local dotenv file.
    LocalFile {
        /// Location of the file
        path: PathBuf,
    },
    /// The built-in CI placeholder.
    CiPlaceholder,
    /// A secret-manager payload.
    SecretManager {
        /// Full secret version name
        name: String,
    },
}

impl SourceKind {
    /// Short name used for the source in logs and in the layered service.
    pub fn label(&self) -> &'static str {
        match self {
            SourceKind::LocalFile { .. } => "env-file",
            SourceKind::CiPlaceholder => "ci-placeholder",
            SourceKind::SecretManager { .. } => "secret-manager",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::LocalFile { path } => write!(f, "local file {}", path.display()),
            SourceKind::CiPlaceholder => f.write_str("CI placeholder"),
            SourceKind::SecretManager { name } => write!(f, "secret manager {}", name),
        }
    }
}

/// The outcome of resolution: the selected source and its raw values.
#[derive(Clone)]
pub struct ResolvedSource {
    kind: SourceKind,
    values: HashMap<String, String>,
    project_id: Option<String>,
}

impl ResolvedSource {
    /// The selected source.
    pub fn kind(&self) -> &SourceKind {
        &self.kind
    }

    /// Raw values read from the source.
    pub fn values(&self) -> &HashMap<String, String> {
        &self.values
    }

    /// Project id, when one was discovered.
    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    /// Wraps the values as a configuration source.
    pub fn to_adapter(&self) -> PayloadAdapter {
        PayloadAdapter::from_values(self.kind.label(), self.values.clone())
    }
}

impl fmt::Debug for ResolvedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&str> = self.values.keys().map(String::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("ResolvedSource")
            .field("kind", &self.kind)
            .field("keys", &keys)
            .field("project_id", &self.project_id)
            .finish()
    }
}

/// Picks the settings source.
///
/// # Examples
///
/// ```rust
/// use envsettings::service::{SourceKind, SourceResolver};
/// use std::collections::HashMap;
///
/// let resolver = SourceResolver::new("/nonexistent/app").with_environment(HashMap::from([
///     ("TRAMPOLINE_CI".to_string(), "true".to_string()),
/// ]));
/// let resolved = resolver.resolve().unwrap();
/// assert_eq!(resolved.kind(), &SourceKind::CiPlaceholder);
/// ```
pub struct SourceResolver {
    base_dir: PathBuf,
    env_file: Option<PathBuf>,
    environment: HashMap<String, String>,
    credentials: Option<Box<dyn CredentialProvider>>,
    secrets: Option<Box<dyn SecretManagerClient>>,
}

impl SourceResolver {
    /// Creates a resolver rooted at `base_dir`, reading the process
    /// environment once.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            env_file: None,
            environment: EnvVarAdapter::new().snapshot(),
            credentials: None,
            secrets: None,
        }
    }

    /// Overrides the local file location (default `<base_dir>/.env`).
    pub fn with_env_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.env_file = Some(path.into());
        self
    }

    /// Replaces the environment snapshot.
    pub fn with_environment(mut self, environment: HashMap<String, String>) -> Self {
        self.environment = environment;
        self
    }

    /// Sets the ambient credential probe.
    pub fn with_credentials(mut self, credentials: Box<dyn CredentialProvider>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Sets the secret-manager client.
    pub fn with_secret_manager(mut self, secrets: Box<dyn SecretManagerClient>) -> Self {
        self.secrets = Some(secrets);
        self
    }

    /// The base directory.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Where the local file is looked up.
    pub fn env_file_path(&self) -> PathBuf {
        self.env_file
            .clone()
            .unwrap_or_else(|| self.base_dir.join(ENV_FILE_NAME))
    }

    /// The environment snapshot.
    pub fn environment(&self) -> &HashMap<String, String> {
        &self.environment
    }

    /// Selects exactly one source.
    ///
    /// # Errors
    ///
    /// - `ConfigurationNotFound` when no source applies.
    /// - Errors reading the selected source (a malformed `.env`, a failed
    ///   secret fetch) are returned as-is; resolution does not fall through
    ///   to the next candidate.
    pub fn resolve(&self) -> Result<ResolvedSource> {
        let env_file = self.env_file_path();
        if env_file.is_file() {
            tracing::info!("Using local settings file {}", env_file.display());
            let values = EnvFileAdapter::from_file(&env_file)?.into_values();
            return Ok(ResolvedSource {
                kind: SourceKind::LocalFile { path: env_file },
                values,
                project_id: self.explicit_project(),
            });
        }
        tracing::debug!("No local settings file at {}", env_file.display());

        if self.env_value(&keys::TRAMPOLINE_CI).is_some() {
            tracing::info!("CI marker set; using placeholder settings");
            return Ok(ResolvedSource {
                kind: SourceKind::CiPlaceholder,
                values: self.ci_placeholder(),
                project_id: self.explicit_project(),
            });
        }

        if let Some(project) = self.discover_project() {
            return self.fetch_from_secret_manager(project);
        }

        Err(ConfigError::ConfigurationNotFound {
            message: format!(
                "no local {} at {}, no {} marker, and no cloud project detected",
                ENV_FILE_NAME,
                env_file.display(),
                keys::TRAMPOLINE_CI
            ),
        })
    }

    fn env_value(&self, key: &ConfigKey) -> Option<&str> {
        self.environment
            .get(key.as_str())
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    fn explicit_project(&self) -> Option<String> {
        self.env_value(&keys::GOOGLE_CLOUD_PROJECT)
            .or_else(|| self.env_value(&keys::GCLOUD_PROJECT))
            .map(str::to_string)
    }

    /// The environment wins over ambient credentials.
    fn discover_project(&self) -> Option<String> {
        if let Some(project) = self.explicit_project() {
            tracing::debug!("Cloud project taken from the environment");
            return Some(project);
        }

        let probe = self.credentials.as_ref()?;
        match probe.discover_project() {
            Ok(Some(project)) => {
                tracing::debug!("Cloud project discovered from ambient credentials");
                Some(project)
            }
            Ok(None) => {
                tracing::debug!("Ambient credentials carry no project");
                None
            }
            Err(e) => {
                tracing::warn!("Credential probe failed, continuing without credentials: {}", e);
                None
            }
        }
    }

    fn ci_placeholder(&self) -> HashMap<String, String> {
        let database = self.base_dir.join("db.sqlite3");
        HashMap::from([
            (keys::SECRET_KEY.into_string(), "a".to_string()),
            (keys::GS_BUCKET_NAME.into_string(), "None".to_string()),
            (
                keys::DATABASE_URL.into_string(),
                format!("sqlite://{}", database.display()),
            ),
        ])
    }

    fn fetch_from_secret_manager(&self, project: String) -> Result<ResolvedSource> {
        let settings_name = self
            .env_value(&keys::SETTINGS_NAME)
            .unwrap_or(DEFAULT_SETTINGS_NAME);
        let name = SecretVersionName::latest(&project, settings_name)?;

        let client = self.secrets.as_ref().ok_or_else(|| {
            ConfigError::source_error(
                "secret-manager",
                format!("project '{}' detected but no secret manager client configured", project),
            )
        })?;

        tracing::info!("Pulling settings from {}", name);
        let payload = client.access_secret_version(&name)?;
        let values = crate::adapters::DotenvParser::new().parse(&payload)?;

        Ok(ResolvedSource {
            kind: SourceKind::SecretManager {
                name: name.to_string(),
            },
            values,
            project_id: Some(project),
        })
    }
}

impl fmt::Debug for SourceResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceResolver")
            .field("base_dir", &self.base_dir)
            .field("env_file", &self.env_file_path())
            .field("credentials", &self.credentials.is_some())
            .field("secrets", &self.secrets.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct RecordingSecrets {
        requested: Arc<Mutex<Vec<String>>>,
        payload: String,
    }

    impl SecretManagerClient for RecordingSecrets {
        fn access_secret_version(&self, name: &SecretVersionName) -> Result<String> {
            self.requested.lock().unwrap().push(name.to_string());
            Ok(self.payload.clone())
        }
    }

    struct FixedProject(Option<&'static str>);

    impl CredentialProvider for FixedProject {
        fn discover_project(&self) -> Result<Option<String>> {
            Ok(self.0.map(str::to_string))
        }
    }

    struct NoCredentials;

    impl CredentialProvider for NoCredentials {
        fn discover_project(&self) -> Result<Option<String>> {
            Err(ConfigError::source_error("gcp-credentials", "none"))
        }
    }

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn recording(payload: &str) -> (RecordingSecrets, Arc<Mutex<Vec<String>>>) {
        let requested = Arc::new(Mutex::new(Vec::new()));
        (
            RecordingSecrets {
                requested: Arc::clone(&requested),
                payload: payload.to_string(),
            },
            requested,
        )
    }

    #[test]
    fn test_ci_placeholder_values() {
        let resolved = SourceResolver::new("/srv/app")
            .with_environment(env(&[("TRAMPOLINE_CI", "1")]))
            .resolve()
            .unwrap();

        assert_eq!(resolved.kind(), &SourceKind::CiPlaceholder);
        assert_eq!(resolved.values().get("SECRET_KEY"), Some(&"a".to_string()));
        assert_eq!(resolved.values().get("GS_BUCKET_NAME"), Some(&"None".to_string()));
        assert_eq!(
            resolved.values().get("DATABASE_URL"),
            Some(&"sqlite:///srv/app/db.sqlite3".to_string())
        );
    }

    #[test]
    fn test_blank_ci_marker_is_ignored() {
        let result = SourceResolver::new("/nonexistent/app")
            .with_environment(env(&[("TRAMPOLINE_CI", "  ")]))
            .resolve();
        assert!(matches!(result, Err(ConfigError::ConfigurationNotFound { .. })));
    }

    #[test]
    fn test_secret_manager_default_settings_name() {
        let (secrets, requested) = recording("SECRET_KEY=remote\n");
        let resolved = SourceResolver::new("/nonexistent/app")
            .with_environment(env(&[("GOOGLE_CLOUD_PROJECT", "proj-1")]))
            .with_secret_manager(Box::new(secrets))
            .resolve()
            .unwrap();

        assert_eq!(
            requested.lock().unwrap().as_slice(),
            ["projects/proj-1/secrets/django_settings/versions/latest"]
        );
        assert_eq!(resolved.project_id(), Some("proj-1"));
        assert_eq!(resolved.values().get("SECRET_KEY"), Some(&"remote".to_string()));
    }

    #[test]
    fn test_secret_manager_custom_settings_name() {
        let (secrets, requested) = recording("SECRET_KEY=remote\n");
        SourceResolver::new("/nonexistent/app")
            .with_environment(env(&[
                ("GOOGLE_CLOUD_PROJECT", "proj-1"),
                ("SETTINGS_NAME", "tablero_settings"),
            ]))
            .with_secret_manager(Box::new(secrets))
            .resolve()
            .unwrap();

        assert_eq!(
            requested.lock().unwrap().as_slice(),
            ["projects/proj-1/secrets/tablero_settings/versions/latest"]
        );
    }

    #[test]
    fn test_project_from_credential_probe() {
        let (secrets, requested) = recording("SECRET_KEY=x\n");
        let resolved = SourceResolver::new("/nonexistent/app")
            .with_environment(HashMap::new())
            .with_credentials(Box::new(FixedProject(Some("probed"))))
            .with_secret_manager(Box::new(secrets))
            .resolve()
            .unwrap();

        assert_eq!(resolved.project_id(), Some("probed"));
        assert_eq!(
            requested.lock().unwrap().as_slice(),
            ["projects/probed/secrets/django_settings/versions/latest"]
        );
    }

    #[test]
    fn test_environment_project_beats_probe() {
        let (secrets, requested) = recording("SECRET_KEY=x\n");
        SourceResolver::new("/nonexistent/app")
            .with_environment(env(&[("GCLOUD_PROJECT", "from-env")]))
            .with_credentials(Box::new(FixedProject(Some("probed"))))
            .with_secret_manager(Box::new(secrets))
            .resolve()
            .unwrap();

        assert!(requested.lock().unwrap()[0].starts_with("projects/from-env/"));
    }

    #[test]
    fn test_probe_failure_means_not_found() {
        let result = SourceResolver::new("/nonexistent/app")
            .with_environment(HashMap::new())
            .with_credentials(Box::new(NoCredentials))
            .resolve();
        assert!(matches!(result, Err(ConfigError::ConfigurationNotFound { .. })));
    }

    #[test]
    fn test_project_without_client_is_source_error() {
        let result = SourceResolver::new("/nonexistent/app")
            .with_environment(env(&[("GOOGLE_CLOUD_PROJECT", "proj-1")]))
            .resolve();
        assert!(matches!(result, Err(ConfigError::SourceError { .. })));
    }

    #[test]
    fn test_default_env_file_path() {
        let resolver = SourceResolver::new("/srv/app");
        assert_eq!(resolver.env_file_path(), PathBuf::from("/srv/app/.env"));
    }

    #[test]
    fn test_debug_lists_keys_not_values() {
        let resolved = SourceResolver::new("/srv/app")
            .with_environment(env(&[("TRAMPOLINE_CI", "1")]))
            .resolve()
            .unwrap();
        let rendered = format!("{resolved:?}");
        assert!(rendered.contains("SECRET_KEY"));
        assert!(!rendered.contains("sqlite:///srv/app"));
    }
}
