// SPDX-License-Identifier: MIT OR Apache-2.0

//! Secret-manager resource names.

use crate::domain::errors::{ConfigError, Result};
use std::fmt;

/// Secret read when `SETTINGS_NAME` is not set.
pub const DEFAULT_SETTINGS_NAME: &str = "django_settings";

/// Fully qualified name of the latest version of a secret:
/// `projects/{project}/secrets/{secret}/versions/latest`.
///
/// # Examples
///
/// ```
/// use envsettings::domain::SecretVersionName;
///
/// let name = SecretVersionName::latest("my-project", "django_settings").unwrap();
/// assert_eq!(
///     name.to_string(),
///     "projects/my-project/secrets/django_settings/versions/latest"
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SecretVersionName {
    project: String,
    secret: String,
}

impl SecretVersionName {
    /// Names the latest version of `secret` in `project`.
    ///
    /// # Errors
    ///
    /// Both segments must be non-empty and free of `/` and whitespace.
    pub fn latest(project: &str, secret: &str) -> Result<Self> {
        Ok(Self {
            project: Self::segment("project", project)?,
            secret: Self::segment("secret", secret)?,
        })
    }

    fn segment(what: &str, raw: &str) -> Result<String> {
        let value = raw.trim();
        if value.is_empty() {
            return Err(ConfigError::InvalidSecretName {
                message: format!("{what} id is empty"),
            });
        }
        if value.contains('/') || value.contains(char::is_whitespace) {
            return Err(ConfigError::InvalidSecretName {
                message: format!("{what} id '{value}' contains '/' or whitespace"),
            });
        }
        Ok(value.to_string())
    }

    /// Returns the project id.
    pub fn project(&self) -> &str {
        &self.project
    }

    /// Returns the secret id.
    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl fmt::Display for SecretVersionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "projects/{}/secrets/{}/versions/latest",
            self.project, self.secret
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_formats_resource_name() {
        let name = SecretVersionName::latest("tca-dgcor", "tablero_settings").unwrap();
        assert_eq!(
            name.to_string(),
            "projects/tca-dgcor/secrets/tablero_settings/versions/latest"
        );
        assert_eq!(name.project(), "tca-dgcor");
        assert_eq!(name.secret(), "tablero_settings");
    }

    #[test]
    fn test_segments_are_trimmed() {
        let name = SecretVersionName::latest(" p ", "s\n").unwrap();
        assert_eq!(name.to_string(), "projects/p/secrets/s/versions/latest");
    }

    #[test]
    fn test_empty_project_rejected() {
        let err = SecretVersionName::latest("", DEFAULT_SETTINGS_NAME).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSecretName { .. }));
    }

    #[test]
    fn test_slash_in_secret_rejected() {
        assert!(SecretVersionName::latest("p", "a/b").is_err());
    }
}
