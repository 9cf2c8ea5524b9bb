// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared fixtures for integration tests.

use envsettings::domain::{ConfigError, Result, SecretVersionName};
use envsettings::ports::{CredentialProvider, SecretManagerClient};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Builds an environment snapshot.
#[allow(dead_code)]
pub fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Writes `<dir>/.env` and returns its path.
#[allow(dead_code)]
pub fn write_env_file(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join(".env");
    fs::write(&path, content).expect("write .env");
    path
}

/// Secret manager that records requested names and returns a fixed payload.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct RecordingSecretManager {
    payload: String,
    fail: bool,
    requested: Arc<Mutex<Vec<String>>>,
}

#[allow(dead_code)]
impl RecordingSecretManager {
    pub fn returning(payload: &str) -> Self {
        Self {
            payload: payload.to_string(),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

impl SecretManagerClient for RecordingSecretManager {
    fn access_secret_version(&self, name: &SecretVersionName) -> Result<String> {
        self.requested.lock().unwrap().push(name.to_string());
        if self.fail {
            return Err(ConfigError::source_error("secret-manager", "permission denied"));
        }
        Ok(self.payload.clone())
    }
}

/// Credential probe with a fixed answer that counts calls.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct FixedCredentials {
    project: Option<String>,
    calls: Arc<Mutex<usize>>,
}

#[allow(dead_code)]
impl FixedCredentials {
    pub fn project(project: &str) -> Self {
        Self {
            project: Some(project.to_string()),
            ..Self::default()
        }
    }

    pub fn none() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

impl CredentialProvider for FixedCredentials {
    fn discover_project(&self) -> Result<Option<String>> {
        *self.calls.lock().unwrap() += 1;
        Ok(self.project.clone())
    }
}
