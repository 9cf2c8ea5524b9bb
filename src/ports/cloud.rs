// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ports for the cloud collaborators: ambient credentials and the secret
//! manager.
//!
//! The resolver only ever talks to these traits. The Google Cloud adapters
//! implement them over HTTP; tests implement them in memory.

use crate::domain::{Result, SecretVersionName};

/// Discovers the cloud project associated with ambient credentials.
pub trait CredentialProvider: Send + Sync {
    /// Returns the discovered project id, or `Ok(None)` when credentials are
    /// present but carry no project.
    ///
    /// # Errors
    ///
    /// Returns an error when no credentials can be found at all. Callers
    /// treat that as "no project" and carry on.
    fn discover_project(&self) -> Result<Option<String>>;
}

/// Supplies OAuth2 bearer tokens for cloud API calls.
pub trait TokenSource: Send + Sync {
    /// Returns a currently valid access token.
    fn access_token(&self) -> Result<String>;
}

/// Reads secret payloads from a secret manager.
pub trait SecretManagerClient: Send + Sync {
    /// Fetches the payload of `name`, decoded as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Transport failures, non-success responses, and non-UTF-8 payloads are
    /// all reported as errors.
    fn access_secret_version(&self, name: &SecretVersionName) -> Result<String>;
}
