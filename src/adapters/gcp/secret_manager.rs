// SPDX-License-Identifier: MIT OR Apache-2.0

//! Secret Manager client over the REST API.

use crate::domain::{ConfigError, Result, SecretVersionName};
use crate::ports::{SecretManagerClient, TokenSource};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;

/// Public Secret Manager endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://secretmanager.googleapis.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const SOURCE_NAME: &str = "secret-manager";

#[derive(Deserialize)]
struct AccessSecretVersionResponse {
    payload: SecretPayload,
}

#[derive(Deserialize)]
struct SecretPayload {
    #[serde(default)]
    data: String,
}

/// Reads secret versions with `GET /v1/{name}:access`.
///
/// # Examples
///
/// ```rust,no_run
/// use envsettings::adapters::gcp::{GoogleCredentialProbe, SecretManagerRestClient};
/// use envsettings::domain::SecretVersionName;
/// use envsettings::ports::SecretManagerClient;
///
/// let tokens = GoogleCredentialProbe::from_env().unwrap();
/// let client = SecretManagerRestClient::new(Box::new(tokens)).unwrap();
/// let name = SecretVersionName::latest("my-project", "django_settings").unwrap();
/// let payload = client.access_secret_version(&name).unwrap();
/// ```
pub struct SecretManagerRestClient {
    endpoint: String,
    tokens: Box<dyn TokenSource>,
    client: Client,
}

impl SecretManagerRestClient {
    /// Creates a client against the public endpoint.
    pub fn new(tokens: Box<dyn TokenSource>) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ConfigError::SourceError {
                source_name: SOURCE_NAME.to_string(),
                message: "Failed to build HTTP client".to_string(),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            tokens,
            client,
        })
    }

    /// Points the client at another endpoint (emulators, private service
    /// connect, tests).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    /// Returns the endpoint in use.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl std::fmt::Debug for SecretManagerRestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretManagerRestClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl SecretManagerClient for SecretManagerRestClient {
    fn access_secret_version(&self, name: &SecretVersionName) -> Result<String> {
        let token = self.tokens.access_token()?;
        let url = format!("{}/v1/{}:access", self.endpoint, name);

        tracing::debug!("Accessing secret version {}", name);

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .send()
            .map_err(|e| ConfigError::SourceError {
                source_name: SOURCE_NAME.to_string(),
                message: format!("Request for {} failed", name),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ConfigError::source_error(
                SOURCE_NAME,
                format!("Access to {} returned HTTP {}", name, status.as_u16()),
            ));
        }

        let body: AccessSecretVersionResponse =
            response.json().map_err(|e| ConfigError::ParseError {
                message: format!("Invalid response for {}", name),
                source: Some(Box::new(e)),
            })?;

        let bytes = STANDARD
            .decode(body.payload.data.as_bytes())
            .map_err(|e| ConfigError::ParseError {
                message: format!("Payload of {} is not valid base64", name),
                source: Some(Box::new(e)),
            })?;

        String::from_utf8(bytes).map_err(|e| ConfigError::ParseError {
            message: format!("Payload of {} is not valid UTF-8", name),
            source: Some(Box::new(e)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::gcp::StaticToken;

    #[test]
    fn test_default_endpoint() {
        let client = SecretManagerRestClient::new(Box::new(StaticToken::new("t"))).unwrap();
        assert_eq!(client.endpoint(), DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_with_endpoint_strips_trailing_slash() {
        let client = SecretManagerRestClient::new(Box::new(StaticToken::new("t")))
            .unwrap()
            .with_endpoint("http://127.0.0.1:8085/");
        assert_eq!(client.endpoint(), "http://127.0.0.1:8085");
    }

    #[test]
    fn test_debug_hides_tokens() {
        let client =
            SecretManagerRestClient::new(Box::new(StaticToken::new("secret-token"))).unwrap();
        let rendered = format!("{client:?}");
        assert!(!rendered.contains("secret-token"));
    }

    #[test]
    fn test_unreachable_endpoint_is_source_error() {
        let client = SecretManagerRestClient::new(Box::new(StaticToken::new("t")))
            .unwrap()
            .with_endpoint("http://127.0.0.1:9");
        let name = SecretVersionName::latest("p", "s").unwrap();
        assert!(matches!(
            client.access_secret_version(&name),
            Err(ConfigError::SourceError { .. })
        ));
    }
}
