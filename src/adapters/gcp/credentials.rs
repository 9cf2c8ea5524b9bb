// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ambient Google Cloud credential discovery.
//!
//! Discovery order:
//! 1. the JSON file named by `GOOGLE_APPLICATION_CREDENTIALS`;
//! 2. gcloud application default credentials
//!    (`<gcloud config dir>/application_default_credentials.json`);
//! 3. the GCE metadata server.
//!
//! The first location that exists is used; later ones are not consulted.

use crate::domain::{ConfigError, Result};
use crate::ports::{CredentialProvider, TokenSource};
use directories::BaseDirs;
use jsonwebtoken::{encode, get_current_timestamp, Algorithm, EncodingKey, Header};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Names an explicit credentials file.
pub const CREDENTIALS_ENV: &str = "GOOGLE_APPLICATION_CREDENTIALS";
/// Overrides the gcloud configuration directory.
pub const CLOUDSDK_CONFIG_ENV: &str = "CLOUDSDK_CONFIG";
/// Overrides the metadata server host.
pub const METADATA_HOST_ENV: &str = "GCE_METADATA_HOST";

const DEFAULT_METADATA_HOST: &str = "metadata.google.internal";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
/// Lifetime of a signed assertion, at most one hour.
const ASSERTION_LIFETIME_SECS: u64 = 3600;
const ADC_FILE_NAME: &str = "application_default_credentials.json";
const METADATA_TIMEOUT: Duration = Duration::from_secs(3);
const SOURCE_NAME: &str = "gcp-credentials";

/// The subset of a credentials JSON file this crate understands.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CredentialsFile {
    /// A service account key.
    ServiceAccount {
        /// Project the key belongs to
        #[serde(default)]
        project_id: Option<String>,
        /// Account the assertion is issued for
        #[serde(default)]
        client_email: Option<String>,
        /// PEM-encoded RSA signing key
        #[serde(default)]
        private_key: Option<PrivateKey>,
        /// Token endpoint named by the key file
        #[serde(default)]
        token_uri: Option<String>,
    },
    /// User credentials created by `gcloud auth application-default login`.
    AuthorizedUser {
        /// OAuth client id
        client_id: String,
        /// OAuth client secret
        client_secret: String,
        /// Long-lived refresh token
        refresh_token: String,
        /// Project billed for API calls
        #[serde(default)]
        quota_project_id: Option<String>,
    },
    /// Any other credential type (external account, impersonation, ...).
    #[serde(other)]
    Unsupported,
}

/// A PEM private key that never appears in `Debug` output.
#[derive(Clone, Deserialize)]
#[serde(transparent)]
pub struct PrivateKey(String);

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PrivateKey([REDACTED])")
    }
}

/// Claims of the self-signed assertion exchanged for an access token.
#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: u64,
    exp: u64,
}

/// Where ambient credentials were found.
#[derive(Debug, Clone)]
pub enum AmbientCredentials {
    /// A credentials JSON file.
    File {
        /// Location of the file
        path: PathBuf,
        /// Parsed contents
        contents: CredentialsFile,
    },
    /// The metadata server answered.
    MetadataServer,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Discovers ambient credentials and mints access tokens from them.
///
/// # Examples
///
/// ```rust,no_run
/// use envsettings::adapters::gcp::GoogleCredentialProbe;
/// use envsettings::ports::CredentialProvider;
///
/// let probe = GoogleCredentialProbe::from_env().unwrap();
/// if let Ok(Some(project)) = probe.discover_project() {
///     println!("running in {project}");
/// }
/// ```
#[derive(Debug, Clone)]
pub struct GoogleCredentialProbe {
    explicit_file: Option<PathBuf>,
    adc_file: Option<PathBuf>,
    metadata_base: String,
    token_uri: Option<String>,
    client: Client,
}

impl GoogleCredentialProbe {
    /// Builds a probe from the process environment and the user's home
    /// directory.
    pub fn from_env() -> Result<Self> {
        let explicit_file = env::var_os(CREDENTIALS_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        let adc_file = env::var_os(CLOUDSDK_CONFIG_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .or_else(default_gcloud_dir)
            .map(|dir| dir.join(ADC_FILE_NAME));
        let host = env::var(METADATA_HOST_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_METADATA_HOST.to_string());

        Self::new(explicit_file, adc_file, format!("http://{}", host.trim()))
    }

    /// Builds a probe with explicit locations.
    ///
    /// `metadata_base` is a base URL such as `http://metadata.google.internal`.
    pub fn new(
        explicit_file: Option<PathBuf>,
        adc_file: Option<PathBuf>,
        metadata_base: impl Into<String>,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(METADATA_TIMEOUT)
            .build()
            .map_err(|e| ConfigError::SourceError {
                source_name: SOURCE_NAME.to_string(),
                message: "Failed to build HTTP client".to_string(),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            explicit_file,
            adc_file,
            metadata_base: metadata_base.into().trim_end_matches('/').to_string(),
            token_uri: None,
            client,
        })
    }

    /// Overrides the OAuth token endpoint, including the one a service
    /// account key names.
    pub fn with_token_uri(mut self, token_uri: impl Into<String>) -> Self {
        self.token_uri = Some(token_uri.into());
        self
    }

    /// Finds the first available credentials.
    ///
    /// # Errors
    ///
    /// An explicitly named file that cannot be read is an error; so is the
    /// absence of every location.
    pub fn locate(&self) -> Result<AmbientCredentials> {
        if let Some(path) = &self.explicit_file {
            tracing::debug!("Using credentials named by {}", CREDENTIALS_ENV);
            return Self::read_file(path);
        }

        if let Some(path) = self.adc_file.as_ref().filter(|p| p.is_file()) {
            tracing::debug!("Using gcloud application default credentials");
            return Self::read_file(path);
        }

        self.metadata_get("project/project-id")
            .map(|_| AmbientCredentials::MetadataServer)
            .map_err(|e| {
                tracing::debug!("Metadata server unavailable: {}", e);
                ConfigError::source_error(SOURCE_NAME, "No ambient credentials found")
            })
    }

    fn read_file(path: &Path) -> Result<AmbientCredentials> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::SourceError {
            source_name: SOURCE_NAME.to_string(),
            message: format!("Failed to read credentials file {}", path.display()),
            source: Some(Box::new(e)),
        })?;
        let contents: CredentialsFile =
            serde_json::from_str(&content).map_err(|e| ConfigError::ParseError {
                message: format!("Invalid credentials file {}: {}", path.display(), e),
                source: Some(Box::new(e)),
            })?;
        Ok(AmbientCredentials::File {
            path: path.to_path_buf(),
            contents,
        })
    }

    fn metadata_get(&self, path: &str) -> Result<String> {
        let url = format!("{}/computeMetadata/v1/{}", self.metadata_base, path);
        let response = self
            .client
            .get(&url)
            .header("Metadata-Flavor", "Google")
            .send()
            .map_err(|e| ConfigError::SourceError {
                source_name: SOURCE_NAME.to_string(),
                message: format!("Metadata request failed: {}", path),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ConfigError::source_error(
                SOURCE_NAME,
                format!("Metadata server returned HTTP {} for {}", status.as_u16(), path),
            ));
        }

        response.text().map_err(|e| ConfigError::SourceError {
            source_name: SOURCE_NAME.to_string(),
            message: format!("Failed to read metadata response: {}", path),
            source: Some(Box::new(e)),
        })
    }

    fn refresh_user_token(
        &self,
        client_id: &str,
        client_secret: &str,
        refresh_token: &str,
    ) -> Result<String> {
        let token_uri = self.token_uri.as_deref().unwrap_or(DEFAULT_TOKEN_URI);
        let response = self
            .client
            .post(token_uri)
            .form(&[
                ("grant_type", "refresh_token"),
                ("client_id", client_id),
                ("client_secret", client_secret),
                ("refresh_token", refresh_token),
            ])
            .send()
            .map_err(|e| ConfigError::SourceError {
                source_name: SOURCE_NAME.to_string(),
                message: "Token refresh request failed".to_string(),
                source: Some(Box::new(e)),
            })?;
        Self::token_from(response)
    }

    /// Exchanges a signed RS256 assertion for an access token.
    fn service_account_token(
        &self,
        path: &Path,
        client_email: Option<&str>,
        private_key: Option<&PrivateKey>,
        file_token_uri: Option<&str>,
    ) -> Result<String> {
        let (Some(client_email), Some(private_key)) = (client_email, private_key) else {
            return Err(ConfigError::source_error(
                SOURCE_NAME,
                format!(
                    "Service account key {} lacks client_email or private_key",
                    path.display()
                ),
            ));
        };
        let token_uri = self
            .token_uri
            .as_deref()
            .or(file_token_uri)
            .unwrap_or(DEFAULT_TOKEN_URI);

        let key = EncodingKey::from_rsa_pem(private_key.0.as_bytes()).map_err(|e| {
            ConfigError::ParseError {
                message: format!("Invalid private key in {}", path.display()),
                source: Some(Box::new(e)),
            }
        })?;
        let iat = get_current_timestamp();
        let claims = AssertionClaims {
            iss: client_email,
            scope: CLOUD_PLATFORM_SCOPE,
            aud: token_uri,
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        };
        let assertion = encode(&Header::new(Algorithm::RS256), &claims, &key).map_err(|e| {
            ConfigError::SourceError {
                source_name: SOURCE_NAME.to_string(),
                message: "Failed to sign token assertion".to_string(),
                source: Some(Box::new(e)),
            }
        })?;

        tracing::debug!("Requesting service account token for {}", client_email);
        let response = self
            .client
            .post(token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .map_err(|e| ConfigError::SourceError {
                source_name: SOURCE_NAME.to_string(),
                message: "Token exchange request failed".to_string(),
                source: Some(Box::new(e)),
            })?;
        Self::token_from(response)
    }

    fn token_from(response: reqwest::blocking::Response) -> Result<String> {
        let status = response.status();
        if !status.is_success() {
            return Err(ConfigError::source_error(
                SOURCE_NAME,
                format!("Token endpoint returned HTTP {}", status.as_u16()),
            ));
        }
        let token: TokenResponse = response.json().map_err(|e| ConfigError::ParseError {
            message: "Invalid token response".to_string(),
            source: Some(Box::new(e)),
        })?;
        Ok(token.access_token)
    }
}

impl CredentialProvider for GoogleCredentialProbe {
    fn discover_project(&self) -> Result<Option<String>> {
        let project = match self.locate()? {
            AmbientCredentials::File { contents, .. } => match contents {
                CredentialsFile::ServiceAccount { project_id, .. } => project_id,
                CredentialsFile::AuthorizedUser {
                    quota_project_id, ..
                } => quota_project_id,
                CredentialsFile::Unsupported => None,
            },
            AmbientCredentials::MetadataServer => {
                Some(self.metadata_get("project/project-id")?)
            }
        };
        Ok(project
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty()))
    }
}

impl TokenSource for GoogleCredentialProbe {
    fn access_token(&self) -> Result<String> {
        match self.locate()? {
            AmbientCredentials::File { contents, path } => match contents {
                CredentialsFile::AuthorizedUser {
                    client_id,
                    client_secret,
                    refresh_token,
                    ..
                } => self.refresh_user_token(&client_id, &client_secret, &refresh_token),
                CredentialsFile::ServiceAccount {
                    client_email,
                    private_key,
                    token_uri,
                    ..
                } => self.service_account_token(
                    &path,
                    client_email.as_deref(),
                    private_key.as_ref(),
                    token_uri.as_deref(),
                ),
                CredentialsFile::Unsupported => Err(ConfigError::source_error(
                    SOURCE_NAME,
                    format!("Unsupported credential type in {}", path.display()),
                )),
            },
            AmbientCredentials::MetadataServer => {
                let body = self.metadata_get("instance/service-accounts/default/token")?;
                let token: TokenResponse =
                    serde_json::from_str(&body).map_err(|e| ConfigError::ParseError {
                        message: "Invalid metadata token response".to_string(),
                        source: Some(Box::new(e)),
                    })?;
                Ok(token.access_token)
            }
        }
    }
}

/// A fixed access token, for callers that obtain tokens elsewhere.
#[derive(Clone)]
pub struct StaticToken(String);

impl StaticToken {
    /// Wraps `token`.
    pub fn new(token: impl Into<String>) -> Self {
        StaticToken(token.into())
    }
}

impl std::fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("StaticToken([REDACTED])")
    }
}

impl TokenSource for StaticToken {
    fn access_token(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}

/// gcloud keeps its configuration under `%APPDATA%\gcloud` on Windows and
/// `~/.config/gcloud` everywhere else.
fn default_gcloud_dir() -> Option<PathBuf> {
    let dirs = BaseDirs::new()?;
    if cfg!(windows) {
        Some(dirs.config_dir().join("gcloud"))
    } else {
        Some(dirs.home_dir().join(".config").join("gcloud"))
    }
}
