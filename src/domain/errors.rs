// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for settings resolution.
//!
//! Everything that can go wrong while picking a configuration source, reading
//! it, or coercing its raw strings into typed settings is reported through
//! [`ConfigError`].

use std::str::ParseBoolError;
use thiserror::Error;

/// The main error type for settings resolution.
///
/// # Examples
///
/// ```
/// use envsettings::domain::errors::ConfigError;
///
/// let error = ConfigError::ConfigKeyNotFound {
///     key: "SECRET_KEY".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration key not found: SECRET_KEY");
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// No configuration source could be selected.
    #[error("No configuration source found: {message}")]
    ConfigurationNotFound {
        /// What was probed
        message: String,
    },

    /// The requested configuration key was not found in any source.
    #[error("Configuration key not found: {key}")]
    ConfigKeyNotFound {
        /// The key that was not found
        key: String,
    },

    /// Failed to convert a configuration value to the requested type.
    #[error(
        "Failed to convert configuration value for key '{key}' to type {target_type}: {source}"
    )]
    TypeConversionError {
        /// The key being converted
        key: String,
        /// The target type name
        target_type: String,
        /// The underlying conversion error
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A database connection URL could not be interpreted.
    #[error("Invalid database URL: {message}")]
    InvalidDatabaseUrl {
        /// What was wrong with the URL
        message: String,
    },

    /// A secret version resource name could not be built.
    #[error("Invalid secret name: {message}")]
    InvalidSecretName {
        /// What was wrong with the name
        message: String,
    },

    /// An error occurred in a configuration source.
    #[error("Configuration source '{source_name}' error: {message}")]
    SourceError {
        /// The name of the source that encountered the error
        source_name: String,
        /// The error message
        message: String,
        /// The underlying error, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Failed to parse a configuration payload.
    #[error("Failed to parse configuration: {message}")]
    ParseError {
        /// The error message
        message: String,
        /// The underlying parsing error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An I/O error occurred while reading configuration.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ConfigError {
    /// Creates a TypeConversionError from a ParseBoolError.
    pub fn from_parse_bool_error(key: String, err: ParseBoolError) -> Self {
        ConfigError::TypeConversionError {
            key,
            target_type: "boolean".to_string(),
            source: Box::new(err),
        }
    }

    /// Creates a TypeConversionError from a URL parse failure.
    pub fn from_url_error(key: String, err: url::ParseError) -> Self {
        ConfigError::TypeConversionError {
            key,
            target_type: "url".to_string(),
            source: Box::new(err),
        }
    }

    /// Creates a SourceError without an underlying cause.
    pub fn source_error(source_name: &str, message: impl Into<String>) -> Self {
        ConfigError::SourceError {
            source_name: source_name.to_string(),
            message: message.into(),
            source: None,
        }
    }
}

/// A specialized Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_not_found_error() {
        let error = ConfigError::ConfigurationNotFound {
            message: "no .env".to_string(),
        };
        assert_eq!(error.to_string(), "No configuration source found: no .env");
    }

    #[test]
    fn test_type_conversion_error() {
        let source_error = "maybe".parse::<bool>().unwrap_err();
        let error = ConfigError::from_parse_bool_error("DEBUG".to_string(), source_error);
        assert!(error.to_string().contains("DEBUG"));
        assert!(error.to_string().contains("boolean"));
    }

    #[test]
    fn test_url_conversion_error() {
        let parse_err = url::Url::parse("not a url").unwrap_err();
        let error = ConfigError::from_url_error("CLOUDRUN_SERVICE_URL".to_string(), parse_err);
        assert!(matches!(error, ConfigError::TypeConversionError { .. }));
        assert!(error.to_string().contains("url"));
    }

    #[test]
    fn test_source_error() {
        let error = ConfigError::source_error("secret-manager", "HTTP 403");
        assert_eq!(
            error.to_string(),
            "Configuration source 'secret-manager' error: HTTP 403"
        );
    }

    #[test]
    fn test_invalid_database_url() {
        let error = ConfigError::InvalidDatabaseUrl {
            message: "unsupported scheme 'redis'".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid database URL: unsupported scheme 'redis'"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error = ConfigError::from(io_error);
        assert!(matches!(error, ConfigError::IoError(_)));
    }
}
