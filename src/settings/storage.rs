// SPDX-License-Identifier: MIT OR Apache-2.0

//! Static and media file storage.

use crate::domain::{keys, ConfigurationService, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Object ACL applied to uploaded files.
pub const PUBLIC_READ_ACL: &str = "publicRead";
/// URL prefix for static files.
pub const STATIC_URL: &str = "/static/";
/// URL prefix for user uploads.
pub const MEDIA_URL: &str = "/media/";

/// Where static and media files live.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum StorageBackend {
    /// A Cloud Storage bucket, used for both static and media files.
    GoogleCloudStorage {
        /// Bucket name
        bucket: String,
        /// ACL for new objects
        default_acl: String,
    },
    /// Local directories.
    FileSystem {
        /// Collected static files
        static_root: PathBuf,
        /// Uploaded media
        media_root: PathBuf,
    },
}

/// Storage settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StorageConfig {
    /// Backend
    pub backend: StorageBackend,
    /// Static URL prefix
    pub static_url: String,
    /// Media URL prefix
    pub media_url: String,
}

impl StorageConfig {
    /// Bucket-backed storage with public-read objects.
    pub fn bucket(name: impl Into<String>) -> Self {
        Self::with_backend(StorageBackend::GoogleCloudStorage {
            bucket: name.into(),
            default_acl: PUBLIC_READ_ACL.to_string(),
        })
    }

    /// Local storage under `<root>/data`.
    pub fn file_system(root: &Path) -> Self {
        let data = root.join("data");
        Self::with_backend(StorageBackend::FileSystem {
            static_root: data.join("static"),
            media_root: data.join("media"),
        })
    }

    /// Reads the storage settings from a configuration service.
    ///
    /// The literal `None` as a bucket name means no bucket.
    pub fn from_service<S>(service: &S, data_root: &Path) -> Result<Self>
    where
        S: ConfigurationService + ?Sized,
    {
        let bucket = service
            .get_optional(&keys::GS_BUCKET_NAME)?
            .map(|v| v.as_str().trim().to_string())
            .filter(|v| v != "None");

        Ok(match bucket {
            Some(bucket) => {
                tracing::debug!("Serving files from bucket {}", bucket);
                Self::bucket(bucket)
            }
            None => Self::file_system(data_root),
        })
    }

    /// Bucket name, if files live in a bucket.
    pub fn bucket_name(&self) -> Option<&str> {
        match &self.backend {
            StorageBackend::GoogleCloudStorage { bucket, .. } => Some(bucket),
            StorageBackend::FileSystem { .. } => None,
        }
    }

    /// Public base URL of the bucket.
    pub fn public_url(&self) -> Option<String> {
        self.bucket_name()
            .map(|bucket| format!("https://storage.googleapis.com/{}/", bucket))
    }

    fn with_backend(backend: StorageBackend) -> Self {
        Self {
            backend,
            static_url: STATIC_URL.to_string(),
            media_url: MEDIA_URL.to_string(),
        }
    }
}
