// SPDX-License-Identifier: MIT OR Apache-2.0

//! Google Cloud adapters: ambient credential discovery and Secret Manager.

pub mod credentials;
pub mod secret_manager;

pub use credentials::{
    AmbientCredentials, CredentialsFile, GoogleCredentialProbe, PrivateKey, StaticToken,
};
pub use secret_manager::SecretManagerRestClient;
