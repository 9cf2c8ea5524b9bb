// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ports layer containing trait definitions.
//!
//! These traits are the seams between settings resolution and the outside
//! world. Adapters implement them.

pub mod cloud;
pub mod parser;
pub mod source;

// Re-export commonly used types
pub use cloud::{CredentialProvider, SecretManagerClient, TokenSource};
pub use parser::ConfigParser;
pub use source::{ConfigSource, ENVIRONMENT_PRIORITY, SELECTED_SOURCE_PRIORITY};
