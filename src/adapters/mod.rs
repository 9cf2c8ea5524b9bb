// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapters layer containing configuration source implementations.
//!
//! Each adapter implements one of the traits in the ports layer: raw sources
//! (`ConfigSource`), payload parsing (`ConfigParser`), and, behind the `gcp`
//! feature, the cloud credential and secret-manager ports.

pub mod env_file;
pub mod env_var;
#[cfg(feature = "gcp")]
pub mod gcp;
pub mod payload;

pub use env_file::{DotenvParser, EnvFileAdapter};
pub use env_var::EnvVarAdapter;
pub use payload::PayloadAdapter;
