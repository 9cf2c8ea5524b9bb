// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration parser trait definition.
//!
//! Local `.env` files, the CI placeholder, and secret-manager payloads all
//! arrive as text. A `ConfigParser` turns that text into a flat key/value map.

use crate::domain::Result;
use std::collections::HashMap;

/// A trait for parsing configuration payloads into flat key/value maps.
///
/// # Examples
///
/// ```rust
/// use envsettings::ports::ConfigParser;
/// use envsettings::domain::Result;
/// use std::collections::HashMap;
///
/// struct ColonParser;
///
/// impl ConfigParser for ColonParser {
///     fn parse(&self, content: &str) -> Result<HashMap<String, String>> {
///         Ok(content
///             .lines()
///             .filter_map(|l| l.split_once(':'))
///             .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
///             .collect())
///     }
/// }
///
/// let map = ColonParser.parse("DEBUG: false").unwrap();
/// assert_eq!(map.get("DEBUG"), Some(&"false".to_string()));
/// ```
pub trait ConfigParser {
    /// Parses `content` into a flat key/value map.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` when the content is malformed.
    fn parse(&self, content: &str) -> Result<HashMap<String, String>>;
}
