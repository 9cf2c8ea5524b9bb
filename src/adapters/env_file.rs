// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dotenv parsing and the local `.env` file source.

use crate::domain::{ConfigError, ConfigKey, ConfigValue, Result};
use crate::ports::source::lookup;
use crate::ports::{ConfigParser, ConfigSource, SELECTED_SOURCE_PRIORITY};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Maximum allowed size for `.env` files (1MB)
const MAX_ENV_FILE_SIZE: u64 = 1024 * 1024;

/// Parser for `KEY=value` payloads in dotenv syntax.
///
/// Comments, blank lines, `export` prefixes, and single or double quoted
/// values are handled by `dotenvy`. Later duplicates win.
///
/// Values are taken literally: `$NAME` and `${NAME}` are never expanded,
/// so secrets containing `$` survive unchanged.
///
/// # Examples
///
/// ```rust
/// use envsettings::adapters::DotenvParser;
/// use envsettings::ports::ConfigParser;
///
/// let values = DotenvParser::new()
///     .parse("# settings\nSECRET_KEY=abc\nDEBUG='false'\n")
///     .unwrap();
/// assert_eq!(values.get("SECRET_KEY"), Some(&"abc".to_string()));
/// assert_eq!(values.get("DEBUG"), Some(&"false".to_string()));
///
/// let values = DotenvParser::new().parse("SECRET_KEY=a$b${HOME}\n").unwrap();
/// assert_eq!(values.get("SECRET_KEY"), Some(&"a$b${HOME}".to_string()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct DotenvParser;

impl DotenvParser {
    /// Creates a new dotenv parser.
    pub fn new() -> Self {
        DotenvParser
    }
}

impl ConfigParser for DotenvParser {
    fn parse(&self, content: &str) -> Result<HashMap<String, String>> {
        let mut result = HashMap::new();
        let literal = escape_expansions(content);
        for item in dotenvy::from_read_iter(literal.as_bytes()) {
            let (key, value) = item.map_err(|e| ConfigError::ParseError {
                message: format!("Failed to parse dotenv payload: {}", e),
                source: Some(Box::new(e)),
            })?;
            result.insert(key, value);
        }
        Ok(result)
    }
}

/// Scanner state while escaping a dotenv payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scan {
    LineStart,
    Unquoted,
    AfterSpace,
    Escaped,
    Single,
    SingleEscaped,
    Double,
    DoubleEscaped,
    Comment,
}

/// Prefixes every `$` that dotenvy would expand with a backslash.
///
/// Quote and comment tracking mirrors dotenvy's line splitter, so `$` inside
/// single quotes or comments is left alone and existing escapes pass through.
fn escape_expansions(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut state = Scan::LineStart;

    for c in content.chars() {
        state = match state {
            Scan::LineStart => match c {
                ' ' | '\t' => Scan::LineStart,
                '#' => Scan::Comment,
                _ => unquoted(c, &mut out),
            },
            Scan::AfterSpace if c == '#' => Scan::Comment,
            Scan::Unquoted | Scan::AfterSpace => unquoted(c, &mut out),
            Scan::Escaped => {
                if c == '\n' {
                    Scan::LineStart
                } else {
                    Scan::Unquoted
                }
            }
            Scan::Single => match c {
                '\\' => Scan::SingleEscaped,
                '\'' => Scan::Unquoted,
                _ => Scan::Single,
            },
            Scan::SingleEscaped => Scan::Single,
            Scan::Double => match c {
                '\\' => Scan::DoubleEscaped,
                '"' => Scan::Unquoted,
                '$' => {
                    out.push('\\');
                    Scan::Double
                }
                _ => Scan::Double,
            },
            Scan::DoubleEscaped => Scan::Double,
            Scan::Comment => {
                if c == '\n' {
                    Scan::LineStart
                } else {
                    Scan::Comment
                }
            }
        };
        out.push(c);
    }

    out
}

fn unquoted(c: char, out: &mut String) -> Scan {
    match c {
        '\n' => Scan::LineStart,
        ' ' | '\t' => Scan::AfterSpace,
        '\\' => Scan::Escaped,
        '\'' => Scan::Single,
        '"' => Scan::Double,
        '$' => {
            out.push('\\');
            Scan::Unquoted
        }
        _ => Scan::Unquoted,
    }
}

/// Configuration source backed by a local `.env` file.
///
/// # Examples
///
/// ```rust,no_run
/// use envsettings::adapters::EnvFileAdapter;
/// use envsettings::ports::ConfigSource;
///
/// let adapter = EnvFileAdapter::from_file("/srv/app/.env").unwrap();
/// assert_eq!(adapter.name(), "env-file");
/// ```
#[derive(Debug, Clone)]
pub struct EnvFileAdapter {
    /// Path to the file, as given
    file_path: PathBuf,
    /// Parsed values
    values: HashMap<String, String>,
}

impl EnvFileAdapter {
    /// Reads and parses the file at `path`.
    ///
    /// # Errors
    ///
    /// Missing, oversized, unreadable, or malformed files are errors.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file_path = path.as_ref().to_path_buf();
        let values = DotenvParser::new().parse(&Self::read(&file_path)?)?;

        tracing::debug!(
            "Loaded {} values from {}",
            values.len(),
            Self::display_name(&file_path)
        );

        Ok(Self { file_path, values })
    }

    /// Returns the path of the backing file.
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Consumes the adapter and returns the parsed values.
    pub fn into_values(self) -> HashMap<String, String> {
        self.values
    }

    fn display_name(path: &Path) -> &str {
        path.file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("<unknown>")
    }

    fn read(path: &Path) -> Result<String> {
        let metadata = fs::metadata(path).map_err(|e| ConfigError::SourceError {
            source_name: "env-file".to_string(),
            message: format!(
                "Failed to read file metadata: {}",
                Self::display_name(path)
            ),
            source: Some(Box::new(e)),
        })?;

        if !metadata.is_file() {
            return Err(ConfigError::source_error(
                "env-file",
                format!("Not a regular file: {}", Self::display_name(path)),
            ));
        }

        if metadata.len() > MAX_ENV_FILE_SIZE {
            return Err(ConfigError::source_error(
                "env-file",
                format!(
                    "Configuration file too large: {} bytes (max {} bytes)",
                    metadata.len(),
                    MAX_ENV_FILE_SIZE
                ),
            ));
        }

        fs::read_to_string(path).map_err(|e| ConfigError::SourceError {
            source_name: "env-file".to_string(),
            message: format!(
                "Failed to read configuration file: {}",
                Self::display_name(path)
            ),
            source: Some(Box::new(e)),
        })
    }
}

impl ConfigSource for EnvFileAdapter {
    fn name(&self) -> &str {
        "env-file"
    }

    fn priority(&self) -> u8 {
        SELECTED_SOURCE_PRIORITY
    }

    fn get(&self, key: &ConfigKey) -> Result<Option<ConfigValue>> {
        Ok(lookup(&self.values, key))
    }
}
