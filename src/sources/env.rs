//! Environment variable source.

use super::split_segments;
use crate::config::Loader;
use crate::error::ConfigError;
use crate::tree;
use crate::value::{ConfigMap, parse_raw};

/// Loads configuration from `KEY=VALUE` environment entries.
///
/// The prefix match is always case-sensitive and evaluated against the raw
/// key, before any lower-casing. After the prefix is stripped, one leading
/// separator occurrence is also stripped so the path does not start with an
/// empty segment.
#[derive(Debug, Clone)]
pub struct EnvironmentLoader {
    lower_case: bool,
    prefix: String,
    separator: String,
}

impl EnvironmentLoader {
    /// Create an environment loader. `lower_case` lower-cases keys after the
    /// prefix has been matched and stripped; an empty prefix matches every
    /// entry; an empty separator keeps keys flat.
    pub fn new(lower_case: bool, separator: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            lower_case,
            prefix: prefix.into(),
            separator: separator.into(),
        }
    }

    /// Parse `(key, value)` pairs into a configuration tree. Values keep any
    /// embedded `=` characters; the process environment already splits on the
    /// first one.
    ///
    /// # Errors
    ///
    /// Two entries writing the same nested path within this one set of pairs
    /// surface the engine's `set` error.
    pub fn parse<I>(&self, vars: I) -> Result<ConfigMap, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut map = ConfigMap::new();

        for (key, value) in vars {
            let Some(trimmed) = key.strip_prefix(self.prefix.as_str()) else {
                continue;
            };

            // A separator sitting right after the prefix would otherwise
            // produce an empty leading segment.
            let trimmed = trimmed
                .strip_prefix(self.separator.as_str())
                .unwrap_or(trimmed);
            if trimmed.is_empty() {
                continue;
            }

            let normalized = if self.lower_case {
                trimmed.to_lowercase()
            } else {
                trimmed.to_string()
            };

            let segments = split_segments(&normalized, &self.separator);
            tree::set(&mut map, &segments, parse_raw(&value))?;
        }

        Ok(map)
    }
}

impl Loader for EnvironmentLoader {
    fn load(&self) -> anyhow::Result<ConfigMap> {
        Ok(self.parse(std::env::vars())?)
    }
}
