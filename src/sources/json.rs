//! JSON file source.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use crate::config::Loader;
use crate::value::{ConfigMap, coerce_durations, json_object_to_map};

/// Loads configuration from a JSON file.
///
/// The document root must be an object. Numbers arrive as floats (JSON has a
/// single numeric type); integer reads narrow at access time. With
/// `parse_durations` enabled, string leaves matching the duration grammar are
/// converted after parsing.
#[derive(Debug, Clone)]
pub struct JsonFileLoader {
    path: PathBuf,
    parse_durations: bool,
}

impl JsonFileLoader {
    /// Create a JSON file loader for the given path.
    pub fn new(path: impl Into<PathBuf>, parse_durations: bool) -> Self {
        Self {
            path: path.into(),
            parse_durations,
        }
    }

    fn parse(&self, content: &str) -> Result<ConfigMap> {
        let object: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(content).context("Failed to parse JSON configuration")?;

        let mut map = json_object_to_map(object);
        if self.parse_durations {
            coerce_durations(&mut map);
        }
        Ok(map)
    }
}

impl Loader for JsonFileLoader {
    fn load(&self) -> Result<ConfigMap> {
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        self.parse(&content)
    }
}
