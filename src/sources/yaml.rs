//! YAML file source.

use anyhow::{Context, Result, bail};
use std::fs;
use std::path::PathBuf;

use crate::config::Loader;
use crate::value::{ConfigMap, ConfigValue, coerce_durations};

/// Loads configuration from a YAML file.
///
/// The document root must be a mapping with string keys. Unlike JSON, YAML
/// distinguishes integers from floats and both are preserved. With
/// `parse_durations` enabled, string leaves matching the duration grammar are
/// converted after parsing.
#[derive(Debug, Clone)]
pub struct YamlFileLoader {
    path: PathBuf,
    parse_durations: bool,
}

impl YamlFileLoader {
    /// Create a YAML file loader for the given path.
    pub fn new(path: impl Into<PathBuf>, parse_durations: bool) -> Self {
        Self {
            path: path.into(),
            parse_durations,
        }
    }

    fn parse(&self, content: &str) -> Result<ConfigMap> {
        let root: serde_yaml::Value =
            serde_yaml::from_str(content).context("Failed to parse YAML configuration")?;

        let serde_yaml::Value::Mapping(mapping) = root else {
            bail!("YAML configuration root must be a mapping");
        };

        let mut map = yaml_mapping_to_map(mapping)?;
        if self.parse_durations {
            coerce_durations(&mut map);
        }
        Ok(map)
    }
}

impl Loader for YamlFileLoader {
    fn load(&self) -> Result<ConfigMap> {
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        self.parse(&content)
    }
}

fn yaml_mapping_to_map(mapping: serde_yaml::Mapping) -> Result<ConfigMap> {
    let mut map = ConfigMap::new();
    for (key, value) in mapping {
        let serde_yaml::Value::String(key) = key else {
            bail!("YAML mapping keys must be strings");
        };
        map.insert(key, yaml_value_to_config(value)?);
    }
    Ok(map)
}

fn yaml_value_to_config(value: serde_yaml::Value) -> Result<ConfigValue> {
    Ok(match value {
        serde_yaml::Value::Null => ConfigValue::Null,
        serde_yaml::Value::Bool(value) => ConfigValue::Boolean(value),
        serde_yaml::Value::Number(number) => match number.as_i64() {
            Some(value) => ConfigValue::Integer(value),
            None => ConfigValue::Float(number.as_f64().unwrap_or_default()),
        },
        serde_yaml::Value::String(value) => ConfigValue::String(value),
        serde_yaml::Value::Sequence(items) => ConfigValue::List(
            items
                .into_iter()
                .map(yaml_value_to_config)
                .collect::<Result<Vec<_>>>()?,
        ),
        serde_yaml::Value::Mapping(mapping) => ConfigValue::Map(yaml_mapping_to_map(mapping)?),
        serde_yaml::Value::Tagged(tagged) => yaml_value_to_config(tagged.value)?,
    })
}
