//! Configuration values and scalar coercion.
//!
//! [`ConfigValue`] is the tagged union stored at every leaf and subtree of a
//! configuration tree. Raw strings coming from arguments and environment
//! variables are interpreted by [`parse_raw`]; typed reads go through the
//! exhaustive-match coercion methods, which never guess across types beyond
//! the single documented exception (integral floats narrowing to integers,
//! the shape JSON numbers arrive in).

use std::collections::BTreeMap;
use std::time::Duration;

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::error::ConfigError;

/// A nested configuration tree node: string keys mapped to values.
pub type ConfigMap = BTreeMap<String, ConfigValue>;

/// One typed value stored at a leaf or subtree of a configuration tree.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    /// An explicit null (JSON `null`, empty YAML value).
    Null,
    /// A boolean.
    Boolean(bool),
    /// A signed integer.
    Integer(i64),
    /// A floating-point number. JSON has a single numeric type, so every
    /// number read from a JSON source lands here.
    Float(f64),
    /// A plain string.
    String(String),
    /// A span of time parsed from a literal like `300ms` or `2h45m`.
    Duration(Duration),
    /// A list of values. Lists are opaque to the tree engine; only the slice
    /// accessors look inside, element by element.
    List(Vec<ConfigValue>),
    /// A nested tree.
    Map(ConfigMap),
}

impl ConfigValue {
    /// Human-readable name of the stored variant, used in coercion errors.
    pub fn kind(&self) -> &'static str {
        match self {
            ConfigValue::Null => "null",
            ConfigValue::Boolean(_) => "boolean",
            ConfigValue::Integer(_) => "integer",
            ConfigValue::Float(_) => "float",
            ConfigValue::String(_) => "string",
            ConfigValue::Duration(_) => "duration",
            ConfigValue::List(_) => "list",
            ConfigValue::Map(_) => "map",
        }
    }

    fn mismatch(&self, want: &'static str) -> ConfigError {
        ConfigError::CoercionFailed {
            want,
            found: self.kind(),
        }
    }

    /// Borrow the value as a string.
    pub fn as_str(&self) -> Result<&str, ConfigError> {
        match self {
            ConfigValue::String(value) => Ok(value),
            _ => Err(self.mismatch("string")),
        }
    }

    /// Coerce the value to an integer.
    ///
    /// A `Float` is accepted only when it has no fractional component; the
    /// round-trip check rejects anything that would truncate.
    pub fn as_integer(&self) -> Result<i64, ConfigError> {
        match self {
            ConfigValue::Integer(value) => Ok(*value),
            ConfigValue::Float(value) => {
                let truncated = *value as i64;
                if truncated as f64 == *value {
                    Ok(truncated)
                } else {
                    Err(self.mismatch("integer"))
                }
            }
            _ => Err(self.mismatch("integer")),
        }
    }

    /// Coerce the value to a float. Exact match only.
    pub fn as_float(&self) -> Result<f64, ConfigError> {
        match self {
            ConfigValue::Float(value) => Ok(*value),
            _ => Err(self.mismatch("float")),
        }
    }

    /// Coerce the value to a boolean. Strings are never interpreted here.
    pub fn as_boolean(&self) -> Result<bool, ConfigError> {
        match self {
            ConfigValue::Boolean(value) => Ok(*value),
            _ => Err(self.mismatch("boolean")),
        }
    }

    /// Coerce the value to a duration. Strings are never re-parsed here;
    /// duration detection happens at load time.
    pub fn as_duration(&self) -> Result<Duration, ConfigError> {
        match self {
            ConfigValue::Duration(value) => Ok(*value),
            _ => Err(self.mismatch("duration")),
        }
    }

    /// Borrow the value as a list.
    pub fn as_list(&self) -> Result<&[ConfigValue], ConfigError> {
        match self {
            ConfigValue::List(items) => Ok(items),
            _ => Err(self.mismatch("list")),
        }
    }

    /// Borrow the value as a nested map.
    pub fn as_map(&self) -> Result<&ConfigMap, ConfigError> {
        match self {
            ConfigValue::Map(map) => Ok(map),
            _ => Err(self.mismatch("map")),
        }
    }
}

/// Interpret a raw source string as the most specific matching value.
///
/// The attempts run in a fixed order: base-10 integer, float, boolean
/// literal, JSON object, JSON array, duration literal. A string matching
/// none of these is returned unchanged.
pub fn parse_raw(raw: &str) -> ConfigValue {
    if let Ok(value) = raw.parse::<i64>() {
        return ConfigValue::Integer(value);
    }
    if let Ok(value) = raw.parse::<f64>() {
        return ConfigValue::Float(value);
    }
    if let Some(value) = parse_bool_literal(raw) {
        return ConfigValue::Boolean(value);
    }
    if let Ok(object) = serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(raw) {
        return ConfigValue::Map(json_object_to_map(object));
    }
    if let Ok(items) = serde_json::from_str::<Vec<serde_json::Value>>(raw) {
        return ConfigValue::List(items.into_iter().map(ConfigValue::from).collect());
    }
    parse_duration_literal(raw)
}

/// Interpret a string as a duration literal, returning the original string
/// when it does not match the grammar.
pub fn parse_duration_literal(raw: &str) -> ConfigValue {
    match humantime::parse_duration(raw) {
        Ok(duration) => ConfigValue::Duration(duration),
        Err(_) => ConfigValue::String(raw.to_string()),
    }
}

// The boolean literal family accepted by the argument and environment
// sources. "1"/"0" are unreachable in practice since integers parse first.
fn parse_bool_literal(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

/// Replace every string leaf matching the duration grammar with a
/// [`ConfigValue::Duration`], recursing into nested maps.
///
/// File formats keep native booleans and numbers, so this post-parse pass
/// only ever looks at strings. Non-matching strings and all other variants
/// are left untouched; lists are not descended into.
pub fn coerce_durations(map: &mut ConfigMap) {
    for value in map.values_mut() {
        match value {
            ConfigValue::String(raw) => {
                if let Ok(duration) = humantime::parse_duration(raw) {
                    *value = ConfigValue::Duration(duration);
                }
            }
            ConfigValue::Map(inner) => coerce_durations(inner),
            _ => {}
        }
    }
}

/// Convert a parsed JSON object into a configuration tree.
pub(crate) fn json_object_to_map(object: serde_json::Map<String, serde_json::Value>) -> ConfigMap {
    object
        .into_iter()
        .map(|(key, value)| (key, ConfigValue::from(value)))
        .collect()
}

impl From<serde_json::Value> for ConfigValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => ConfigValue::Null,
            serde_json::Value::Bool(value) => ConfigValue::Boolean(value),
            // JSON numbers arrive as floats; integer reads narrow later.
            serde_json::Value::Number(number) => {
                ConfigValue::Float(number.as_f64().unwrap_or_default())
            }
            serde_json::Value::String(value) => ConfigValue::String(value),
            serde_json::Value::Array(items) => {
                ConfigValue::List(items.into_iter().map(ConfigValue::from).collect())
            }
            serde_json::Value::Object(object) => ConfigValue::Map(json_object_to_map(object)),
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::String(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::String(value)
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        ConfigValue::Integer(value)
    }
}

impl From<f64> for ConfigValue {
    fn from(value: f64) -> Self {
        ConfigValue::Float(value)
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Boolean(value)
    }
}

impl From<Duration> for ConfigValue {
    fn from(value: Duration) -> Self {
        ConfigValue::Duration(value)
    }
}

impl From<Vec<ConfigValue>> for ConfigValue {
    fn from(items: Vec<ConfigValue>) -> Self {
        ConfigValue::List(items)
    }
}

impl From<ConfigMap> for ConfigValue {
    fn from(map: ConfigMap) -> Self {
        ConfigValue::Map(map)
    }
}

impl Serialize for ConfigValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ConfigValue::Null => serializer.serialize_unit(),
            ConfigValue::Boolean(value) => serializer.serialize_bool(*value),
            ConfigValue::Integer(value) => serializer.serialize_i64(*value),
            ConfigValue::Float(value) => serializer.serialize_f64(*value),
            ConfigValue::String(value) => serializer.serialize_str(value),
            // Durations bind as whole nanoseconds.
            ConfigValue::Duration(value) => {
                serializer.serialize_u64(u64::try_from(value.as_nanos()).unwrap_or(u64::MAX))
            }
            ConfigValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            ConfigValue::Map(map) => {
                let mut entries = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map {
                    entries.serialize_entry(key, value)?;
                }
                entries.end()
            }
        }
    }
}
