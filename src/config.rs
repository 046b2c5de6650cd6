//! Configuration aggregation and typed access.
//!
//! [`Config`] owns the merged tree. Loaders are applied in caller order via
//! [`Config::use_loader`]; each successful load deep-merges first-writer-wins,
//! so the earliest source to claim a key keeps it. Typed accessors split the
//! dotted key on `":"`, walk the tree, and coerce the leaf.

use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::error::ConfigError;
use crate::tree;
use crate::value::{ConfigMap, ConfigValue};

/// A configuration source.
///
/// The aggregator only ever calls [`Loader::load`]; how the tree was produced
/// (process state, filesystem, memory) is the loader's business. Load
/// failures abort the whole aggregation.
pub trait Loader {
    /// Produce this source's normalized configuration tree.
    fn load(&self) -> anyhow::Result<ConfigMap>;
}

/// The merged configuration: one nested tree plus typed accessors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    map: ConfigMap,
}

impl Config {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self {
            map: ConfigMap::new(),
        }
    }

    /// Wrap an existing tree as a configuration.
    pub fn from_map(map: ConfigMap) -> Self {
        Self { map }
    }

    /// Borrow the underlying tree.
    pub fn as_map(&self) -> &ConfigMap {
        &self.map
    }

    /// Load a source and merge its tree into the aggregate.
    ///
    /// Returns `&mut Self` so loaders chain with `?`. A loader failure maps
    /// to [`ConfigError::SourceLoad`] and aborts aggregation; the tree keeps
    /// whatever was merged before the failing source.
    pub fn use_loader(&mut self, loader: &dyn Loader) -> Result<&mut Self, ConfigError> {
        let loaded = loader.load().map_err(ConfigError::SourceLoad)?;
        debug!(keys = loaded.len(), "merging configuration source");
        tree::merge(&mut self.map, loaded);
        Ok(self)
    }

    /// Get the raw value at a dotted key.
    pub fn get(&self, key: &str) -> Result<&ConfigValue, ConfigError> {
        tree::get(&self.map, &tree::split_key(key))
    }

    /// Get a string value.
    pub fn get_string(&self, key: &str) -> Result<String, ConfigError> {
        self.get(key)?.as_str().map(str::to_owned)
    }

    /// Get an integer value. Integral floats narrow; anything else fails.
    pub fn get_integer(&self, key: &str) -> Result<i64, ConfigError> {
        self.get(key)?.as_integer()
    }

    /// Get a float value.
    pub fn get_float(&self, key: &str) -> Result<f64, ConfigError> {
        self.get(key)?.as_float()
    }

    /// Get a boolean value.
    pub fn get_boolean(&self, key: &str) -> Result<bool, ConfigError> {
        self.get(key)?.as_boolean()
    }

    /// Get a duration value.
    pub fn get_duration(&self, key: &str) -> Result<Duration, ConfigError> {
        self.get(key)?.as_duration()
    }

    /// Get a nested map value.
    pub fn get_map(&self, key: &str) -> Result<ConfigMap, ConfigError> {
        self.get(key)?.as_map().map(Clone::clone)
    }

    /// Get a nested map as a standalone configuration view.
    ///
    /// The view clones the subtree and shares no further merge history with
    /// its parent.
    pub fn sub_config(&self, key: &str) -> Result<Config, ConfigError> {
        Ok(Config::from_map(self.get_map(key)?))
    }

    /// Get a list value as-is.
    pub fn get_slice(&self, key: &str) -> Result<Vec<ConfigValue>, ConfigError> {
        self.get(key)?.as_list().map(<[ConfigValue]>::to_vec)
    }

    /// Get a list of strings. Every element must be a string.
    pub fn get_string_slice(&self, key: &str) -> Result<Vec<String>, ConfigError> {
        self.get(key)?
            .as_list()?
            .iter()
            .map(|item| item.as_str().map(str::to_owned))
            .collect()
    }

    /// Get a list of integers. Integral float elements narrow; a single
    /// truncating element fails the whole slice.
    pub fn get_integer_slice(&self, key: &str) -> Result<Vec<i64>, ConfigError> {
        self.get(key)?
            .as_list()?
            .iter()
            .map(ConfigValue::as_integer)
            .collect()
    }

    /// Get a list of floats. Every element must be a float.
    pub fn get_float_slice(&self, key: &str) -> Result<Vec<f64>, ConfigError> {
        self.get(key)?
            .as_list()?
            .iter()
            .map(ConfigValue::as_float)
            .collect()
    }

    /// Get a list of booleans. Every element must be a boolean.
    pub fn get_boolean_slice(&self, key: &str) -> Result<Vec<bool>, ConfigError> {
        self.get(key)?
            .as_list()?
            .iter()
            .map(ConfigValue::as_boolean)
            .collect()
    }

    /// Set a value at a dotted key. Strictly additive: existing keys are
    /// never overwritten ([`ConfigError::AlreadyPresent`]).
    pub fn set(&mut self, key: &str, value: impl Into<ConfigValue>) -> Result<(), ConfigError> {
        tree::set(&mut self.map, &tree::split_key(key), value.into())
    }

    /// Bind the loaded tree onto a typed structure through serde.
    pub fn to_struct<T: DeserializeOwned>(&self) -> Result<T, ConfigError> {
        let value = serde_json::to_value(&self.map)?;
        Ok(serde_json::from_value(value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::MapLoader;
    use serde::Deserialize;

    struct FailingLoader;

    impl Loader for FailingLoader {
        fn load(&self) -> anyhow::Result<ConfigMap> {
            anyhow::bail!("loader exploded")
        }
    }

    fn sample_map() -> ConfigMap {
        let mut inner = ConfigMap::new();
        inner.insert("host".to_string(), ConfigValue::String("db.local".into()));
        inner.insert("port".to_string(), ConfigValue::Float(5432.0));

        let mut map = ConfigMap::new();
        map.insert("database".to_string(), ConfigValue::Map(inner));
        map.insert("debug".to_string(), ConfigValue::Boolean(true));
        map.insert("ratio".to_string(), ConfigValue::Float(0.5));
        map.insert(
            "timeout".to_string(),
            ConfigValue::Duration(Duration::from_secs(30)),
        );
        map.insert(
            "tags".to_string(),
            ConfigValue::List(vec![
                ConfigValue::String("a".into()),
                ConfigValue::String("b".into()),
            ]),
        );
        map
    }

    #[test]
    fn test_use_loader_merges() {
        let mut config = Config::new();
        config.use_loader(&MapLoader::new(sample_map())).unwrap();
        assert_eq!(config.get_string("database:host").unwrap(), "db.local");
    }

    #[test]
    fn test_first_loaded_source_wins() {
        let mut first = ConfigMap::new();
        first.insert("key".to_string(), ConfigValue::Integer(1));
        let mut second = ConfigMap::new();
        second.insert("key".to_string(), ConfigValue::Integer(2));

        let mut config = Config::new();
        config
            .use_loader(&MapLoader::new(first))
            .unwrap()
            .use_loader(&MapLoader::new(second))
            .unwrap();

        assert_eq!(config.get_integer("key").unwrap(), 1);
    }

    #[test]
    fn test_failing_loader_aborts_and_preserves_state() {
        let mut config = Config::new();
        config.use_loader(&MapLoader::new(sample_map())).unwrap();

        let err = config.use_loader(&FailingLoader).unwrap_err();
        assert!(matches!(err, ConfigError::SourceLoad(_)));
        assert!(config.get_boolean("debug").unwrap());
    }

    #[test]
    fn test_typed_accessors() {
        let mut config = Config::new();
        config.use_loader(&MapLoader::new(sample_map())).unwrap();

        assert_eq!(config.get_integer("database:port").unwrap(), 5432);
        assert_eq!(config.get_float("ratio").unwrap(), 0.5);
        assert!(config.get_boolean("debug").unwrap());
        assert_eq!(
            config.get_duration("timeout").unwrap(),
            Duration::from_secs(30)
        );
        assert_eq!(
            config.get_string_slice("tags").unwrap(),
            vec!["a".to_string(), "b".to_string()]
        );
    }

    #[test]
    fn test_integer_slice_narrowing_fails_whole_slice() {
        let mut map = ConfigMap::new();
        map.insert(
            "values".to_string(),
            ConfigValue::List(vec![ConfigValue::Float(1.0), ConfigValue::Float(2.5)]),
        );
        let mut config = Config::new();
        config.use_loader(&MapLoader::new(map)).unwrap();

        assert!(matches!(
            config.get_integer_slice("values").unwrap_err(),
            ConfigError::CoercionFailed { .. }
        ));
    }

    #[test]
    fn test_integer_slice_narrows_integral_floats() {
        let mut map = ConfigMap::new();
        map.insert(
            "values".to_string(),
            ConfigValue::List(vec![ConfigValue::Float(1.0), ConfigValue::Float(2.0)]),
        );
        let mut config = Config::new();
        config.use_loader(&MapLoader::new(map)).unwrap();

        assert_eq!(config.get_integer_slice("values").unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_sub_config_is_a_detached_view() {
        let mut config = Config::new();
        config.use_loader(&MapLoader::new(sample_map())).unwrap();

        let database = config.sub_config("database").unwrap();
        assert_eq!(database.get_string("host").unwrap(), "db.local");
        assert!(database.get("debug").is_err());
    }

    #[test]
    fn test_set_and_get_roundtrip() {
        let mut config = Config::new();
        config.set("server:workers", 4i64).unwrap();
        assert_eq!(config.get_integer("server:workers").unwrap(), 4);
    }

    #[test]
    fn test_set_never_overwrites() {
        let mut config = Config::new();
        config.set("key", "original").unwrap();
        let err = config.set("key", "replacement").unwrap_err();
        assert!(matches!(err, ConfigError::AlreadyPresent(_)));
        assert_eq!(config.get_string("key").unwrap(), "original");
    }

    #[test]
    fn test_get_missing_key() {
        let config = Config::new();
        assert!(matches!(
            config.get("missing").unwrap_err(),
            ConfigError::KeyNotFound(_)
        ));
    }

    #[test]
    fn test_to_struct_binds_nested_maps() {
        #[derive(Deserialize)]
        struct Database {
            host: String,
            // JSON-sourced numbers are floats all the way through binding.
            port: f64,
        }

        #[derive(Deserialize)]
        struct Settings {
            database: Database,
            debug: bool,
        }

        let mut config = Config::new();
        config.use_loader(&MapLoader::new(sample_map())).unwrap();

        let settings: Settings = config.to_struct().unwrap();
        assert_eq!(settings.database.host, "db.local");
        assert_eq!(settings.database.port, 5432.0);
        assert!(settings.debug);
    }
}
