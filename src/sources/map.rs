//! In-memory map source.

use crate::config::Loader;
use crate::value::ConfigMap;

/// Loads configuration from an in-memory map, verbatim.
///
/// Useful for programmatic defaults: apply a `MapLoader` last and every key
/// the earlier sources did not claim falls through to it.
#[derive(Debug, Clone)]
pub struct MapLoader {
    values: ConfigMap,
}

impl MapLoader {
    /// Wrap an already-nested map as a source.
    pub fn new(values: ConfigMap) -> Self {
        Self { values }
    }
}

impl Loader for MapLoader {
    fn load(&self) -> anyhow::Result<ConfigMap> {
        Ok(self.values.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ConfigValue;

    #[test]
    fn test_returns_the_map_unchanged() {
        let mut values = ConfigMap::new();
        values.insert("key".to_string(), ConfigValue::Integer(1));

        let loader = MapLoader::new(values.clone());
        assert_eq!(loader.load().unwrap(), values);
    }
}
