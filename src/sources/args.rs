//! Command-line argument source.

use tracing::trace;

use super::split_segments;
use crate::config::Loader;
use crate::error::ConfigError;
use crate::tree;
use crate::value::{ConfigMap, parse_raw};

/// Loads configuration from `--key=value` style process arguments.
///
/// Tokens are filtered, not validated: anything without a leading dash or
/// without exactly one `=` is skipped silently, as are keys that do not carry
/// the configured prefix. Matching keys have the prefix stripped and are
/// split on the separator into a nested path.
#[derive(Debug, Clone)]
pub struct ArgumentLoader {
    prefix: String,
    separator: String,
}

impl ArgumentLoader {
    /// Create an argument loader with the given key separator and prefix.
    /// An empty prefix matches every argument; an empty separator keeps keys
    /// flat.
    pub fn new(separator: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            separator: separator.into(),
        }
    }

    /// Parse a raw argument vector into a configuration tree.
    ///
    /// # Errors
    ///
    /// Two arguments writing the same nested path within this one vector
    /// surface the engine's `set` error; the spec treats intra-source
    /// duplicates as fatal while cross-source overlap merges silently.
    pub fn parse<I, S>(&self, args: I) -> Result<ConfigMap, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map = ConfigMap::new();

        for arg in args {
            let arg = arg.as_ref();
            if !arg.starts_with('-') {
                continue;
            }

            // Exactly one '=': no partial parsing of malformed tokens.
            let parts: Vec<&str> = arg.split('=').collect();
            if parts.len() != 2 {
                trace!(token = arg, "skipping malformed argument");
                continue;
            }

            let key = parts[0].trim_start_matches('-');
            let Some(key) = key.strip_prefix(self.prefix.as_str()) else {
                continue;
            };

            let segments = split_segments(key, &self.separator);
            tree::set(&mut map, &segments, parse_raw(parts[1]))?;
        }

        Ok(map)
    }
}

impl Loader for ArgumentLoader {
    fn load(&self) -> anyhow::Result<ConfigMap> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        Ok(self.parse(args)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ConfigValue;

    #[test]
    fn test_parses_separated_key_into_nested_path() {
        let loader = ArgumentLoader::new("__", "");
        let map = loader.parse(["--map__string=testing"]).unwrap();
        assert_eq!(
            tree::get(&map, &["map", "string"]).unwrap(),
            &ConfigValue::String("testing".to_string())
        );
    }

    #[test]
    fn test_duplicate_path_within_one_load_errors() {
        let loader = ArgumentLoader::new("__", "");
        let err = loader
            .parse(["--test=testing", "--test__stuff=things"])
            .unwrap_err();
        assert!(matches!(err, ConfigError::NotAMap(key) if key == "test"));
    }

    #[test]
    fn test_duplicate_terminal_key_errors() {
        let loader = ArgumentLoader::new("__", "");
        let err = loader.parse(["--a=1", "--a=2"]).unwrap_err();
        assert!(matches!(err, ConfigError::AlreadyPresent(key) if key == "a"));
    }

    #[test]
    fn test_skips_tokens_without_leading_dash() {
        let loader = ArgumentLoader::new("__", "");
        let map = loader.parse(["plain", "--kept=1"]).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("kept"), Some(&ConfigValue::Integer(1)));
    }

    #[test]
    fn test_skips_tokens_without_exactly_one_equals() {
        let loader = ArgumentLoader::new("__", "");
        let map = loader.parse(["--flag", "--a=b=c", "--kept=1"]).unwrap();
        assert_eq!(map.len(), 1);
        assert!(map.contains_key("kept"));
    }

    #[test]
    fn test_prefix_filters_and_strips() {
        let loader = ArgumentLoader::new("__", "app-");
        let map = loader
            .parse(["--app-port=8080", "--other-port=9090"])
            .unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("port"), Some(&ConfigValue::Integer(8080)));
    }

    #[test]
    fn test_empty_separator_keeps_key_flat() {
        let loader = ArgumentLoader::new("", "");
        let map = loader.parse(["--a__b=1"]).unwrap();
        assert_eq!(map.get("a__b"), Some(&ConfigValue::Integer(1)));
    }

    #[test]
    fn test_values_are_parsed_into_types() {
        let loader = ArgumentLoader::new("__", "");
        let map = loader
            .parse(["--count=10", "--ratio=0.5", "--on=true", "--wait=3s"])
            .unwrap();
        assert_eq!(map.get("count"), Some(&ConfigValue::Integer(10)));
        assert_eq!(map.get("ratio"), Some(&ConfigValue::Float(0.5)));
        assert_eq!(map.get("on"), Some(&ConfigValue::Boolean(true)));
        assert_eq!(
            map.get("wait"),
            Some(&ConfigValue::Duration(std::time::Duration::from_secs(3)))
        );
    }
}
