//! Recursive key-path engine over nested configuration maps.
//!
//! Three operations define the tree semantics:
//!
//! - [`get`] walks a path and fails loudly on absent segments or attempts to
//!   descend through a scalar.
//! - [`set`] is strictly additive: it builds intermediate maps on demand but
//!   never overwrites an existing value.
//! - [`merge`] folds a later source into the aggregate first-writer-wins,
//!   silently: nested maps merge recursively, any other collision leaves the
//!   destination untouched.
//!
//! The `set`/`merge` asymmetry is deliberate. Duplicate keys inside a single
//! source are programming errors and surface as [`ConfigError::AlreadyPresent`];
//! overlap across sources is the whole point of layering and resolves by
//! precedence.

use crate::error::ConfigError;
use crate::value::{ConfigMap, ConfigValue};

/// Split a dotted external key (`"database:pool:size"`) into path segments.
///
/// The public accessors always use `":"`, independent of any per-source
/// separator configured on a loader.
pub fn split_key(key: &str) -> Vec<&str> {
    key.split(':').collect()
}

/// Look up the value at a nested key path.
///
/// # Errors
///
/// [`ConfigError::KeyNotFound`] if a segment is absent,
/// [`ConfigError::NotAMap`] if an intermediate segment holds a scalar. An
/// empty path is invalid and reports `KeyNotFound`.
pub fn get<'a>(map: &'a ConfigMap, keys: &[&str]) -> Result<&'a ConfigValue, ConfigError> {
    let Some((&first, rest)) = keys.split_first() else {
        return Err(ConfigError::KeyNotFound(String::new()));
    };

    let value = map
        .get(first)
        .ok_or_else(|| ConfigError::KeyNotFound(first.to_string()))?;

    if rest.is_empty() {
        return Ok(value);
    }

    match value {
        ConfigValue::Map(inner) => get(inner, rest),
        _ => Err(ConfigError::NotAMap(first.to_string())),
    }
}

/// Insert a value at a nested key path, creating intermediate maps on demand.
///
/// An empty path is a no-op. The operation never overwrites: a terminal key
/// that already exists fails with [`ConfigError::AlreadyPresent`], and an
/// intermediate key holding a scalar fails with [`ConfigError::NotAMap`]. On
/// error the tree is left unchanged.
pub fn set(map: &mut ConfigMap, keys: &[&str], value: ConfigValue) -> Result<(), ConfigError> {
    let Some((&first, rest)) = keys.split_first() else {
        return Ok(());
    };

    if rest.is_empty() {
        if map.contains_key(first) {
            return Err(ConfigError::AlreadyPresent(first.to_string()));
        }
        map.insert(first.to_string(), value);
        return Ok(());
    }

    match map.get_mut(first) {
        Some(ConfigValue::Map(inner)) => set(inner, rest, value),
        Some(_) => Err(ConfigError::NotAMap(first.to_string())),
        None => {
            // Build the missing intermediate node, attach only on success.
            let mut inner = ConfigMap::new();
            set(&mut inner, rest, value)?;
            map.insert(first.to_string(), ConfigValue::Map(inner));
            Ok(())
        }
    }
}

/// Merge a source tree into a destination tree, first-writer-wins.
///
/// Keys absent from the destination adopt the whole source subtree. Keys that
/// are maps on both sides merge recursively, so deeper source keys still land.
/// Any other collision (scalar vs scalar, scalar vs map) leaves the
/// destination value untouched. `merge` never fails.
pub fn merge(dst: &mut ConfigMap, src: ConfigMap) {
    for (key, src_value) in src {
        if !dst.contains_key(&key) {
            dst.insert(key, src_value);
            continue;
        }

        if let ConfigValue::Map(src_inner) = src_value {
            if let Some(ConfigValue::Map(dst_inner)) = dst.get_mut(&key) {
                merge(dst_inner, src_inner);
            }
            // Map vs non-map: the earlier source keeps the key.
        }
    }
}
