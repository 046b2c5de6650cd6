//! Error types for configuration loading and access.

use thiserror::Error;

/// Errors surfaced by the configuration engine and its loaders.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A requested key segment does not exist in the tree.
    #[error("configuration key '{0}' was not found")]
    KeyNotFound(String),

    /// A key path descends through a value that is not a map.
    #[error("configuration key '{0}' is not a map that can contain sub keys")]
    NotAMap(String),

    /// A `set` targeted a key that already holds a value. `set` never
    /// overwrites; later sources defer to earlier ones through `merge`
    /// instead.
    #[error("configuration option '{0}' is already present")]
    AlreadyPresent(String),

    /// A value could not be coerced to the requested type.
    #[error("cannot coerce {found} value to {want}")]
    CoercionFailed {
        /// The requested target type.
        want: &'static str,
        /// The kind of value actually stored.
        found: &'static str,
    },

    /// A source loader failed to produce its tree. This aborts the whole
    /// aggregation; there is no partial recovery.
    #[error("configuration source failed to load: {0}")]
    SourceLoad(anyhow::Error),

    /// Binding the loaded tree onto a typed structure failed.
    #[error("failed to bind configuration to structure: {0}")]
    Decode(#[from] serde_json::Error),
}
