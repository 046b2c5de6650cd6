//! Layered configuration aggregation.
//!
//! `conflate` assembles a program's effective configuration from several
//! sources — command-line arguments, environment variables, JSON and YAML
//! files, in-memory maps — merged into one nested tree with typed accessors
//! for reading values back out.
//!
//! ## Precedence
//!
//! Sources merge in the order they are applied, first-writer-wins: a key
//! already present in the aggregate is never overwritten by a later source.
//! Nested maps merge recursively, so later sources still contribute keys the
//! earlier ones left unset. Within a single source, duplicate keys are an
//! error instead.
//!
//! ```no_run
//! use conflate::sources::{ArgumentLoader, EnvironmentLoader, JsonFileLoader};
//!
//! # fn main() -> Result<(), conflate::ConfigError> {
//! let mut config = conflate::new();
//! config
//!     .use_loader(&ArgumentLoader::new("__", "app-"))?
//!     .use_loader(&EnvironmentLoader::new(true, "__", "APP"))?
//!     .use_loader(&JsonFileLoader::new("config.json", true))?;
//!
//! let workers = config.get_integer("server:workers")?;
//! let timeout = config.get_duration("server:timeout")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Value typing
//!
//! Argument and environment values are interpreted as the most specific
//! matching type: integer, float, boolean, JSON object or array, duration
//! literal (`300ms`, `2h45m`), else plain string. File sources keep their
//! format's native types; JSON numbers arrive as floats and narrow to
//! integers at access time when they carry no fractional part.

pub mod config;
pub mod error;
pub mod sources;
pub mod tree;
pub mod value;

pub use config::{Config, Loader};
pub use error::ConfigError;
pub use value::{ConfigMap, ConfigValue};

use std::sync::{OnceLock, RwLock};

static INSTANCE: OnceLock<RwLock<Config>> = OnceLock::new();

/// Create a new, empty configuration.
pub fn new() -> Config {
    Config::new()
}

/// The process-wide shared configuration instance.
///
/// Constructed lazily, exactly once, even under concurrent first access.
/// Loading should complete before readers start; the lock serializes the
/// load phase and then supports any number of concurrent readers.
pub fn instance() -> &'static RwLock<Config> {
    INSTANCE.get_or_init(|| RwLock::new(Config::new()))
}
