//! Source loaders: command-line arguments, environment variables, JSON and
//! YAML files, and in-memory maps.
//!
//! Each loader normalizes its raw input into a canonical nested tree ready
//! for merging. The argument and environment loaders share the flat-key
//! convention: strip a configured prefix, split the remainder on a configured
//! separator, and interpret values with [`crate::value::parse_raw`]. File
//! loaders parse natively nested documents and skip all prefix/separator
//! logic. Within a single load, keys are written with the strict `set`, so a
//! clash inside one source's own input is an error; clashes across sources
//! are resolved later by the aggregator's first-writer-wins merge.

mod args;
mod env;
mod json;
mod map;
mod yaml;

pub use args::ArgumentLoader;
pub use env::EnvironmentLoader;
pub use json::JsonFileLoader;
pub use map::MapLoader;
pub use yaml::YamlFileLoader;

// An empty separator keeps the whole key as a single path segment.
pub(crate) fn split_segments<'a>(key: &'a str, separator: &str) -> Vec<&'a str> {
    if separator.is_empty() {
        vec![key]
    } else {
        key.split(separator).collect()
    }
}
