//! Content loaders for reading engine data from files.
//!
//! RON carries action catalogues and scenarios, TOML carries engine
//! configuration. Every loader reports failures with the offending file.

pub mod actions;
pub mod config;
pub mod factory;
pub mod filters;
pub mod world;

pub use actions::{ActionLoader, ActionSpec, SubActionSpec};
pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use filters::{FilterSpec, LogicSpec};
pub use world::{InitialAction, Scenario, WorldLoader};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
