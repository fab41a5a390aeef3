//! Data-driven action catalogues and scenarios.
//!
//! This crate turns data files into engine objects:
//! - Action prototypes from RON catalogues, deduplicated by file priority
//! - Scenarios (actor prototypes, actors, ledgers, starting actions) from RON
//! - Engine configuration from TOML
//!
//! [`ActionFactory`] is always available; the file loaders sit behind the
//! default `loaders` feature.

pub mod registry;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use registry::{ActionFactory, Registration};

#[cfg(feature = "loaders")]
pub use loaders::{
    ActionLoader, ConfigLoader, ContentFactory, InitialAction, LoadResult, Scenario, WorldLoader,
};
