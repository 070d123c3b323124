//! Data-driven content definitions and loaders.
//!
//! This crate turns authored data files into `game-core` types:
//! - template catalogue (monsters, weapons, objects, items, spawn rules) in RON
//! - level layouts (placed monsters, objects and items) in RON
//! - game configuration in TOML
//!
//! Content is consumed through `TemplateOracle` and `LevelData` and never
//! appears in game state.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{CatalogLoader, ConfigLoader, ContentFactory, LevelLoader, LoadResult};
