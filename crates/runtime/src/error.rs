//! Errors surfaced by the runtime API.

use thiserror::Error;

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("failed to load content: {0:#}")]
    Content(#[from] anyhow::Error),

    #[error("failed to build the level")]
    Hydration(#[source] game_core::HydrationError),

    #[error("invalid value {value:?} for {key}")]
    InvalidConfig { key: &'static str, value: String },

    #[error("no platform data directory is available; set DUNGEON_SAVE_DIR")]
    NoSaveDir,

    #[error("save slot '{0}' is empty")]
    EmptySlot(String),

    #[error("a save is already in progress")]
    SaveInProgress,
}
