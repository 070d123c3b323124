//! Host-facing runtime for the simulation core.
//!
//! [`GameSession`] owns the authoritative state and the read-only content it
//! was built from, routes every host input through the reducer, and keeps
//! the save slot current through a debounced autosave.
//!
//! Modules are organized by responsibility:
//! - [`session`] drives the reducer and persistence together
//! - [`snapshot`] is the versioned JSON save document
//! - [`autosave`] collapses save requests and guards the writer
//! - [`repository`] stores snapshots by slot
//! - [`config`] reads host settings from the environment
pub mod autosave;
pub mod config;
pub mod error;
pub mod repository;
pub mod session;
pub mod snapshot;

pub use autosave::{AutoSaveScheduler, SaveFingerprint, SaveJob};
pub use config::RuntimeConfig;
pub use error::{Result, RuntimeError};
pub use repository::{
    FileSaveRepository, InMemorySaveRepository, RepositoryError, SaveRepository,
};
pub use session::{Dispatch, GameSession};
pub use snapshot::{GameSnapshot, SNAPSHOT_VERSION};
