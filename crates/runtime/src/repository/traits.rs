//! Repository contract for persisting snapshots.

use super::RepositoryError;
use crate::snapshot::GameSnapshot;

/// Named save slots holding one snapshot each.
pub trait SaveRepository: Send + Sync {
    /// Writes `snapshot` to `slot`, replacing what was there.
    fn save(&self, slot: &str, snapshot: &GameSnapshot) -> Result<(), RepositoryError>;

    /// Reads `slot`; `None` when it was never written.
    fn load(&self, slot: &str) -> Result<Option<GameSnapshot>, RepositoryError>;

    /// Removes `slot`. Deleting an empty slot is not an error.
    fn delete(&self, slot: &str) -> Result<(), RepositoryError>;

    fn exists(&self, slot: &str) -> bool;

    /// All written slots, sorted.
    fn list_slots(&self) -> Result<Vec<String>, RepositoryError> {
        Ok(vec![])
    }
}
