use std::collections::BTreeMap;
use std::sync::RwLock;

use super::{RepositoryError, SaveRepository, validate_slot};
use crate::snapshot::GameSnapshot;

/// In-memory implementation of [`SaveRepository`], for tests and hosts
/// without storage.
#[derive(Default)]
pub struct InMemorySaveRepository {
    slots: RwLock<BTreeMap<String, GameSnapshot>>,
}

impl InMemorySaveRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SaveRepository for InMemorySaveRepository {
    fn save(&self, slot: &str, snapshot: &GameSnapshot) -> Result<(), RepositoryError> {
        validate_slot(slot)?;
        let mut slots = self.slots.write().map_err(|_| RepositoryError::LockPoisoned)?;
        slots.insert(slot.to_owned(), snapshot.clone());
        Ok(())
    }

    fn load(&self, slot: &str) -> Result<Option<GameSnapshot>, RepositoryError> {
        validate_slot(slot)?;
        let slots = self.slots.read().map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(slots.get(slot).cloned())
    }

    fn delete(&self, slot: &str) -> Result<(), RepositoryError> {
        validate_slot(slot)?;
        let mut slots = self.slots.write().map_err(|_| RepositoryError::LockPoisoned)?;
        slots.remove(slot);
        Ok(())
    }

    fn exists(&self, slot: &str) -> bool {
        validate_slot(slot).is_ok()
            && self
                .slots
                .read()
                .map(|slots| slots.contains_key(slot))
                .unwrap_or(false)
    }

    fn list_slots(&self) -> Result<Vec<String>, RepositoryError> {
        let slots = self.slots.read().map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(slots.keys().cloned().collect())
    }
}
