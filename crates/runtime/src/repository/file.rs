//! File-based SaveRepository implementation.

use std::fs;
use std::path::{Path, PathBuf};

use super::{RepositoryError, SaveRepository, validate_slot};
use crate::snapshot::GameSnapshot;

/// Stores each slot as `<base_dir>/<slot>.json`, pretty-printed.
///
/// Writes go to a sibling temp file that is renamed over the slot, so a
/// crash mid-save leaves the previous save intact.
pub struct FileSaveRepository {
    base_dir: PathBuf,
}

impl FileSaveRepository {
    const EXTENSION: &'static str = "json";

    /// Creates the repository, creating `base_dir` if needed.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn slot_path(&self, slot: &str) -> PathBuf {
        self.base_dir.join(format!("{slot}.{}", Self::EXTENSION))
    }
}

impl SaveRepository for FileSaveRepository {
    fn save(&self, slot: &str, snapshot: &GameSnapshot) -> Result<(), RepositoryError> {
        validate_slot(slot)?;
        let path = self.slot_path(slot);
        let temp_path = path.with_extension("json.tmp");

        let json = serde_json::to_string_pretty(snapshot)?;
        fs::write(&temp_path, json)?;
        fs::rename(&temp_path, &path)?;

        tracing::debug!(slot, path = %path.display(), "snapshot written");
        Ok(())
    }

    fn load(&self, slot: &str) -> Result<Option<GameSnapshot>, RepositoryError> {
        validate_slot(slot)?;
        let path = self.slot_path(slot);
        if !path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&path)?;
        let snapshot: GameSnapshot = serde_json::from_str(&json)?;
        tracing::debug!(slot, version = snapshot.version, "snapshot read");
        Ok(Some(snapshot))
    }

    fn delete(&self, slot: &str) -> Result<(), RepositoryError> {
        validate_slot(slot)?;
        let path = self.slot_path(slot);
        if path.exists() {
            fs::remove_file(&path)?;
            tracing::info!(slot, "save deleted");
        }
        Ok(())
    }

    fn exists(&self, slot: &str) -> bool {
        validate_slot(slot).is_ok() && self.slot_path(slot).exists()
    }

    fn list_slots(&self) -> Result<Vec<String>, RepositoryError> {
        let mut slots = Vec::new();
        for entry in fs::read_dir(&self.base_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|s| s.to_str()) == Some(Self::EXTENSION)
                && let Some(slot) = path.file_stem().and_then(|s| s.to_str())
                && validate_slot(slot).is_ok()
            {
                slots.push(slot.to_owned());
            }
        }
        slots.sort_unstable();
        Ok(slots)
    }
}
