//! Save-slot storage for game snapshots.
//!
//! Repositories only move [`GameSnapshot`](crate::GameSnapshot) documents in
//! and out of named slots; deciding when to save belongs to the session.

mod error;
mod file;
mod memory;
mod traits;

pub use error::RepositoryError;
pub use file::FileSaveRepository;
pub use memory::InMemorySaveRepository;
pub use traits::SaveRepository;

/// Slot names become file names, so only a conservative alphabet is allowed.
pub(crate) fn validate_slot(slot: &str) -> Result<(), RepositoryError> {
    let valid = !slot.is_empty()
        && slot.len() <= 64
        && slot
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(RepositoryError::InvalidSlot(slot.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_names() {
        assert!(validate_slot("autosave").is_ok());
        assert!(validate_slot("slot_2-b").is_ok());
        assert!(validate_slot("").is_err());
        assert!(validate_slot("../escape").is_err());
        assert!(validate_slot("a b").is_err());
    }
}
