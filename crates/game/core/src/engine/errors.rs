//! Errors raised by player-turn and inventory handlers.

use crate::error::{ErrorSeverity, GameError};
use crate::state::{ItemId, Position};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("cannot take a free turn while engaged in melee")]
    InCombat,
    #[error("{0} is outside the map")]
    OutOfBounds(Position),
    #[error("{0} is blocked")]
    Blocked(Position),
    #[error("the player is dead")]
    PlayerDead,
}

impl GameError for MoveError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InventoryError {
    #[error("item {0:?} is not in the inventory")]
    UnknownItem(ItemId),
    #[error("weapon '{0}' is not in the catalogue")]
    UnknownWeapon(String),
    #[error("weapon '{0}' is not carried")]
    NotOwned(String),
    #[error("weapon '{0}' cannot be dropped")]
    Permanent(String),
    #[error("the player is dead")]
    PlayerDead,
}

impl GameError for InventoryError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownWeapon(_) => ErrorSeverity::Validation,
            _ => ErrorSeverity::Recoverable,
        }
    }
}
