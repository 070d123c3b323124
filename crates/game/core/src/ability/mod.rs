//! Turn-counted ability charge machines.
//!
//! Both abilities spend charges and earn them back one at a time, after a
//! fixed number of player turns. Nothing here runs unless the ability has
//! been unlocked.

mod hide;
mod jaunt;

pub use hide::{tick_hide, toggle_hide};
pub use jaunt::{arm_jaunt, cancel_jaunt, execute_jaunt, tick_jaunt};

use crate::error::{ErrorSeverity, GameError};
use crate::state::{Ability, GameState};

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AbilityError {
    #[error("{0} has not been unlocked")]
    Locked(Ability),
    #[error("{0} has no charges left")]
    NoCharges(Ability),
    #[error("jaunt is not armed")]
    NotArmed,
    #[error("the player is dead")]
    PlayerDead,
}

impl GameError for AbilityError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }
}

/// Grants an ability. Returns false if it was already unlocked.
pub fn unlock_ability(state: &mut GameState, ability: Ability) -> bool {
    if state.player.has_unlocked(ability) {
        return false;
    }
    state.player.unlocks.insert(ability.flag());
    tracing::info!(%ability, "ability unlocked");
    true
}

/// One recharge step shared by both machines.
///
/// Below `max` the progress counter climbs and converts into a charge at
/// `period`. Returns false when the machine is already full.
fn recharge(charges: &mut u32, progress: &mut u32, max: u32, period: u32) -> bool {
    if *charges >= max {
        *charges = max;
        return false;
    }
    *progress += 1;
    if *progress >= period.max(1) {
        *charges += 1;
        *progress = 0;
    }
    true
}
