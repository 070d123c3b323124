//! The authoritative reducer.
//!
//! [`GameEngine::reduce`] maps `(state, action)` to a new state and never
//! touches its input. Actions are routed through an ordered list of slices,
//! one per [`ActionDomain`]; recoverable rejections come back as the input
//! state, unchanged, so the host can dispatch freely without pre-checking.

mod errors;
mod inventory;
mod movement;
mod slices;

pub use errors::{InventoryError, MoveError};
pub use inventory::{
    add_weapon, drop_item, drop_weapon, equip_ranged_weapon, equip_weapon, use_item,
};
pub use movement::{move_player, wait};

use crate::action::{Action, ActionDomain};
use crate::env::GameEnv;
use crate::error::GameError;
use crate::state::GameState;

/// What one reduction produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reduction {
    pub state: GameState,
    /// The state differs from the input (and the nonce was bumped).
    pub changed: bool,
    /// Slice that claimed the action; `None` when nothing did.
    pub handled_by: Option<ActionDomain>,
}

/// Pure reducer over [`GameState`], bound to its read-only collaborators.
pub struct GameEngine<'a> {
    env: GameEnv<'a>,
}

impl<'a> GameEngine<'a> {
    pub fn new(env: GameEnv<'a>) -> Self {
        Self { env }
    }

    pub fn env(&self) -> &GameEnv<'a> {
        &self.env
    }

    /// Returns the state after `action`.
    pub fn reduce(&self, state: &GameState, action: &Action) -> GameState {
        self.apply(state, action).state
    }

    /// Like [`Self::reduce`], reporting whether anything changed.
    ///
    /// The nonce is bumped exactly when the produced state differs from the
    /// input, except for snapshot hydration, which restores the saved nonce
    /// as is.
    pub fn apply(&self, state: &GameState, action: &Action) -> Reduction {
        let claimed = slices::SLICES
            .iter()
            .find_map(|slice| slice(&self.env, state, action));

        let Some(mut next) = claimed else {
            tracing::warn!(action = action.name(), "unhandled action");
            return Reduction {
                state: state.clone(),
                changed: false,
                handled_by: None,
            };
        };

        let changed = next != *state;
        if changed && !matches!(action, Action::HydrateSnapshot { .. }) {
            next.turn.nonce += 1;
        }
        tracing::trace!(action = action.name(), changed, nonce = next.turn.nonce, "action reduced");
        Reduction {
            state: next,
            changed,
            handled_by: Some(if state.is_game_over() && !action.survives_death() {
                ActionDomain::Lifecycle
            } else {
                action.domain()
            }),
        }
    }
}

/// Runs a fallible handler on a copy of `state`.
///
/// On error the copy is thrown away: recoverable errors are input races and
/// logged at debug level, anything else points at broken content.
fn run_fallible<E: GameError>(
    state: &GameState,
    handler: impl FnOnce(&mut GameState) -> Result<(), E>,
) -> GameState {
    let mut next = state.clone();
    match handler(&mut next) {
        Ok(()) => next,
        Err(error) => {
            if error.is_recoverable() {
                tracing::debug!(%error, "action rejected");
            } else {
                tracing::error!(%error, severity = error.severity().as_str(), "action failed");
            }
            state.clone()
        }
    }
}
