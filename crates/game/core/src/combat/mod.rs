//! Combat resolution.
//!
//! - [`hit`] and [`damage`] are pure d20 formulas
//! - [`result`] rolls complete attacks for the player and monsters
//! - [`slots`] owns attack-slot membership, the waiting queue and turn order
//! - [`step`] is the Idle ↔ Engaged turn machine
//! - [`ranged`] is the commit/resolve targeting sub-mode

pub mod damage;
pub mod hit;
pub mod ranged;
pub mod result;
pub mod slots;
pub mod step;

pub use damage::{apply_damage, calculate_damage};
pub use hit::{AttackProfile, DefenseProfile, NATURAL_CRITICAL, check_hit};
pub use ranged::{ImpactReport, RangedError};
pub use result::{AttackOutcome, AttackResult, resolve_attack};
pub use slots::{Engagement, disengage, engage, slot_position};
pub use step::{StepOutcome, resolve_step};

use crate::error::{ErrorSeverity, GameError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CombatError {
    #[error("no combat in progress")]
    NotEngaged,
    #[error("the player is dead")]
    PlayerDead,
}

impl GameError for CombatError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }
}
