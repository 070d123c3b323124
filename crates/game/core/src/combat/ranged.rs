//! Ranged targeting sub-mode.
//!
//! A shot is split in two so the host can animate the projectile: `commit`
//! rolls the attack and returns a pending-impact token, and `resolve` applies
//! it when the flight ends. Nothing can cancel a committed shot.

use super::result::{monster_defense, player_profile, resolve_attack};
use super::slots::{remove_monster, settle};
use super::step::ranged_weapon;
use crate::env::{GameEnv, RollStream};
use crate::error::{ErrorSeverity, GameError};
use crate::state::{EntityId, GameState, ImpactId, PendingImpact};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RangedError {
    #[error("ranged mode is not active")]
    ModeInactive,
    #[error("no ranged weapon equipped")]
    NoRangedWeapon,
    #[error("target {0} does not exist")]
    TargetGone(EntityId),
    #[error("impact {0:?} is not in flight")]
    UnknownImpact(ImpactId),
    #[error("the player is dead")]
    PlayerDead,
}

impl GameError for RangedError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }
}

/// What a resolved impact did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImpactReport {
    pub impact: ImpactId,
    pub target: EntityId,
    /// Damage applied; 0 for a miss or a target that vanished mid-flight.
    pub damage: u32,
    pub target_died: bool,
}

/// Switches the targeting mode. Turning it on needs an equipped ranged weapon.
///
/// # Errors
///
/// [`RangedError::NoRangedWeapon`] when activating without one.
pub fn set_mode(state: &mut GameState, env: &GameEnv<'_>, active: bool) -> Result<(), RangedError> {
    if state.is_game_over() {
        return Err(RangedError::PlayerDead);
    }
    if !active {
        state.ranged.deactivate();
        return Ok(());
    }
    if ranged_weapon(state, env).is_none() {
        return Err(RangedError::NoRangedWeapon);
    }
    state.ranged.active = true;
    Ok(())
}

/// Selects (or with `None`, clears) the ranged target.
///
/// # Errors
///
/// [`RangedError::TargetGone`] if the monster is not in the arena.
pub fn select_target(state: &mut GameState, target: Option<EntityId>) -> Result<(), RangedError> {
    if let Some(id) = target
        && !state.monsters.get(id).is_some_and(|m| m.is_alive())
    {
        return Err(RangedError::TargetGone(id));
    }
    state.ranged.target = target;
    Ok(())
}

/// Validates the shot, rolls it, and puts the projectile in flight.
///
/// # Errors
///
/// Recoverable [`RangedError`]s when the mode is off, no ranged weapon is
/// equipped, or the target is no longer alive.
pub fn commit(
    state: &mut GameState,
    env: &GameEnv<'_>,
    target: EntityId,
) -> Result<PendingImpact, RangedError> {
    if state.is_game_over() {
        return Err(RangedError::PlayerDead);
    }
    if !state.ranged.active {
        return Err(RangedError::ModeInactive);
    }
    let weapon = ranged_weapon(state, env).ok_or(RangedError::NoRangedWeapon)?;
    let defender = state
        .monsters
        .get(target)
        .filter(|m| m.is_alive())
        .ok_or(RangedError::TargetGone(target))?;

    let mut dice = env.dice(state, RollStream::Combat);
    let profile = player_profile(&state.player, Some(weapon), env.config().unarmed_damage);
    let result = resolve_attack(&mut dice, &profile, &monster_defense(defender));

    let impact = PendingImpact {
        id: state.ranged.allocate_impact_id(),
        target,
        weapon: weapon.id.clone(),
        outcome: result.outcome,
        damage: result.damage.unwrap_or(0),
    };
    tracing::debug!(
        impact = ?impact.id,
        target = %target,
        outcome = ?result.outcome,
        "ranged shot committed"
    );
    state.ranged.target = Some(target);
    state.ranged.in_flight.push(impact.clone());
    Ok(impact)
}

/// Lands a projectile on whatever is left of its target.
///
/// A target that died or vanished during the flight takes nothing; the
/// impact is still consumed.
///
/// # Errors
///
/// [`RangedError::UnknownImpact`] if the id is not in flight.
pub fn resolve(
    state: &mut GameState,
    env: &GameEnv<'_>,
    impact: ImpactId,
) -> Result<ImpactReport, RangedError> {
    let index = state
        .ranged
        .in_flight
        .iter()
        .position(|p| p.id == impact)
        .ok_or(RangedError::UnknownImpact(impact))?;
    let pending = state.ranged.in_flight.remove(index);
    let config = env.config();

    let Some(monster) = state.monsters.get_mut(pending.target) else {
        return Ok(ImpactReport {
            impact,
            target: pending.target,
            damage: 0,
            target_died: false,
        });
    };
    let damage = monster.take_damage(pending.damage);
    let target_died = !monster.is_alive();

    if target_died {
        remove_monster(state, config, pending.target, true);
        settle(state, config);
    }
    tracing::debug!(impact = ?impact, damage, target_died, "ranged impact resolved");
    Ok(ImpactReport {
        impact,
        target: pending.target,
        damage,
        target_died,
    })
}
