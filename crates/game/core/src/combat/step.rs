//! One step of the melee turn machine.
//!
//! The pointer walks `[player, ...attackers]` and wraps back to the player.
//! Each step resolves the current combatant's action, clears the dead,
//! promotes the waiting queue, decides whether combat continues, and keeps
//! the rest of the world moving.

use super::result::{
    AttackResult, monster_defense, monster_profile, player_defense, player_profile, resolve_attack,
};
use super::slots::{next_combatant, remove_defeated, settle};
use super::CombatError;
use crate::env::{Dice, GameEnv, RollStream, WeaponKind, WeaponTemplate};
use crate::monster;
use crate::state::{CombatEvent, Combatant, EntityId, GameState, SkipReason};
use crate::turn;

/// How a step ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// The step ran to completion; `engaged` tells whether combat continues.
    Resolved { engaged: bool },
    /// An attacker brought the player to 0 HP; the run is over.
    PlayerDied,
}

/// Advances the combat state machine by one step.
///
/// # Errors
///
/// [`CombatError::NotEngaged`] while idle and [`CombatError::PlayerDead`]
/// after death; both leave the state untouched.
pub fn resolve_step(state: &mut GameState, env: &GameEnv<'_>) -> Result<StepOutcome, CombatError> {
    if state.is_game_over() {
        return Err(CombatError::PlayerDead);
    }
    if !state.combat.is_engaged() {
        return Err(CombatError::NotEngaged);
    }
    let config = env.config();
    let mut dice = env.dice(state, RollStream::Combat);

    match state.combat.current {
        Combatant::Player => {
            if state.player.is_hidden() {
                // The nominal attacker loses its action; the pointer stays put.
                if let Some(first) = state.monsters.slot_occupants().first().copied() {
                    skip(state, env, first, SkipReason::Hidden);
                }
            } else {
                player_attacks(state, env, &mut dice);
                state.combat.current = next_combatant(state, Combatant::Player);
            }
            turn::end_player_turn(state, config);
        }
        Combatant::Monster(id) => {
            if monster_acts(state, env, &mut dice, id) {
                return Ok(StepOutcome::PlayerDied);
            }
        }
    }

    remove_defeated(state, config);
    settle(state, config);

    monster::spawn_check(state, env);
    if state.combat.is_engaged() && state.combat.current == Combatant::Player {
        monster::movement_pass(state, env);
    }

    Ok(StepOutcome::Resolved {
        engaged: state.combat.is_engaged(),
    })
}

/// Resolves an attacker's turn. Returns true if the player died.
fn monster_acts(state: &mut GameState, env: &GameEnv<'_>, dice: &mut Dice<'_>, id: EntityId) -> bool {
    let config = env.config();
    let Some(monster) = state.monsters.get(id) else {
        state.combat.current = next_combatant(state, Combatant::Monster(id));
        return false;
    };

    if state.player.is_hidden() {
        skip(state, env, id, SkipReason::Hidden);
        state.combat.current = Combatant::Player;
        return false;
    }
    if monster.stunned_turns > 0 {
        if let Some(monster) = state.monsters.get_mut(id) {
            monster.consume_stun();
        }
        skip(state, env, id, SkipReason::Stunned);
        state.combat.current = next_combatant(state, Combatant::Monster(id));
        return false;
    }

    let name = monster.name.clone();
    let result = resolve_attack(dice, &monster_profile(monster), &player_defense(&state.player));
    if let Some(damage) = result.damage {
        state.player.take_damage(damage);
    }
    tracing::debug!(
        monster = %id,
        roll = result.roll,
        outcome = ?result.outcome,
        damage = ?result.damage,
        player_hp = state.player.hp,
        "monster attacked"
    );
    record_attack(state, env, Combatant::Monster(id), Combatant::Player, &result);

    if !state.player.is_alive() {
        let message = format!("You were slain by {name}.");
        state.enter_game_over(name, message, config);
        return true;
    }
    state.combat.current = next_combatant(state, Combatant::Monster(id));
    false
}

fn player_attacks(state: &mut GameState, env: &GameEnv<'_>, dice: &mut Dice<'_>) {
    let config = env.config();
    let ranged_target = state
        .ranged
        .target
        .filter(|_| state.ranged.active)
        .filter(|id| state.monsters.get(*id).is_some_and(|m| m.is_alive()));

    let (target, weapon) = match ranged_target {
        Some(target) => (target, ranged_weapon(state, env).or_else(|| melee_weapon(state, env))),
        None => match state.monsters.slot_occupants().first().copied() {
            Some(first) => (first, melee_weapon(state, env)),
            None => return,
        },
    };
    let Some(defender) = state.monsters.get(target) else {
        return;
    };

    let profile = player_profile(&state.player, weapon, config.unarmed_damage);
    let result = resolve_attack(dice, &profile, &monster_defense(defender));
    if let Some(monster) = state.monsters.get_mut(target)
        && let Some(damage) = result.damage
    {
        monster.take_damage(damage);
    }
    tracing::debug!(
        target = %target,
        roll = result.roll,
        outcome = ?result.outcome,
        damage = ?result.damage,
        "player attacked"
    );
    record_attack(state, env, Combatant::Player, Combatant::Monster(target), &result);
}

/// Equipped melee weapon, if it resolves in the catalogue.
pub(crate) fn melee_weapon<'a>(state: &GameState, env: &GameEnv<'a>) -> Option<&'a WeaponTemplate> {
    state
        .player
        .equipped_weapon
        .as_deref()
        .and_then(|id| env.templates().weapon(id))
        .filter(|w| w.kind == WeaponKind::Melee)
}

/// Equipped ranged weapon, if it resolves in the catalogue.
pub(crate) fn ranged_weapon<'a>(state: &GameState, env: &GameEnv<'a>) -> Option<&'a WeaponTemplate> {
    state
        .player
        .equipped_ranged
        .as_deref()
        .and_then(|id| env.templates().weapon(id))
        .filter(|w| w.kind == WeaponKind::Ranged)
}

fn skip(state: &mut GameState, env: &GameEnv<'_>, monster: EntityId, reason: SkipReason) {
    tracing::debug!(monster = %monster, ?reason, "attacker skipped");
    state.combat.record(
        CombatEvent::Skipped { monster, reason },
        env.config().combat_log_capacity,
    );
}

fn record_attack(
    state: &mut GameState,
    env: &GameEnv<'_>,
    attacker: Combatant,
    target: Combatant,
    result: &AttackResult,
) {
    state.combat.record(
        CombatEvent::Attack {
            attacker,
            target,
            roll: result.roll,
            total: result.total,
            outcome: result.outcome,
            damage: result.damage,
        },
        env.config().combat_log_capacity,
    );
}
