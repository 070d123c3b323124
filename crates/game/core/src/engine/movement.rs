//! Out-of-combat player turns: stepping, waiting, and what the player finds
//! on the cell they enter.

use super::errors::MoveError;
use crate::effect;
use crate::env::{Dice, GameEnv, RollStream, WeaponKind};
use crate::state::{Direction, GameState, GroundItemKind, InventoryItem, Position};
use crate::turn;

/// Steps the player one cell, then lets the world take its turn.
///
/// # Errors
///
/// Recoverable [`MoveError`]s while engaged, dead, or facing the map edge or
/// something solid. The state is untouched in every error case.
pub fn move_player(
    state: &mut GameState,
    env: &GameEnv<'_>,
    direction: Direction,
) -> Result<Position, MoveError> {
    ensure_free_turn(state)?;
    let target = state.player.position.step(direction);
    if !state.world.grid.contains(target) {
        return Err(MoveError::OutOfBounds(target));
    }
    if state.world.solid_object_at(target).is_some()
        || state
            .monsters
            .iter()
            .any(|m| m.footprint.covers(m.position, target))
    {
        return Err(MoveError::Blocked(target));
    }

    state.player.position = target;
    let mut dice = env.dice(state, RollStream::Effect);
    enter_cell(state, env, &mut dice, target);
    finish_turn(state, env);
    Ok(target)
}

/// Passes a turn in place.
///
/// # Errors
///
/// [`MoveError::InCombat`] or [`MoveError::PlayerDead`].
pub fn wait(state: &mut GameState, env: &GameEnv<'_>) -> Result<(), MoveError> {
    ensure_free_turn(state)?;
    finish_turn(state, env);
    Ok(())
}

fn ensure_free_turn(state: &GameState) -> Result<(), MoveError> {
    if state.is_game_over() {
        return Err(MoveError::PlayerDead);
    }
    if state.combat.is_engaged() {
        return Err(MoveError::InCombat);
    }
    Ok(())
}

fn finish_turn(state: &mut GameState, env: &GameEnv<'_>) {
    turn::end_player_turn(state, env.config());
    if !state.is_game_over() {
        turn::advance_world(state, env);
    }
}

/// Picks up what lies on `cell`, then fires ready scenery covering it.
fn enter_cell(state: &mut GameState, env: &GameEnv<'_>, dice: &mut Dice<'_>, cell: Position) {
    pick_up(state, env, cell);

    let move_count = state.turn.move_count;
    let triggered: Vec<usize> = state
        .world
        .objects
        .iter()
        .enumerate()
        .filter(|(_, o)| !o.solid && !o.effects.is_empty() && o.covers(cell) && o.is_ready(move_count))
        .map(|(index, _)| index)
        .collect();

    for index in triggered {
        if state.is_game_over() {
            break;
        }
        let object = &mut state.world.objects[index];
        object.last_triggered = Some(move_count);
        let name = object.name.clone();
        let effects = object.effects.clone();
        tracing::debug!(object = %name, %cell, "object triggered");
        effect::apply_all(state, env, dice, &effects, &name);
    }
}

fn pick_up(state: &mut GameState, env: &GameEnv<'_>, cell: Position) {
    let capacity = env.config().inventory_capacity;
    let mut index = 0;
    while index < state.world.items.len() {
        let item = &state.world.items[index];
        if item.position != cell {
            index += 1;
            continue;
        }
        let taken = match &item.kind {
            GroundItemKind::Consumable { effects } => {
                if state.player.inventory.len() >= capacity {
                    state.ui.message = Some("Your pack is full.".to_owned());
                    false
                } else {
                    state.player.inventory.push(InventoryItem {
                        id: item.id,
                        template: item.template.clone(),
                        name: item.name.clone(),
                        effects: effects.clone(),
                    });
                    true
                }
            }
            GroundItemKind::Weapon { weapon } => {
                let weapon = weapon.clone();
                add_weapon_to_kit(state, env, &weapon)
            }
        };
        if taken {
            let item = state.world.items.remove(index);
            tracing::debug!(item = %item.name, %cell, "item picked up");
        } else {
            index += 1;
        }
    }
}

/// Adds a catalogued weapon to the matching list, equipping it when that
/// hand is empty. Returns false for weapons the catalogue does not know.
pub(crate) fn add_weapon_to_kit(state: &mut GameState, env: &GameEnv<'_>, weapon: &str) -> bool {
    let Some(template) = env.templates().weapon(weapon) else {
        tracing::error!(weapon, "weapon is not in the catalogue");
        return false;
    };
    let player = &mut state.player;
    let (list, equipped) = match template.kind {
        WeaponKind::Melee => (&mut player.weapons, &mut player.equipped_weapon),
        WeaponKind::Ranged => (&mut player.ranged_weapons, &mut player.equipped_ranged),
    };
    if !list.iter().any(|w| w == weapon) {
        list.push(weapon.to_owned());
    }
    if equipped.is_none() {
        *equipped = Some(weapon.to_owned());
    }
    true
}
