//! Reducer slices. Each one returns `None` for actions it does not own.

use super::{inventory, movement, run_fallible};
use crate::ability;
use crate::action::Action;
use crate::combat::{self, ranged, slots};
use crate::env::GameEnv;
use crate::hydration;
use crate::monster;
use crate::state::GameState;

pub(super) type Slice = fn(&GameEnv<'_>, &GameState, &Action) -> Option<GameState>;

/// Consulted in order; the first slice that claims an action wins.
pub(super) const SLICES: [Slice; 7] = [
    reduce_lifecycle,
    reduce_movement,
    reduce_combat,
    reduce_monsters,
    reduce_abilities,
    reduce_inventory,
    reduce_interface,
];

fn reduce_lifecycle(env: &GameEnv<'_>, state: &GameState, action: &Action) -> Option<GameState> {
    let config = env.config();
    if state.is_game_over() && !action.survives_death() {
        tracing::debug!(action = action.name(), "ignored after death");
        return Some(state.clone());
    }
    match action {
        Action::GameOver { message, killer } => {
            let mut next = state.clone();
            next.enter_game_over(killer.as_str(), message.as_str(), config);
            Some(next)
        }
        Action::ResetGame => {
            let mut next = state.clone();
            next.reset_run(config);
            tracing::info!(seed = next.game_seed, "run reset");
            Some(next)
        }
        Action::HydrateSnapshot { state: snapshot } => Some(snapshot.as_ref().clone()),
        Action::SetLevel { level } => Some(run_fallible(state, |s| {
            s.change_level(config, level, env.templates())
        })),
        Action::SetSubGameCompleted {
            sub_game,
            completed,
        } => {
            let mut next = state.clone();
            next.progress
                .sub_games_completed
                .insert(sub_game.clone(), *completed);
            Some(next)
        }
        Action::SetWaypointCreated { waypoint } => {
            let mut next = state.clone();
            next.progress.waypoints_created.insert(waypoint.clone());
            Some(next)
        }
        _ => None,
    }
}

fn reduce_movement(env: &GameEnv<'_>, state: &GameState, action: &Action) -> Option<GameState> {
    match action {
        Action::MovePlayer { direction } => Some(run_fallible(state, |s| {
            movement::move_player(s, env, *direction).map(|_| ())
        })),
        Action::Wait => Some(run_fallible(state, |s| movement::wait(s, env))),
        _ => None,
    }
}

fn reduce_combat(env: &GameEnv<'_>, state: &GameState, action: &Action) -> Option<GameState> {
    let next = match action {
        Action::CombatStep => run_fallible(state, |s| combat::resolve_step(s, env).map(|_| ())),
        Action::SetRangedMode { active } => {
            run_fallible(state, |s| ranged::set_mode(s, env, *active))
        }
        Action::SelectTarget { target } => {
            run_fallible(state, |s| ranged::select_target(s, *target))
        }
        Action::FireRanged { target } => {
            run_fallible(state, |s| ranged::commit(s, env, *target).map(|_| ()))
        }
        Action::ResolveImpact { impact } => {
            run_fallible(state, |s| ranged::resolve(s, env, *impact).map(|_| ()))
        }
        _ => return None,
    };
    Some(next)
}

fn reduce_monsters(env: &GameEnv<'_>, state: &GameState, action: &Action) -> Option<GameState> {
    let config = env.config();
    let mut next = state.clone();
    match action {
        Action::SpawnCheck => {
            monster::spawn_check(&mut next, env);
        }
        Action::MoveMonsters => {
            monster::movement_pass(&mut next, env);
        }
        Action::AddMonster { instance } => {
            if let Some(id) = instance.id
                && next.monsters.contains(id)
            {
                tracing::debug!(monster = %id, "monster id already taken");
                return Some(next);
            }
            let hydrated = hydration::hydrate_monsters(
                std::slice::from_ref(instance),
                env.templates(),
                || next.allocate_entity_id(),
            );
            match hydrated {
                Ok(monsters) => {
                    for monster in monsters {
                        slots::admit(&mut next, config, monster);
                    }
                }
                Err(error) => {
                    tracing::error!(%error, "cannot add monster");
                    return Some(state.clone());
                }
            }
        }
        Action::RemoveMonster { id } => {
            if slots::remove_monster(&mut next, config, *id, true).is_none() {
                tracing::debug!(monster = %id, "no such monster");
                return Some(next);
            }
            slots::settle(&mut next, config);
        }
        _ => return None,
    }
    Some(next)
}

fn reduce_abilities(env: &GameEnv<'_>, state: &GameState, action: &Action) -> Option<GameState> {
    let config = env.config();
    let next = match action {
        Action::ToggleHide => run_fallible(state, |s| ability::toggle_hide(s).map(|_| ())),
        Action::TickHide => {
            let mut next = state.clone();
            ability::tick_hide(&mut next, config);
            next
        }
        Action::ArmJaunt => run_fallible(state, |s| ability::arm_jaunt(s).map(|_| ())),
        Action::CancelJaunt => {
            let mut next = state.clone();
            ability::cancel_jaunt(&mut next);
            next
        }
        Action::ExecuteJaunt { target } => run_fallible(state, |s| {
            ability::execute_jaunt(s, config, *target).map(|_| ())
        }),
        Action::TickJaunt => {
            let mut next = state.clone();
            ability::tick_jaunt(&mut next, config);
            next
        }
        Action::UnlockAbility { ability } => {
            let mut next = state.clone();
            ability::unlock_ability(&mut next, *ability);
            next
        }
        _ => return None,
    };
    Some(next)
}

fn reduce_inventory(env: &GameEnv<'_>, state: &GameState, action: &Action) -> Option<GameState> {
    let next = match action {
        Action::UseItem { item } => {
            run_fallible(state, |s| inventory::use_item(s, env, *item).map(|_| ()))
        }
        Action::DropItem { item } => run_fallible(state, |s| inventory::drop_item(s, *item)),
        Action::AddWeapon { weapon } => {
            run_fallible(state, |s| inventory::add_weapon(s, env, weapon))
        }
        Action::EquipWeapon { weapon } => {
            run_fallible(state, |s| inventory::equip_weapon(s, weapon))
        }
        Action::DropWeapon { weapon } => {
            run_fallible(state, |s| inventory::drop_weapon(s, env, weapon))
        }
        Action::EquipRangedWeapon { weapon } => {
            run_fallible(state, |s| inventory::equip_ranged_weapon(s, weapon))
        }
        _ => return None,
    };
    Some(next)
}

fn reduce_interface(_env: &GameEnv<'_>, state: &GameState, action: &Action) -> Option<GameState> {
    let mut next = state.clone();
    match action {
        Action::ToggleInventory => next.ui.inventory_open = !next.ui.inventory_open,
        Action::ShowMessage { message } => next.ui.message = Some(message.clone()),
        Action::DismissMessage => next.ui.message = None,
        Action::ClearTeleportFlash { id } => next.ui.teleport_flashes.retain(|f| f.id != *id),
        _ => return None,
    }
    Some(next)
}
