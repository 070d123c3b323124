//! Per-turn bookkeeping shared by every action that spends a player turn.

use crate::ability;
use crate::config::GameConfig;
use crate::env::GameEnv;
use crate::monster;
use crate::state::GameState;

/// Counters that advance once per player turn: the move count, both ability
/// charge machines, a timed cloak and self-healing.
pub fn end_player_turn(state: &mut GameState, config: &GameConfig) {
    state.turn.move_count += 1;
    ability::tick_hide(state, config);
    ability::tick_jaunt(state, config);
    state.player.cloak.tick();
    regenerate(state);
}

/// Lets the rest of the world act after an out-of-combat player turn.
pub fn advance_world(state: &mut GameState, env: &GameEnv<'_>) {
    monster::spawn_check(state, env);
    monster::movement_pass(state, env);
}

/// One HP every `turns_per_hit_point` turns spent below maximum.
fn regenerate(state: &mut GameState) {
    let period = state.world.turns_per_hit_point;
    let player = &mut state.player;
    if period == 0 || !player.is_alive() || player.hp >= player.max_hp {
        player.regen_progress = 0;
        return;
    }
    player.regen_progress += 1;
    if player.regen_progress >= period {
        player.heal(1);
        player.regen_progress = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Cloak;

    #[test]
    fn self_heal_fires_once_per_period() {
        let config = GameConfig::default();
        let mut state = GameState::new(&config, 1);
        state.world.turns_per_hit_point = 3;
        state.player.hp = 50;

        end_player_turn(&mut state, &config);
        end_player_turn(&mut state, &config);
        assert_eq!(state.player.hp, 50);
        end_player_turn(&mut state, &config);
        assert_eq!(state.player.hp, 51);
        assert_eq!(state.player.regen_progress, 0);
        assert_eq!(state.turn.move_count, 3);
    }

    #[test]
    fn regeneration_is_idle_at_full_health_or_when_disabled() {
        let config = GameConfig::default();
        let mut state = GameState::new(&config, 1);
        state.world.turns_per_hit_point = 1;
        end_player_turn(&mut state, &config);
        assert_eq!(state.player.hp, state.player.max_hp);
        assert_eq!(state.player.regen_progress, 0);

        state.world.turns_per_hit_point = 0;
        state.player.hp = 10;
        end_player_turn(&mut state, &config);
        assert_eq!(state.player.hp, 10);
    }

    #[test]
    fn timed_cloak_runs_out_with_turns() {
        let config = GameConfig::default();
        let mut state = GameState::new(&config, 1);
        state.player.cloak = Cloak::Turns(1);
        assert!(state.player.is_hidden());
        end_player_turn(&mut state, &config);
        assert!(!state.player.is_hidden());
    }
}
