use super::{AbilityError, recharge};
use crate::combat;
use crate::config::GameConfig;
use crate::state::{Ability, GameState, Position};

/// Arms the jaunt, or disarms it when already armed. Returns the new
/// `armed` flag. Disarming costs nothing.
///
/// # Errors
///
/// [`AbilityError::Locked`] or [`AbilityError::NoCharges`] when arming.
pub fn arm_jaunt(state: &mut GameState) -> Result<bool, AbilityError> {
    if state.player.jaunt.armed {
        cancel_jaunt(state);
        return Ok(false);
    }
    if state.is_game_over() {
        return Err(AbilityError::PlayerDead);
    }
    if !state.player.has_unlocked(Ability::Jaunt) {
        return Err(AbilityError::Locked(Ability::Jaunt));
    }
    if state.player.jaunt.charges == 0 {
        return Err(AbilityError::NoCharges(Ability::Jaunt));
    }
    state.player.jaunt.armed = true;
    Ok(true)
}

pub fn cancel_jaunt(state: &mut GameState) {
    state.player.jaunt.armed = false;
}

/// Teleports the player to `target`, clamped to the grid, and spends a
/// charge. Jaunting out of melee drops every engagement.
///
/// # Errors
///
/// [`AbilityError::NotArmed`] or [`AbilityError::NoCharges`].
pub fn execute_jaunt(
    state: &mut GameState,
    config: &GameConfig,
    target: Position,
) -> Result<Position, AbilityError> {
    if state.is_game_over() {
        return Err(AbilityError::PlayerDead);
    }
    if !state.player.jaunt.armed {
        return Err(AbilityError::NotArmed);
    }
    if state.player.jaunt.charges == 0 {
        return Err(AbilityError::NoCharges(Ability::Jaunt));
    }

    let landing = state.world.grid.clamp(target);
    let jaunt = &mut state.player.jaunt;
    jaunt.charges -= 1;
    jaunt.armed = false;
    state.player.position = landing;
    state.ui.push_teleport_flash(landing);
    tracing::debug!(%landing, charges = state.player.jaunt.charges, "jaunt executed");

    if state.combat.is_engaged() || state.monsters.iter().any(|m| !m.state.is_roaming()) {
        combat::disengage(state, config);
    }
    Ok(landing)
}

/// Recharges one step; a full jaunt keeps its progress as is.
pub fn tick_jaunt(state: &mut GameState, config: &GameConfig) {
    if !state.player.has_unlocked(Ability::Jaunt) {
        return;
    }
    let jaunt = &mut state.player.jaunt;
    recharge(
        &mut jaunt.charges,
        &mut jaunt.progress,
        config.jaunt_max_charges,
        config.jaunt_recharge_turns,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Monster, MonsterState, Unlocks};

    fn unlocked(config: &GameConfig) -> GameState {
        let mut state = GameState::new(config, 1);
        state.player.unlocks = Unlocks::JAUNT;
        state
    }

    #[test]
    fn jaunt_is_clamped_to_the_grid() {
        let config = GameConfig::with_grid(500, 500);
        let mut state = unlocked(&config);
        assert_eq!(state.player.jaunt.charges, 3);

        assert_eq!(arm_jaunt(&mut state), Ok(true));
        let landing = execute_jaunt(&mut state, &config, Position::new(600, 600)).unwrap();

        assert_eq!(landing, Position::new(499, 499));
        assert_eq!(state.player.position, landing);
        assert_eq!(state.player.jaunt.charges, 2);
        assert!(!state.player.jaunt.armed);
        assert_eq!(state.ui.teleport_flashes.len(), 1);
        assert_eq!(state.ui.teleport_flashes[0].position, landing);
    }

    #[test]
    fn arming_twice_disarms_for_free() {
        let config = GameConfig::default();
        let mut state = unlocked(&config);
        assert_eq!(arm_jaunt(&mut state), Ok(true));
        assert_eq!(arm_jaunt(&mut state), Ok(false));
        assert_eq!(state.player.jaunt.charges, config.jaunt_max_charges);
        assert_eq!(
            execute_jaunt(&mut state, &config, Position::new(1, 1)),
            Err(AbilityError::NotArmed)
        );
    }

    #[test]
    fn empty_or_locked_jaunt_cannot_arm() {
        let config = GameConfig::default();
        let mut state = GameState::new(&config, 1);
        assert_eq!(arm_jaunt(&mut state), Err(AbilityError::Locked(Ability::Jaunt)));

        state.player.unlocks = Unlocks::JAUNT;
        state.player.jaunt.charges = 0;
        assert_eq!(arm_jaunt(&mut state), Err(AbilityError::NoCharges(Ability::Jaunt)));
    }

    #[test]
    fn jaunting_out_of_melee_disengages() {
        let config = GameConfig::default();
        let mut state = unlocked(&config);
        state.player.position = Position::new(50, 50);
        let id = state.allocate_entity_id();
        state.monsters.insert(Monster {
            id,
            hp: 10,
            max_hp: 10,
            position: Position::new(51, 51),
            ..Monster::default()
        });
        combat::engage(&mut state, &config, id);
        assert!(state.combat.is_engaged());

        arm_jaunt(&mut state).unwrap();
        execute_jaunt(&mut state, &config, Position::new(80, 80)).unwrap();

        assert!(!state.combat.is_engaged());
        assert_eq!(state.monsters.get(id).unwrap().state, MonsterState::Roaming);
    }

    #[test]
    fn recharge_stops_at_max() {
        let config = GameConfig::default();
        let mut state = unlocked(&config);
        state.player.jaunt.charges = config.jaunt_max_charges - 1;
        for _ in 0..config.jaunt_recharge_turns {
            tick_jaunt(&mut state, &config);
        }
        assert_eq!(state.player.jaunt.charges, config.jaunt_max_charges);
        assert_eq!(state.player.jaunt.progress, 0);

        for _ in 0..config.jaunt_recharge_turns * 2 {
            tick_jaunt(&mut state, &config);
        }
        assert_eq!(state.player.jaunt.charges, config.jaunt_max_charges);
    }
}
