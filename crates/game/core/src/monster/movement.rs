//! Out-of-combat approach AI and engagement.

use strum::IntoEnumIterator;

use crate::combat::{self, Engagement};
use crate::env::GameEnv;
use crate::spatial::{SpatialEntity, SpatialGrid, SpatialKey};
use crate::state::{Direction, EntityId, Footprint, GameState, Position};

/// Moves every roaming monster toward the player, in ascending id order.
///
/// Monsters in a slot or in the waiting queue are left alone: combat owns
/// their positions. Returns the ids that engaged (slotted or queued).
pub fn movement_pass(state: &mut GameState, env: &GameEnv<'_>) -> Vec<EntityId> {
    if state.is_game_over() {
        return Vec::new();
    }
    if !state.combat.is_engaged() {
        // A queue only means something while a fight is on.
        state.monsters.release_all();
    }
    let mut grid = SpatialGrid::build(state, env.config().spatial_cell_size);

    let roaming: Vec<EntityId> = state
        .monsters
        .entries()
        .filter(|(_, m)| m.state.is_roaming())
        .filter_map(|(key, m)| {
            if !key.is_assignable() || m.id != key {
                tracing::warn!(key = %key, id = %m.id, "skipping monster without a stable id");
                return None;
            }
            Some(key)
        })
        .collect();

    let mut engaged = Vec::new();
    for id in roaming {
        if advance_monster(state, env, &mut grid, id).is_some() {
            engaged.push(id);
        }
    }
    engaged
}

/// Walks one monster up to its move rate; engages on adjacency.
fn advance_monster(
    state: &mut GameState,
    env: &GameEnv<'_>,
    grid: &mut SpatialGrid,
    id: EntityId,
) -> Option<Engagement> {
    let monster = state.monsters.get_mut(id)?;
    if monster.consume_stun() {
        return None;
    }
    let move_rate = monster.move_rate;
    let player = state.player.position;

    for _ in 0..move_rate {
        let current = state.monsters.get(id)?.position;
        if current.is_adjacent(player) {
            return engage(state, env, grid, id);
        }
        let next = choose_step(state, grid, id, current, player)?;
        let monster = state.monsters.get_mut(id)?;
        monster.position = next;
        reindex(grid, monster.id, next, monster.footprint);
    }

    let current = state.monsters.get(id)?.position;
    if current.is_adjacent(player) {
        return engage(state, env, grid, id);
    }
    None
}

fn engage(
    state: &mut GameState,
    env: &GameEnv<'_>,
    grid: &mut SpatialGrid,
    id: EntityId,
) -> Option<Engagement> {
    let engagement = combat::engage(state, env.config(), id)?;
    let monster = state.monsters.get(id)?;
    reindex(grid, id, monster.position, monster.footprint);
    Some(engagement)
}

fn reindex(grid: &mut SpatialGrid, id: EntityId, origin: Position, footprint: Footprint) {
    grid.insert(SpatialEntity {
        key: SpatialKey::Monster(id),
        origin,
        footprint,
        solid: true,
    });
}

/// Cardinal direction along the axis with the larger distance to close;
/// ties go to the row axis.
pub fn direction_toward(from: Position, to: Position) -> Option<Direction> {
    let d_row = to.row - from.row;
    let d_col = to.col - from.col;
    if d_row == 0 && d_col == 0 {
        return None;
    }
    let direction = if d_row.abs() >= d_col.abs() {
        if d_row > 0 { Direction::Down } else { Direction::Up }
    } else if d_col > 0 {
        Direction::Right
    } else {
        Direction::Left
    };
    Some(direction)
}

/// Preferred step, or the free orthogonal neighbour closest (Manhattan) to
/// the player when the preferred cell is blocked.
fn choose_step(
    state: &GameState,
    grid: &SpatialGrid,
    id: EntityId,
    current: Position,
    player: Position,
) -> Option<Position> {
    let is_free = |cell: Position| {
        state.world.grid.contains(cell)
            && cell != player
            && !grid.is_blocked(cell, Some(SpatialKey::Monster(id)))
    };

    if let Some(direction) = direction_toward(current, player) {
        let preferred = current.step(direction);
        if is_free(preferred) {
            return Some(preferred);
        }
    }
    Direction::iter()
        .map(|d| current.step(d))
        .filter(|cell| is_free(*cell))
        .min_by_key(|cell| cell.manhattan(player))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::env::{Env, PcgRng, TemplateCatalog};
    use crate::hydration::{MonsterInstance, hydrate_monster};
    use crate::monster::tests::{abhuman, pillar};
    use crate::state::{Combatant, MonsterState, ObjectId};

    fn place(state: &mut GameState, at: Position) -> EntityId {
        let id = state.allocate_entity_id();
        let monster = hydrate_monster(&abhuman(), &MonsterInstance::new("abhuman", at), id);
        state.monsters.insert(monster);
        id
    }

    #[test]
    fn larger_delta_axis_wins_and_ties_go_to_rows() {
        let origin = Position::new(10, 10);
        assert_eq!(direction_toward(origin, Position::new(20, 12)), Some(Direction::Down));
        assert_eq!(direction_toward(origin, Position::new(12, 2)), Some(Direction::Left));
        assert_eq!(direction_toward(origin, Position::new(5, 15)), Some(Direction::Up));
        assert_eq!(direction_toward(origin, origin), None);
    }

    #[test]
    fn roaming_monster_closes_in_by_its_move_rate() {
        let config = GameConfig::default();
        let catalog = TemplateCatalog::new();
        let rng = PcgRng;
        let env = Env::new(&catalog, &rng, &config).into_game_env();
        let mut state = GameState::new(&config, 1);
        state.player.position = Position::new(100, 100);
        let id = place(&mut state, Position::new(110, 100));

        movement_pass(&mut state, &env);
        assert_eq!(state.monsters.get(id).unwrap().position, Position::new(108, 100));
    }

    #[test]
    fn blocked_step_takes_the_closest_free_neighbour() {
        let config = GameConfig::default();
        let catalog = TemplateCatalog::new();
        let rng = PcgRng;
        let env = Env::new(&catalog, &rng, &config).into_game_env();
        let mut state = GameState::new(&config, 1);
        state.player.position = Position::new(100, 100);
        let mut wall = pillar(ObjectId(1), Position::new(109, 100));
        wall.solid = true;
        state.world.objects.push(wall);
        let id = place(&mut state, Position::new(110, 101));
        state.monsters.get_mut(id).unwrap().move_rate = 1;

        // Up to (109, 101) is free: row delta dominates.
        movement_pass(&mut state, &env);
        assert_eq!(state.monsters.get(id).unwrap().position, Position::new(109, 101));

        let blocked = place(&mut state, Position::new(110, 100));
        state.monsters.get_mut(blocked).unwrap().move_rate = 1;
        state.monsters.get_mut(id).unwrap().position = Position::new(120, 120);
        movement_pass(&mut state, &env);
        // Up is the pillar; the other three neighbours tie at distance 11,
        // so Down wins by iteration order.
        assert_eq!(state.monsters.get(blocked).unwrap().position, Position::new(111, 100));
    }

    #[test]
    fn adjacency_claims_a_slot_and_starts_combat() {
        let config = GameConfig::default();
        let catalog = TemplateCatalog::new();
        let rng = PcgRng;
        let env = Env::new(&catalog, &rng, &config).into_game_env();
        let mut state = GameState::new(&config, 1);
        state.player.position = Position::new(100, 100);
        let id = place(&mut state, Position::new(103, 100));

        let engaged = movement_pass(&mut state, &env);

        assert_eq!(engaged, vec![id]);
        let monster = state.monsters.get(id).unwrap();
        assert!(matches!(monster.state, MonsterState::InSlot { slot: 0, .. }));
        assert_eq!(monster.position, Position::new(99, 99));
        assert!(state.combat.is_engaged());
        assert_eq!(
            state.combat.turn_order.as_slice(),
            &[Combatant::Player, Combatant::Monster(id)]
        );
    }

    #[test]
    fn slotted_and_waiting_monsters_are_not_moved() {
        let config = GameConfig::default();
        let catalog = TemplateCatalog::new();
        let rng = PcgRng;
        let env = Env::new(&catalog, &rng, &config).into_game_env();
        let mut state = GameState::new(&config, 1);
        state.player.position = Position::new(100, 100);
        let slotted = place(&mut state, Position::new(101, 100));
        combat::engage(&mut state, &config, slotted);
        let waiting = place(&mut state, Position::new(130, 100));
        state.monsters.get_mut(waiting).unwrap().state = MonsterState::Waiting { ticket: 9 };

        movement_pass(&mut state, &env);
        assert_eq!(state.monsters.get(slotted).unwrap().position, Position::new(99, 99));
        assert_eq!(state.monsters.get(waiting).unwrap().position, Position::new(130, 100));
    }

    #[test]
    fn leftover_queue_roams_again_once_combat_is_over() {
        let config = GameConfig::default();
        let catalog = TemplateCatalog::new();
        let rng = PcgRng;
        let env = Env::new(&catalog, &rng, &config).into_game_env();
        let mut state = GameState::new(&config, 1);
        state.player.position = Position::new(100, 100);
        let id = place(&mut state, Position::new(130, 100));
        state.monsters.get_mut(id).unwrap().state = MonsterState::Waiting { ticket: 1 };

        movement_pass(&mut state, &env);
        let monster = state.monsters.get(id).unwrap();
        assert!(monster.state.is_roaming());
        assert_eq!(monster.position, Position::new(128, 100));
    }

    #[test]
    fn monsters_without_stable_ids_are_skipped() {
        let config = GameConfig::default();
        let catalog = TemplateCatalog::new();
        let rng = PcgRng;
        let env = Env::new(&catalog, &rng, &config).into_game_env();
        let mut state = GameState::new(&config, 1);
        state.player.position = Position::new(100, 100);
        let monster = hydrate_monster(
            &abhuman(),
            &MonsterInstance::new("abhuman", Position::new(120, 100)),
            EntityId::SYSTEM,
        );
        state.monsters.insert(monster);

        assert!(movement_pass(&mut state, &env).is_empty());
        assert_eq!(
            state.monsters.get(EntityId::SYSTEM).unwrap().position,
            Position::new(120, 100)
        );
    }
}
