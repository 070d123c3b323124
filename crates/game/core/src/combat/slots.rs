//! Attack-slot lifecycle: engagement, removal, FIFO promotion, turn order.

use crate::config::GameConfig;
use crate::state::{
    CombatEvent, CombatPhase, Combatant, EntityId, GameState, Monster, MonsterState, Position,
};

/// Where an adjacent monster ended up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Engagement {
    Slotted(u8),
    Queued,
}

/// Cell of attack slot `slot` around the player.
pub fn slot_position(player: Position, slot: u8) -> Position {
    let (d_row, d_col) = GameConfig::SLOT_OFFSETS[usize::from(slot) % GameConfig::ATTACK_SLOTS];
    player.offset(d_row, d_col)
}

/// Lowest slot index that is unclaimed, on the grid, and not physically
/// occupied by anything other than `claimant`.
pub fn free_slot(state: &GameState, config: &GameConfig, claimant: EntityId) -> Option<u8> {
    if state.monsters.slot_count() >= config.attacker_cap() {
        return None;
    }
    let claimed = state.monsters.claimed_slots();
    (0..GameConfig::ATTACK_SLOTS as u8)
        .filter(|slot| !claimed.contains(slot))
        .find(|slot| {
            let cell = slot_position(state.player.position, *slot);
            state.world.grid.contains(cell)
                && state.world.solid_object_at(cell).is_none()
                && !state
                    .monsters
                    .iter()
                    .any(|m| m.id != claimant && m.footprint.covers(m.position, cell))
        })
}

/// Claims a slot for an adjacent monster or queues it.
///
/// A slotted monster is relocated onto the slot cell and combat begins if it
/// was idle.
pub fn engage(state: &mut GameState, config: &GameConfig, id: EntityId) -> Option<Engagement> {
    if !state.monsters.contains(id) {
        return None;
    }
    let ticket = state.monsters.issue_ticket();
    let engagement = match free_slot(state, config, id) {
        Some(slot) => {
            let cell = slot_position(state.player.position, slot);
            let monster = state.monsters.get_mut(id)?;
            monster.position = cell;
            monster.state = MonsterState::InSlot { slot, ticket };
            tracing::debug!(monster = %id, slot, "monster claimed attack slot");
            state
                .combat
                .record(CombatEvent::Engaged { monster: id, slot }, config.combat_log_capacity);
            Engagement::Slotted(slot)
        }
        None => {
            let monster = state.monsters.get_mut(id)?;
            monster.state = MonsterState::Waiting { ticket };
            tracing::debug!(monster = %id, "attack slots full, monster queued");
            state
                .combat
                .record(CombatEvent::Queued { monster: id }, config.combat_log_capacity);
            Engagement::Queued
        }
    };

    if !state.combat.is_engaged() && state.monsters.slot_count() > 0 {
        begin_combat(state, config);
    }
    rebuild_turn_order(state);
    Some(engagement)
}

/// Inserts a freshly hydrated monster.
///
/// Authored slot or queue membership is not trusted: such a monster joins as
/// roaming and then engages, so the attacker cap, slot uniqueness and turn
/// order hold. Snapshot restores bypass this and keep combat state as saved.
pub fn admit(state: &mut GameState, config: &GameConfig, mut monster: Monster) -> EntityId {
    let id = monster.id;
    let wants_combat = !monster.state.is_roaming();
    monster.state = MonsterState::Roaming;
    state.insert_monster(monster);
    if wants_combat && !state.is_game_over() {
        engage(state, config, id);
    }
    id
}

/// Idle → Engaged. Entering melee drops the ranged sub-mode.
pub fn begin_combat(state: &mut GameState, config: &GameConfig) {
    tracing::info!(move_count = state.turn.move_count, "combat started");
    state.combat.phase = CombatPhase::Engaged;
    state.combat.current = Combatant::Player;
    state.ranged.deactivate();
    state
        .combat
        .record(CombatEvent::Started, config.combat_log_capacity);
}

/// Engaged → Idle. Ranged mode survives only if monsters remain to shoot at.
pub fn end_combat(state: &mut GameState, config: &GameConfig) {
    tracing::info!(kills = state.run.monsters_killed, "combat ended");
    state.combat.reset();
    if state.monsters.is_empty() {
        state.ranged.deactivate();
    }
    state
        .combat
        .record(CombatEvent::Ended, config.combat_log_capacity);
}

/// Rebuilds `[player, ...slot occupants]` and keeps the pointer on its
/// combatant when that combatant is still in the order.
pub fn rebuild_turn_order(state: &mut GameState) {
    if !state.combat.is_engaged() {
        state.combat.turn_order.clear();
        state.combat.current = Combatant::Player;
        return;
    }
    let order = std::iter::once(Combatant::Player)
        .chain(
            state
                .monsters
                .slot_occupants()
                .into_iter()
                .map(Combatant::Monster),
        )
        .collect();
    state.combat.turn_order = order;
    if !state.combat.turn_order.contains(&state.combat.current) {
        state.combat.current = Combatant::Player;
    }
}

/// Next living attacker after `after` in turn order, or the player.
pub fn next_combatant(state: &GameState, after: Combatant) -> Combatant {
    let order = &state.combat.turn_order;
    let start = order.iter().position(|c| *c == after).map_or(0, |i| i + 1);
    order[start.min(order.len())..]
        .iter()
        .copied()
        .find(|c| match c {
            Combatant::Player => false,
            Combatant::Monster(id) => state.monsters.get(*id).is_some_and(Monster::is_alive),
        })
        .unwrap_or(Combatant::Player)
}

/// Removes one monster from the arena with full bookkeeping.
///
/// `killed` credits the kill counter. A matching ranged target is cleared and
/// the turn order rebuilt when the monster held a slot.
pub fn remove_monster(
    state: &mut GameState,
    config: &GameConfig,
    id: EntityId,
    killed: bool,
) -> Option<Monster> {
    let monster = state.monsters.remove(id)?;
    if killed {
        state.run.monsters_killed += 1;
        tracing::info!(monster = %id, name = %monster.name, "monster defeated");
        state.combat.record(
            CombatEvent::Defeated {
                monster: id,
                name: monster.name.clone(),
            },
            config.combat_log_capacity,
        );
    }
    if state.ranged.target == Some(id) {
        state.ranged.target = None;
    }
    if monster.in_slot() {
        if state.combat.current == Combatant::Monster(id) {
            state.combat.current = next_combatant(state, Combatant::Monster(id));
        }
        rebuild_turn_order(state);
    }
    Some(monster)
}

/// Removes every slot occupant at 0 HP. Returns the removed ids.
pub fn remove_defeated(state: &mut GameState, config: &GameConfig) -> Vec<EntityId> {
    let defeated: Vec<EntityId> = state
        .monsters
        .iter()
        .filter(|m| m.in_slot() && !m.is_alive())
        .map(|m| m.id)
        .collect();
    for id in &defeated {
        remove_monster(state, config, *id, true);
    }
    defeated
}

/// Moves queued monsters into free slots, oldest first, up to the cap.
pub fn promote_waiting(state: &mut GameState, config: &GameConfig) -> usize {
    let mut promoted = 0;
    for id in state.monsters.waiting_queue() {
        let Some(slot) = free_slot(state, config, id) else {
            break;
        };
        let cell = slot_position(state.player.position, slot);
        let ticket = state.monsters.issue_ticket();
        if let Some(monster) = state.monsters.get_mut(id) {
            monster.position = cell;
            monster.state = MonsterState::InSlot { slot, ticket };
            promoted += 1;
            tracing::debug!(monster = %id, slot, "waiting monster promoted");
            state
                .combat
                .record(CombatEvent::Promoted { monster: id, slot }, config.combat_log_capacity);
        }
    }
    if promoted > 0 {
        rebuild_turn_order(state);
    }
    promoted
}

/// Promotes the queue and leaves combat when no attacker remains.
pub fn settle(state: &mut GameState, config: &GameConfig) {
    if !state.combat.is_engaged() {
        return;
    }
    promote_waiting(state, config);
    if state.monsters.slot_count() == 0 {
        // Nothing could be promoted, so nobody is left waiting either.
        state.monsters.release_all();
        end_combat(state, config);
    }
}

/// Drops every engagement, e.g. after the player teleports away.
pub fn disengage(state: &mut GameState, config: &GameConfig) {
    state.monsters.release_all();
    if state.combat.is_engaged() {
        end_combat(state, config);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with_player_at(row: i32, col: i32) -> (GameState, GameConfig) {
        let config = GameConfig::default();
        let mut state = GameState::new(&config, 1);
        state.player.position = Position::new(row, col);
        (state, config)
    }

    fn add(state: &mut GameState, position: Position) -> EntityId {
        let id = state.allocate_entity_id();
        state.monsters.insert(Monster {
            id,
            name: "abhuman".into(),
            hp: 12,
            max_hp: 12,
            position,
            ..Monster::default()
        });
        id
    }

    #[test]
    fn fifth_adjacent_monster_is_queued() {
        let (mut state, config) = state_with_player_at(50, 50);
        let ids: Vec<_> = (0..5)
            .map(|i| add(&mut state, Position::new(50 + i, 51)))
            .collect();
        let results: Vec<_> = ids
            .iter()
            .map(|id| engage(&mut state, &config, *id).unwrap())
            .collect();

        assert_eq!(
            &results[..4],
            &[
                Engagement::Slotted(0),
                Engagement::Slotted(1),
                Engagement::Slotted(2),
                Engagement::Slotted(3)
            ]
        );
        assert_eq!(results[4], Engagement::Queued);
        assert!(state.combat.is_engaged());
        assert_eq!(state.combat.turn_order.len(), 5);
        assert_eq!(state.combat.turn_order[0], Combatant::Player);
        assert_eq!(
            state.monsters.get(ids[0]).unwrap().position,
            Position::new(49, 49)
        );
    }

    #[test]
    fn removal_promotes_the_oldest_waiting_monster() {
        let (mut state, config) = state_with_player_at(50, 50);
        let ids: Vec<_> = (0..6)
            .map(|i| add(&mut state, Position::new(40 + i, 60)))
            .collect();
        for id in &ids {
            engage(&mut state, &config, *id);
        }
        state.monsters.get_mut(ids[1]).unwrap().hp = 0;

        let removed = remove_defeated(&mut state, &config);
        settle(&mut state, &config);

        assert_eq!(removed, vec![ids[1]]);
        assert_eq!(state.run.monsters_killed, 1);
        assert_eq!(state.monsters.get(ids[4]).unwrap().state.slot(), Some(1));
        assert!(state.monsters.get(ids[5]).unwrap().state.is_waiting());
        assert_eq!(state.monsters.slot_count(), 4);
    }

    #[test]
    fn combat_ends_when_the_last_attacker_falls() {
        let (mut state, config) = state_with_player_at(50, 50);
        let id = add(&mut state, Position::new(51, 50));
        engage(&mut state, &config, id);
        state.ranged.active = true;

        state.monsters.get_mut(id).unwrap().hp = 0;
        remove_defeated(&mut state, &config);
        settle(&mut state, &config);

        assert!(!state.combat.is_engaged());
        assert!(state.combat.turn_order.is_empty());
        assert!(!state.ranged.active);
    }

    #[test]
    fn authored_slot_membership_goes_through_engagement() {
        let (mut state, config) = state_with_player_at(100, 100);
        let ids: Vec<_> = (0..5u32)
            .map(|i| {
                let monster = Monster {
                    id: EntityId(10 + i),
                    hp: 12,
                    max_hp: 12,
                    position: Position::new(150, 150),
                    state: MonsterState::InSlot { slot: 0, ticket: u64::from(i) },
                    ..Monster::default()
                };
                admit(&mut state, &config, monster)
            })
            .collect();

        assert!(state.combat.is_engaged());
        assert_eq!(state.monsters.slot_count(), 4);
        assert_eq!(state.monsters.claimed_slots().as_slice(), &[0, 1, 2, 3]);
        assert_eq!(state.combat.turn_order.len(), 5);
        assert_eq!(state.monsters.waiting_queue(), vec![ids[4]]);
        assert_eq!(
            state.monsters.get(ids[0]).unwrap().position,
            slot_position(state.player.position, 0)
        );

        let roamer = Monster {
            id: EntityId(30),
            position: Position::new(150, 150),
            ..Monster::default()
        };
        admit(&mut state, &config, roamer);
        assert!(state.monsters.get(EntityId(30)).unwrap().state.is_roaming());
    }

    #[test]
    fn slots_off_the_grid_are_skipped() {
        let (mut state, config) = state_with_player_at(0, 0);
        let id = add(&mut state, Position::new(1, 0));
        assert_eq!(engage(&mut state, &config, id), Some(Engagement::Slotted(3)));
        assert_eq!(state.monsters.get(id).unwrap().position, Position::new(1, 1));
    }
}
