//! Single owner of every live monster, addressed by stable id.
//!
//! The roaming set, the waiting queue and the attack slots are views derived
//! from each monster's [`MonsterState`]; there is exactly one copy of each
//! monster, so the three can never disagree.

use std::collections::BTreeMap;

use arrayvec::ArrayVec;

use super::types::{EntityId, Monster, MonsterState};
use crate::config::GameConfig;

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "ArenaRecord", into = "ArenaRecord"))]
pub struct MonsterArena {
    monsters: BTreeMap<EntityId, Monster>,
    next_ticket: u64,
}

/// Serialized shape of the arena: a plain list, keys rebuilt on load.
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize, Default)]
#[serde(default)]
struct ArenaRecord {
    monsters: Vec<Monster>,
    next_ticket: u64,
}

#[cfg(feature = "serde")]
impl From<ArenaRecord> for MonsterArena {
    fn from(record: ArenaRecord) -> Self {
        let monsters = record.monsters.into_iter().map(|m| (m.id, m)).collect();
        Self {
            monsters,
            next_ticket: record.next_ticket,
        }
    }
}

#[cfg(feature = "serde")]
impl From<MonsterArena> for ArenaRecord {
    fn from(arena: MonsterArena) -> Self {
        Self {
            monsters: arena.monsters.into_values().collect(),
            next_ticket: arena.next_ticket,
        }
    }
}

impl Default for MonsterArena {
    fn default() -> Self {
        Self::new()
    }
}

impl MonsterArena {
    pub fn new() -> Self {
        Self {
            monsters: BTreeMap::new(),
            next_ticket: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.monsters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monsters.is_empty()
    }

    pub fn get(&self, id: EntityId) -> Option<&Monster> {
        self.monsters.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Monster> {
        self.monsters.get_mut(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.monsters.contains_key(&id)
    }

    /// Inserts a monster under its own id, replacing any previous entry.
    pub fn insert(&mut self, monster: Monster) -> Option<Monster> {
        self.monsters.insert(monster.id, monster)
    }

    pub fn remove(&mut self, id: EntityId) -> Option<Monster> {
        self.monsters.remove(&id)
    }

    pub fn clear(&mut self) {
        self.monsters.clear();
    }

    /// Arena entries in ascending key order.
    pub fn entries(&self) -> impl Iterator<Item = (EntityId, &Monster)> {
        self.monsters.iter().map(|(id, m)| (*id, m))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Monster> {
        self.monsters.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Monster> {
        self.monsters.values_mut()
    }

    pub fn ids(&self) -> Vec<EntityId> {
        self.monsters.keys().copied().collect()
    }

    /// Number of live instances hydrated from `template`.
    pub fn count_template(&self, template: &str) -> usize {
        self.monsters
            .values()
            .filter(|m| m.template == template)
            .count()
    }

    /// Hands out the next FIFO ticket.
    pub fn issue_ticket(&mut self) -> u64 {
        self.next_ticket += 1;
        self.next_ticket
    }

    /// Attack-slot occupants in join order.
    pub fn slot_occupants(&self) -> ArrayVec<EntityId, { GameConfig::ATTACK_SLOTS }> {
        let mut engaged: Vec<(u64, EntityId)> = self
            .monsters
            .values()
            .filter_map(|m| match m.state {
                MonsterState::InSlot { ticket, .. } => Some((ticket, m.id)),
                _ => None,
            })
            .collect();
        engaged.sort_unstable();
        engaged
            .into_iter()
            .map(|(_, id)| id)
            .take(GameConfig::ATTACK_SLOTS)
            .collect()
    }

    /// Waiting queue, oldest ticket first.
    pub fn waiting_queue(&self) -> Vec<EntityId> {
        let mut waiting: Vec<(u64, EntityId)> = self
            .monsters
            .values()
            .filter_map(|m| match m.state {
                MonsterState::Waiting { ticket } => Some((ticket, m.id)),
                _ => None,
            })
            .collect();
        waiting.sort_unstable();
        waiting.into_iter().map(|(_, id)| id).collect()
    }

    pub fn slot_count(&self) -> usize {
        self.monsters.values().filter(|m| m.in_slot()).count()
    }

    /// Slot indices currently claimed by a monster.
    pub fn claimed_slots(&self) -> ArrayVec<u8, { GameConfig::ATTACK_SLOTS }> {
        let mut claimed: ArrayVec<u8, { GameConfig::ATTACK_SLOTS }> = ArrayVec::new();
        for slot in self.monsters.values().filter_map(|m| m.state.slot()) {
            if !claimed.contains(&slot) && !claimed.is_full() {
                claimed.push(slot);
            }
        }
        claimed
    }

    /// Returns every engaged or queued monster to roaming.
    pub fn release_all(&mut self) {
        for monster in self.monsters.values_mut() {
            monster.state = MonsterState::Roaming;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monster(id: u32, state: MonsterState) -> Monster {
        Monster {
            id: EntityId(id),
            template: "abhuman".into(),
            state,
            ..Monster::default()
        }
    }

    #[test]
    fn views_follow_ticket_order() {
        let mut arena = MonsterArena::new();
        arena.insert(monster(1, MonsterState::InSlot { slot: 2, ticket: 7 }));
        arena.insert(monster(2, MonsterState::InSlot { slot: 0, ticket: 3 }));
        arena.insert(monster(3, MonsterState::Waiting { ticket: 9 }));
        arena.insert(monster(4, MonsterState::Waiting { ticket: 4 }));
        arena.insert(monster(5, MonsterState::Roaming));

        assert_eq!(arena.slot_occupants().as_slice(), &[EntityId(2), EntityId(1)]);
        assert_eq!(arena.waiting_queue(), vec![EntityId(4), EntityId(3)]);
        assert_eq!(arena.claimed_slots().len(), 2);
        assert_eq!(arena.count_template("abhuman"), 5);
    }

    #[test]
    fn release_all_returns_everyone_to_roaming() {
        let mut arena = MonsterArena::new();
        arena.insert(monster(1, MonsterState::InSlot { slot: 0, ticket: 1 }));
        arena.insert(monster(2, MonsterState::Waiting { ticket: 2 }));
        arena.release_all();
        assert!(arena.iter().all(|m| m.state.is_roaming()));
    }
}
