//! Melee engagement bookkeeping and the ranged targeting sub-mode.

use std::collections::VecDeque;

use arrayvec::ArrayVec;

use super::types::EntityId;
use crate::combat::AttackOutcome;
use crate::config::GameConfig;

/// A participant in the melee turn order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Combatant {
    #[default]
    Player,
    Monster(EntityId),
}

impl Combatant {
    pub const fn monster_id(self) -> Option<EntityId> {
        match self {
            Self::Player => None,
            Self::Monster(id) => Some(id),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CombatPhase {
    #[default]
    Idle,
    Engaged,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SkipReason {
    /// The player is hidden; the monster cannot find them.
    Hidden,
    Stunned,
}

/// Entry of the bounded combat log the HUD reads.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "event", rename_all = "snake_case"))]
pub enum CombatEvent {
    Started,
    Ended,
    Engaged {
        monster: EntityId,
        slot: u8,
    },
    Queued {
        monster: EntityId,
    },
    Promoted {
        monster: EntityId,
        slot: u8,
    },
    Attack {
        attacker: Combatant,
        target: Combatant,
        roll: u32,
        total: i32,
        outcome: AttackOutcome,
        damage: Option<u32>,
    },
    Skipped {
        monster: EntityId,
        reason: SkipReason,
    },
    Defeated {
        monster: EntityId,
        name: String,
    },
    PlayerDefeated {
        killer: String,
    },
}

/// Melee combat state: Idle ↔ Engaged.
///
/// `turn_order` is always `[player, ...slot occupants in join order]` while
/// engaged and empty while idle.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatState {
    pub phase: CombatPhase,
    pub turn_order: ArrayVec<Combatant, { GameConfig::TURN_ORDER_LEN }>,
    pub current: Combatant,
    pub log: VecDeque<CombatEvent>,
}

impl CombatState {
    pub fn is_engaged(&self) -> bool {
        self.phase == CombatPhase::Engaged
    }

    /// Appends to the log, dropping the oldest entries beyond `capacity`.
    pub fn record(&mut self, event: CombatEvent, capacity: usize) {
        self.log.push_back(event);
        while self.log.len() > capacity.max(1) {
            self.log.pop_front();
        }
    }

    /// Returns to Idle without touching the log.
    pub fn reset(&mut self) {
        self.phase = CombatPhase::Idle;
        self.turn_order.clear();
        self.current = Combatant::Player;
    }
}

/// Identifier of a projectile in flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImpactId(pub u64);

/// A committed ranged attack awaiting resolution by the host.
///
/// The roll happens at commit time; resolution only applies the outcome.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PendingImpact {
    pub id: ImpactId,
    pub target: EntityId,
    pub weapon: String,
    pub outcome: AttackOutcome,
    pub damage: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RangedState {
    pub active: bool,
    pub target: Option<EntityId>,
    pub in_flight: Vec<PendingImpact>,
    next_impact: u64,
}

impl RangedState {
    pub fn allocate_impact_id(&mut self) -> ImpactId {
        self.next_impact += 1;
        ImpactId(self.next_impact)
    }

    /// Leaves targeting mode; projectiles already in flight keep flying.
    pub fn deactivate(&mut self) {
        self.active = false;
        self.target = None;
    }
}
