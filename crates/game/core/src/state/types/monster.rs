use super::{Attributes, EntityId, Footprint, Position};

/// Where a monster currently stands relative to melee combat.
///
/// Tickets are handed out by the arena in increasing order and give the FIFO
/// order of the waiting queue and the join order of the attack slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum MonsterState {
    #[default]
    Roaming,
    Waiting {
        ticket: u64,
    },
    InSlot {
        slot: u8,
        ticket: u64,
    },
}

impl MonsterState {
    pub const fn is_roaming(&self) -> bool {
        matches!(self, Self::Roaming)
    }

    pub const fn is_waiting(&self) -> bool {
        matches!(self, Self::Waiting { .. })
    }

    pub const fn slot(&self) -> Option<u8> {
        match self {
            Self::InSlot { slot, .. } => Some(*slot),
            _ => None,
        }
    }

    pub const fn ticket(&self) -> Option<u64> {
        match self {
            Self::Roaming => None,
            Self::Waiting { ticket } | Self::InSlot { ticket, .. } => Some(*ticket),
        }
    }
}

/// A hydrated monster: template stats merged with its runtime instance data.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Monster {
    pub id: EntityId,
    pub template: String,
    pub name: String,
    pub image: String,
    pub position: Position,
    pub hp: u32,
    pub max_hp: u32,
    pub attack: i32,
    pub ac: i32,
    pub move_rate: u32,
    pub initiative: i32,
    pub attributes: Attributes,
    pub footprint: Footprint,
    pub state: MonsterState,
    pub stunned_turns: u32,
}

impl Monster {
    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn in_slot(&self) -> bool {
        self.state.slot().is_some()
    }

    /// Applies damage with a floor of 0 and returns the amount actually removed.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let before = self.hp;
        self.hp = self.hp.saturating_sub(amount);
        before - self.hp
    }

    /// Burns one turn of stun; returns true if the monster was stunned.
    pub fn consume_stun(&mut self) -> bool {
        if self.stunned_turns == 0 {
            return false;
        }
        self.stunned_turns -= 1;
        true
    }
}

impl Default for Monster {
    fn default() -> Self {
        Self {
            id: EntityId::SYSTEM,
            template: String::new(),
            name: String::new(),
            image: String::new(),
            position: Position::ORIGIN,
            hp: 1,
            max_hp: 1,
            attack: 0,
            ac: 10,
            move_rate: 1,
            initiative: 0,
            attributes: Attributes::baseline(),
            footprint: Footprint::SINGLE,
            state: MonsterState::Roaming,
            stunned_turns: 0,
        }
    }
}
