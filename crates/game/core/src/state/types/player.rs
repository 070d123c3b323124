use bitflags::bitflags;

use super::{Attributes, Position};
use crate::config::GameConfig;
use crate::effect::Effect;

bitflags! {
    /// Abilities the player has unlocked during the run.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Unlocks: u8 {
        const HIDE  = 1 << 0;
        const JAUNT = 1 << 1;
    }
}

/// Unlockable, charge-driven player abilities.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Ability {
    Hide,
    Jaunt,
}

impl Ability {
    pub const fn flag(self) -> Unlocks {
        match self {
            Self::Hide => Unlocks::HIDE,
            Self::Jaunt => Unlocks::JAUNT,
        }
    }
}

/// Hide ability charge machine: Inactive ↔ Active.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HideState {
    pub active: bool,
    /// Turns of concealment left, within `[0, hide_max_charges]`.
    pub charges: u32,
    /// Turns accumulated toward the next charge while inactive.
    pub progress: u32,
}

/// Jaunt (short-range teleport) charge machine: Idle → Armed → Idle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct JauntState {
    pub armed: bool,
    pub charges: u32,
    pub progress: u32,
}

/// Concealment granted by a `hide` effect, independent from the Hide ability.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Cloak {
    #[default]
    None,
    Indefinite,
    Turns(u32),
}

impl Cloak {
    pub const fn is_active(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// Counts a timed cloak down by one turn.
    pub fn tick(&mut self) {
        if let Self::Turns(left) = self {
            *left = left.saturating_sub(1);
            if *left == 0 {
                *self = Self::None;
            }
        }
    }
}

/// Handle of an item carried in the inventory or lying on the ground.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemId(pub u32);

/// Consumable carried by the player.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct InventoryItem {
    pub id: ItemId,
    pub template: String,
    pub name: String,
    pub effects: Vec<Effect>,
}

/// The player's runtime record.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlayerState {
    pub position: Position,
    pub hp: u32,
    pub max_hp: u32,
    pub attack: i32,
    pub ac: i32,
    pub initiative: i32,
    pub attributes: Attributes,

    pub weapons: Vec<String>,
    pub equipped_weapon: Option<String>,
    pub ranged_weapons: Vec<String>,
    pub equipped_ranged: Option<String>,
    pub inventory: Vec<InventoryItem>,

    pub unlocks: Unlocks,
    pub hide: HideState,
    pub jaunt: JauntState,
    pub cloak: Cloak,
    /// Turns accumulated toward the next self-heal point.
    pub regen_progress: u32,
}

impl PlayerState {
    /// Fresh player at `spawn`, stats and starting kit taken from `config`.
    pub fn new(config: &GameConfig, spawn: Position) -> Self {
        let weapons: Vec<String> = config.default_weapon.iter().cloned().collect();
        Self {
            position: spawn,
            hp: config.player_max_hp,
            max_hp: config.player_max_hp,
            attack: config.player_attack,
            ac: config.player_ac,
            initiative: config.player_initiative,
            attributes: Attributes::baseline(),
            equipped_weapon: weapons.first().cloned(),
            weapons,
            ranged_weapons: Vec::new(),
            equipped_ranged: None,
            inventory: Vec::new(),
            unlocks: Unlocks::empty(),
            hide: HideState {
                active: false,
                charges: config.hide_max_charges,
                progress: 0,
            },
            jaunt: JauntState {
                armed: false,
                charges: config.jaunt_max_charges,
                progress: 0,
            },
            cloak: Cloak::None,
            regen_progress: 0,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Hidden from monsters, either by the Hide ability or by a cloak effect.
    pub fn is_hidden(&self) -> bool {
        self.hide.active || self.cloak.is_active()
    }

    pub fn has_unlocked(&self, ability: Ability) -> bool {
        self.unlocks.contains(ability.flag())
    }

    /// Applies damage with a floor of 0 and returns the amount actually removed.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let before = self.hp;
        self.hp = self.hp.saturating_sub(amount);
        before - self.hp
    }

    /// Restores HP up to the maximum and returns the amount actually healed.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let before = self.hp;
        self.hp = self.hp.saturating_add(amount).min(self.max_hp);
        self.hp - before
    }
}

impl Default for PlayerState {
    fn default() -> Self {
        let config = GameConfig::default();
        Self::new(&config, config.player_spawn)
    }
}
