//! The action vocabulary accepted by the reducer.
//!
//! Actions are plain data: the host serializes them as `{type, payload}`
//! records and the engine routes each one to the slice that owns its
//! [`ActionDomain`].

use crate::hydration::{LevelData, MonsterInstance};
use crate::state::{Ability, Direction, EntityId, GameState, ImpactId, ItemId, Position};

/// Slice of the reducer an action belongs to. Declaration order is the
/// order slices are consulted in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum ActionDomain {
    Lifecycle,
    Movement,
    Combat,
    Monsters,
    Abilities,
    Inventory,
    Interface,
    Unknown,
}

#[derive(Clone, Debug, PartialEq, Eq, strum::IntoStaticStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")
)]
pub enum Action {
    // ===== lifecycle =====
    GameOver {
        message: String,
        killer: String,
    },
    ResetGame,
    /// Replaces the whole state with a previously saved one.
    HydrateSnapshot {
        state: Box<GameState>,
    },
    /// Moves the run onto another level, rehydrating its contents.
    SetLevel {
        level: Box<LevelData>,
    },
    SetSubGameCompleted {
        sub_game: String,
        completed: bool,
    },
    SetWaypointCreated {
        waypoint: String,
    },

    // ===== movement =====
    MovePlayer {
        direction: Direction,
    },
    Wait,

    // ===== combat =====
    CombatStep,
    SetRangedMode {
        active: bool,
    },
    SelectTarget {
        target: Option<EntityId>,
    },
    /// Commits a ranged shot; the roll happens now, damage on impact.
    FireRanged {
        target: EntityId,
    },
    ResolveImpact {
        impact: ImpactId,
    },

    // ===== monsters =====
    SpawnCheck,
    MoveMonsters,
    AddMonster {
        instance: MonsterInstance,
    },
    /// The host reports a monster killed outside the combat step.
    RemoveMonster {
        id: EntityId,
    },

    // ===== abilities =====
    ToggleHide,
    TickHide,
    ArmJaunt,
    CancelJaunt,
    ExecuteJaunt {
        target: Position,
    },
    TickJaunt,
    UnlockAbility {
        ability: Ability,
    },

    // ===== inventory =====
    UseItem {
        item: ItemId,
    },
    DropItem {
        item: ItemId,
    },
    AddWeapon {
        weapon: String,
    },
    EquipWeapon {
        weapon: String,
    },
    DropWeapon {
        weapon: String,
    },
    EquipRangedWeapon {
        weapon: String,
    },

    // ===== interface =====
    ToggleInventory,
    ShowMessage {
        message: String,
    },
    DismissMessage,
    ClearTeleportFlash {
        id: u64,
    },

    /// Any tag this build does not know. Reduces to a logged no-op.
    #[cfg_attr(feature = "serde", serde(other))]
    Unrecognized,
}

impl Action {
    /// Wire name of the action, e.g. `"MOVE_PLAYER"`.
    pub fn name(&self) -> &'static str {
        self.into()
    }

    pub const fn domain(&self) -> ActionDomain {
        match self {
            Self::GameOver { .. }
            | Self::ResetGame
            | Self::HydrateSnapshot { .. }
            | Self::SetLevel { .. }
            | Self::SetSubGameCompleted { .. }
            | Self::SetWaypointCreated { .. } => ActionDomain::Lifecycle,
            Self::MovePlayer { .. } | Self::Wait => ActionDomain::Movement,
            Self::CombatStep
            | Self::SetRangedMode { .. }
            | Self::SelectTarget { .. }
            | Self::FireRanged { .. }
            | Self::ResolveImpact { .. } => ActionDomain::Combat,
            Self::SpawnCheck
            | Self::MoveMonsters
            | Self::AddMonster { .. }
            | Self::RemoveMonster { .. } => ActionDomain::Monsters,
            Self::ToggleHide
            | Self::TickHide
            | Self::ArmJaunt
            | Self::CancelJaunt
            | Self::ExecuteJaunt { .. }
            | Self::TickJaunt
            | Self::UnlockAbility { .. } => ActionDomain::Abilities,
            Self::UseItem { .. }
            | Self::DropItem { .. }
            | Self::AddWeapon { .. }
            | Self::EquipWeapon { .. }
            | Self::DropWeapon { .. }
            | Self::EquipRangedWeapon { .. } => ActionDomain::Inventory,
            Self::ToggleInventory
            | Self::ShowMessage { .. }
            | Self::DismissMessage
            | Self::ClearTeleportFlash { .. } => ActionDomain::Interface,
            Self::Unrecognized => ActionDomain::Unknown,
        }
    }

    /// Actions still accepted after the player died.
    pub const fn survives_death(&self) -> bool {
        matches!(self, Self::ResetGame | Self::HydrateSnapshot { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_use_the_wire_spelling() {
        assert_eq!(Action::MovePlayer { direction: Direction::Up }.name(), "MOVE_PLAYER");
        assert_eq!(Action::EquipRangedWeapon { weapon: "bow".into() }.name(), "EQUIP_RANGED_WEAPON");
        assert_eq!(Action::CombatStep.domain(), ActionDomain::Combat);
        assert_eq!(Action::Unrecognized.domain(), ActionDomain::Unknown);
        let waypoint = Action::SetWaypointCreated { waypoint: "jaunt_cave".into() };
        assert_eq!(waypoint.name(), "SET_WAYPOINT_CREATED");
        assert_eq!(waypoint.domain(), ActionDomain::Lifecycle);
        assert!(!waypoint.survives_death());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn adjacently_tagged_wire_format() {
        let action = Action::ExecuteJaunt {
            target: Position::new(3, 4),
        };
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["type"], "EXECUTE_JAUNT");
        assert_eq!(json["payload"]["target"]["row"], 3);

        let unit: Action = serde_json::from_str(r#"{"type":"COMBAT_STEP"}"#).unwrap();
        assert_eq!(unit, Action::CombatStep);
        let flag: Action = serde_json::from_str(
            r#"{"type":"SET_SUB_GAME_COMPLETED","payload":{"sub_game":"tesseract","completed":true}}"#,
        )
        .unwrap();
        assert_eq!(
            flag,
            Action::SetSubGameCompleted {
                sub_game: "tesseract".into(),
                completed: true
            }
        );
        let unknown: Action = serde_json::from_str(r#"{"type":"OPEN_SHOP"}"#).unwrap();
        assert_eq!(unknown, Action::Unrecognized);
    }
}
