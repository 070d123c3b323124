use super::{Footprint, GridSize, ItemId, Position};
use crate::effect::Effect;

/// Stable identifier of a placed world object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectId(pub u32);

/// Hydrated scenery object (statue, pool, altar, ...).
///
/// Solid objects block movement. Non-solid objects with effects trigger when
/// the player enters a covered cell, at most once per `cooldown_turns`.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WorldObject {
    pub id: ObjectId,
    pub template: String,
    pub name: String,
    pub image: String,
    pub position: Position,
    pub footprint: Footprint,
    pub solid: bool,
    pub effects: Vec<Effect>,
    pub cooldown_turns: u32,
    /// `move_count` at which the effects last fired.
    pub last_triggered: Option<u64>,
}

impl WorldObject {
    pub fn covers(&self, cell: Position) -> bool {
        self.footprint.covers(self.position, cell)
    }

    pub fn is_ready(&self, move_count: u64) -> bool {
        match self.last_triggered {
            None => true,
            Some(at) => move_count >= at + u64::from(self.cooldown_turns),
        }
    }
}

/// What a ground item turns into once picked up.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum GroundItemKind {
    Consumable { effects: Vec<Effect> },
    Weapon { weapon: String },
}

impl Default for GroundItemKind {
    fn default() -> Self {
        Self::Consumable {
            effects: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GroundItem {
    pub id: ItemId,
    pub template: String,
    pub name: String,
    pub position: Position,
    pub kind: GroundItemKind,
}

/// Level geometry and placed scenery.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WorldState {
    pub level: String,
    pub grid: GridSize,
    pub player_spawn: Position,
    /// Self-heal period in turns; 0 disables regeneration.
    pub turns_per_hit_point: u32,
    pub objects: Vec<WorldObject>,
    pub items: Vec<GroundItem>,
    next_item_id: u32,
}

impl WorldState {
    pub fn new(grid: GridSize, player_spawn: Position) -> Self {
        Self {
            grid,
            player_spawn,
            ..Self::default()
        }
    }

    pub fn allocate_item_id(&mut self) -> ItemId {
        self.next_item_id += 1;
        ItemId(self.next_item_id)
    }

    pub fn solid_object_at(&self, cell: Position) -> Option<&WorldObject> {
        self.objects.iter().find(|o| o.solid && o.covers(cell))
    }
}
