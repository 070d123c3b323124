mod attributes;
mod common;
mod monster;
mod player;
mod world;

pub use attributes::Attributes;
pub use common::{Direction, EntityId, Footprint, GridSize, Position};
pub use monster::{Monster, MonsterState};
pub use player::{
    Ability, Cloak, HideState, InventoryItem, ItemId, JauntState, PlayerState, Unlocks,
};
pub use world::{GroundItem, GroundItemKind, ObjectId, WorldObject, WorldState};
