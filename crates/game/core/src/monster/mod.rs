//! Monster lifecycle outside of melee: spawning, approach and engagement.

mod movement;
mod spawn;

pub use movement::{direction_toward, movement_pass};
pub use spawn::{SpawnBand, find_spawn_position, spawn_check, spawn_near};
