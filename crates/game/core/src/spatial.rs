//! Grid-bucket acceleration structure for proximity and collision queries.
//!
//! The world is partitioned into square buckets of `cell_size` tiles. Each
//! entity is registered in every bucket its footprint overlaps, so a
//! multi-tile object is found from any of the cells it covers. The index is
//! rebuilt from the state at the start of each pass; results are only valid
//! for the turn that produced them.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::state::{EntityId, Footprint, GameState, ObjectId, Position};

/// Identity of an indexed entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SpatialKey {
    Monster(EntityId),
    Object(ObjectId),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpatialEntity {
    pub key: SpatialKey,
    pub origin: Position,
    pub footprint: Footprint,
    /// Whether the entity stops movement into the cells it covers.
    pub solid: bool,
}

impl SpatialEntity {
    pub fn covers(&self, cell: Position) -> bool {
        self.footprint.covers(self.origin, cell)
    }
}

type BucketKey = (i32, i32);

#[derive(Clone, Debug)]
pub struct SpatialGrid {
    cell_size: i32,
    buckets: HashMap<BucketKey, Vec<SpatialKey>>,
    entities: BTreeMap<SpatialKey, SpatialEntity>,
}

impl SpatialGrid {
    pub fn new(cell_size: u32) -> Self {
        Self {
            cell_size: cell_size.max(1) as i32,
            buckets: HashMap::new(),
            entities: BTreeMap::new(),
        }
    }

    /// Indexes every monster (always blocking) and every world object.
    pub fn build(state: &GameState, cell_size: u32) -> Self {
        let mut grid = Self::new(cell_size);
        for monster in state.monsters.iter() {
            grid.insert(SpatialEntity {
                key: SpatialKey::Monster(monster.id),
                origin: monster.position,
                footprint: monster.footprint,
                solid: true,
            });
        }
        for object in &state.world.objects {
            grid.insert(SpatialEntity {
                key: SpatialKey::Object(object.id),
                origin: object.position,
                footprint: object.footprint,
                solid: object.solid,
            });
        }
        grid
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn clear(&mut self) {
        self.buckets.clear();
        self.entities.clear();
    }

    /// Registers `entity` in every bucket its footprint overlaps.
    ///
    /// Re-inserting a key replaces its previous registration.
    pub fn insert(&mut self, entity: SpatialEntity) {
        self.remove(entity.key);
        for bucket in self.buckets_for(entity.origin, entity.footprint) {
            self.buckets.entry(bucket).or_default().push(entity.key);
        }
        self.entities.insert(entity.key, entity);
    }

    pub fn remove(&mut self, key: SpatialKey) -> Option<SpatialEntity> {
        let entity = self.entities.remove(&key)?;
        for bucket in self.buckets_for(entity.origin, entity.footprint) {
            if let Some(keys) = self.buckets.get_mut(&bucket) {
                keys.retain(|k| *k != key);
                if keys.is_empty() {
                    self.buckets.remove(&bucket);
                }
            }
        }
        Some(entity)
    }

    pub fn get(&self, key: SpatialKey) -> Option<&SpatialEntity> {
        self.entities.get(&key)
    }

    /// Entities registered within `radius` buckets of `position`'s bucket,
    /// each reported once, in key order.
    pub fn query_near(&self, position: Position, radius: u32) -> Vec<SpatialEntity> {
        let (center_row, center_col) = self.bucket_of(position);
        let r = radius as i32;
        let mut found = BTreeSet::new();
        for row in center_row - r..=center_row + r {
            for col in center_col - r..=center_col + r {
                if let Some(keys) = self.buckets.get(&(row, col)) {
                    found.extend(keys.iter().copied());
                }
            }
        }
        found
            .into_iter()
            .filter_map(|key| self.entities.get(&key).copied())
            .collect()
    }

    /// Entities whose footprint covers `cell`.
    pub fn occupants(&self, cell: Position) -> Vec<SpatialEntity> {
        self.query_near(cell, 0)
            .into_iter()
            .filter(|e| e.covers(cell))
            .collect()
    }

    /// True if a solid entity other than `ignoring` covers `cell`.
    pub fn is_blocked(&self, cell: Position, ignoring: Option<SpatialKey>) -> bool {
        self.occupants(cell)
            .iter()
            .any(|e| e.solid && Some(e.key) != ignoring)
    }

    fn bucket_of(&self, position: Position) -> BucketKey {
        (
            position.row.div_euclid(self.cell_size),
            position.col.div_euclid(self.cell_size),
        )
    }

    fn buckets_for(&self, origin: Position, footprint: Footprint) -> Vec<BucketKey> {
        let (first_row, first_col) = self.bucket_of(origin);
        let (last_row, last_col) = self.bucket_of(footprint.last_cell(origin));
        let mut keys = Vec::new();
        for row in first_row..=last_row {
            for col in first_col..=last_col {
                keys.push((row, col));
            }
        }
        keys
    }
}
