//! Probabilistic spawning and spawn placement.

use std::f64::consts::TAU;

use crate::env::{Dice, GameEnv, MonsterTemplate, RollStream, SpawnRule};
use crate::hydration::{HydrationError, MonsterInstance, TemplateKind, hydrate_monster};
use crate::spatial::{SpatialEntity, SpatialGrid, SpatialKey};
use crate::state::{EntityId, GameState, Position};

/// Distance band, measured from the player, a spawn must land in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnBand {
    pub min: f64,
    pub max: f64,
}

impl SpawnBand {
    pub fn new(min: u32, max: u32) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self {
            min: f64::from(min),
            max: f64::from(max),
        }
    }

    pub fn contains(&self, distance: f64) -> bool {
        distance >= self.min && distance <= self.max
    }
}

/// Evaluates every spawn rule once. Returns the ids of new monsters.
pub fn spawn_check(state: &mut GameState, env: &GameEnv<'_>) -> Vec<EntityId> {
    if state.is_game_over() {
        return Vec::new();
    }
    let config = env.config();
    let mut dice = env.dice(state, RollStream::Spawn);
    let mut grid = SpatialGrid::build(state, config.spatial_cell_size);
    let band = SpawnBand::new(config.spawn_min_distance, config.spawn_max_distance);

    let mut spawned = Vec::new();
    for rule in env.templates().spawn_rules() {
        if !should_spawn(state, rule, &mut dice) {
            continue;
        }
        let Some(template) = env.templates().monster(&rule.template) else {
            tracing::error!(template = %rule.template, "spawn rule references unknown monster template");
            continue;
        };
        let Some(position) =
            find_spawn_position(state, &grid, &mut dice, band, config.spawn_attempts)
        else {
            tracing::warn!(template = %rule.template, "no free cell left, spawn skipped");
            continue;
        };
        let id = place_monster(state, &mut grid, template, position);
        spawned.push(id);
    }
    spawned
}

/// Cap check, then one uniform sample against the rule's rate.
fn should_spawn(state: &GameState, rule: &SpawnRule, dice: &mut Dice<'_>) -> bool {
    let active = state.monsters.count_template(&rule.template);
    if active >= rule.max_instances as usize {
        return false;
    }
    dice.unit() < rule.rate
}

/// Samples polar offsets around the player until one lands on a free cell
/// inside `band`. After `attempts` misses it falls back to the grid centre,
/// or the free cell nearest to it; `None` only when the grid is full.
pub fn find_spawn_position(
    state: &GameState,
    grid: &SpatialGrid,
    dice: &mut Dice<'_>,
    band: SpawnBand,
    attempts: u32,
) -> Option<Position> {
    let player = state.player.position;
    let bounds = state.world.grid;
    for _ in 0..attempts {
        let angle = dice.unit() * TAU;
        let radius = band.min + dice.unit() * (band.max - band.min);
        let candidate = bounds.clamp(player.offset(
            (radius * angle.sin()).round() as i32,
            (radius * angle.cos()).round() as i32,
        ));
        if !band.contains(candidate.euclidean(player)) {
            continue;
        }
        if candidate == player || grid.is_blocked(candidate, None) {
            continue;
        }
        return Some(candidate);
    }
    tracing::debug!(attempts, "no spawn cell found, using grid centre");
    nearest_free_cell(state, grid, bounds.center())
}

/// Closest free cell to `origin`, searched in square rings.
fn nearest_free_cell(state: &GameState, grid: &SpatialGrid, origin: Position) -> Option<Position> {
    let player = state.player.position;
    let bounds = state.world.grid;
    let reach = i32::try_from(bounds.rows.max(bounds.cols)).unwrap_or(i32::MAX);
    (0..=reach).find_map(|radius| {
        (-radius..=radius)
            .flat_map(|d_row| (-radius..=radius).map(move |d_col| (d_row, d_col)))
            .filter(|(d_row, d_col)| d_row.abs().max(d_col.abs()) == radius)
            .map(|(d_row, d_col)| origin.offset(d_row, d_col))
            .find(|cell| bounds.contains(*cell) && *cell != player && !grid.is_blocked(*cell, None))
    })
}

/// Spawns `count` monsters of `template` within `range` of the player,
/// regardless of spawn-rule caps.
///
/// # Errors
///
/// [`HydrationError::TemplateNotFound`] if `template` is unknown.
pub fn spawn_near(
    state: &mut GameState,
    env: &GameEnv<'_>,
    dice: &mut Dice<'_>,
    template: &str,
    count: u32,
    range: u32,
) -> Result<Vec<EntityId>, HydrationError> {
    let template = env
        .templates()
        .monster(template)
        .ok_or_else(|| HydrationError::TemplateNotFound {
            kind: TemplateKind::Monster,
            id: template.to_owned(),
        })?;
    let config = env.config();
    let mut grid = SpatialGrid::build(state, config.spatial_cell_size);
    let band = SpawnBand::new(1, range.max(1));
    let mut spawned = Vec::new();
    for _ in 0..count {
        let Some(position) = find_spawn_position(state, &grid, dice, band, config.spawn_attempts)
        else {
            tracing::warn!(template = %template.id, "no free cell left, spawn skipped");
            break;
        };
        spawned.push(place_monster(state, &mut grid, template, position));
    }
    Ok(spawned)
}

fn place_monster(
    state: &mut GameState,
    grid: &mut SpatialGrid,
    template: &MonsterTemplate,
    position: Position,
) -> EntityId {
    let id = state.allocate_entity_id();
    let monster = hydrate_monster(template, &MonsterInstance::new(&template.id, position), id);
    grid.insert(SpatialEntity {
        key: SpatialKey::Monster(id),
        origin: monster.position,
        footprint: monster.footprint,
        solid: true,
    });
    tracing::info!(monster = %id, template = %template.id, %position, "monster spawned");
    state.monsters.insert(monster);
    id
}
