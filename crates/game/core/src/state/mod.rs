//! Authoritative game state representation.
//!
//! This module owns the data structures that describe the player, the monster
//! arena, combat bookkeeping and the level. Runtime layers clone or query this
//! state but only ever obtain a new one through the engine.
mod arena;
mod combat;
pub mod types;

pub use arena::MonsterArena;
pub use combat::{
    CombatEvent, CombatPhase, CombatState, Combatant, ImpactId, PendingImpact, RangedState,
    SkipReason,
};
pub use types::{
    Ability, Attributes, Cloak, Direction, EntityId, Footprint, GridSize, GroundItem,
    GroundItemKind, HideState, InventoryItem, ItemId, JauntState, Monster, MonsterState, ObjectId,
    PlayerState, Position, Unlocks, WorldObject, WorldState,
};

use std::collections::{BTreeMap, BTreeSet};

use crate::combat::slots;
use crate::config::GameConfig;
use crate::env::TemplateOracle;
use crate::hydration::{self, HydrationError, LevelData};

/// Turn bookkeeping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TurnState {
    /// Count of state-changing actions applied; feeds RNG seeding.
    pub nonce: u64,
    /// Player turns taken in this run.
    pub move_count: u64,
}

/// Transient marker left where a jaunt landed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TeleportFlash {
    pub id: u64,
    pub position: Position,
}

/// Presentation-facing flags the renderer reads.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct UiState {
    pub inventory_open: bool,
    pub message: Option<String>,
    pub teleport_flashes: Vec<TeleportFlash>,
    next_flash_id: u64,
}

impl UiState {
    /// Emits a teleport marker with a fresh, strictly increasing id.
    pub fn push_teleport_flash(&mut self, position: Position) -> u64 {
        self.next_flash_id += 1;
        let id = self.next_flash_id;
        self.teleport_flashes.push(TeleportFlash { id, position });
        id
    }
}

/// Run statistics frozen at death for the game-over screen.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DeathRecord {
    pub message: String,
    pub killer: String,
    pub moves: u64,
    pub kills: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RunStats {
    pub monsters_killed: u32,
    pub game_over: Option<DeathRecord>,
}

/// Side-quest progress flags the host sets as the player clears content
/// outside the main grid.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ProgressState {
    pub sub_games_completed: BTreeMap<String, bool>,
    pub waypoints_created: BTreeSet<String>,
}

impl ProgressState {
    pub fn is_sub_game_completed(&self, name: &str) -> bool {
        self.sub_games_completed.get(name).copied().unwrap_or(false)
    }

    pub fn has_waypoint(&self, name: &str) -> bool {
        self.waypoints_created.contains(name)
    }
}

/// Canonical snapshot of the deterministic game state.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameState {
    /// RNG seed for deterministic random generation.
    ///
    /// Set once at game initialization and never modified.
    /// Combined with `turn.nonce` to generate unique seeds for each random event.
    pub game_seed: u64,

    /// Sequential monster ID allocator (monotonically increasing).
    ///
    /// Never reused. IDs 0 (PLAYER) and u32::MAX (SYSTEM) are reserved.
    next_entity_id: u32,

    pub turn: TurnState,
    pub world: WorldState,
    pub player: PlayerState,
    pub monsters: MonsterArena,
    pub combat: CombatState,
    pub ranged: RangedState,
    pub ui: UiState,
    pub run: RunStats,
    pub progress: ProgressState,
}

impl GameState {
    /// Fresh run on an empty level sized by `config`.
    pub fn new(config: &GameConfig, game_seed: u64) -> Self {
        let world = WorldState::new(config.grid(), config.player_spawn);
        Self::with_world(config, game_seed, world)
    }

    pub fn with_world(config: &GameConfig, game_seed: u64, world: WorldState) -> Self {
        let spawn = world.grid.clamp(world.player_spawn);
        Self {
            game_seed,
            next_entity_id: 1,
            turn: TurnState::default(),
            player: PlayerState::new(config, spawn),
            world,
            monsters: MonsterArena::new(),
            combat: CombatState::default(),
            ranged: RangedState::default(),
            ui: UiState::default(),
            run: RunStats::default(),
            progress: ProgressState::default(),
        }
    }

    /// Builds a run from level data, hydrating every placed instance.
    ///
    /// # Errors
    ///
    /// Returns [`HydrationError::TemplateNotFound`] when the level references
    /// a template the catalogue does not know.
    pub fn from_level(
        config: &GameConfig,
        game_seed: u64,
        level: &LevelData,
        templates: &(impl TemplateOracle + ?Sized),
    ) -> Result<Self, HydrationError> {
        let world = level_world(level, templates)?;
        let mut state = Self::with_world(config, game_seed, world);
        state.populate(config, level, templates)?;
        Ok(state)
    }

    /// Moves the running game onto another level.
    ///
    /// The new level's scenery, items and monsters replace the old ones and
    /// combat, the ranged sub-mode and the move count start over. The player
    /// keeps their gear, unlocks and charges, arrives at the level spawn and
    /// is healed to full. Kills and progress flags carry over.
    ///
    /// # Errors
    ///
    /// [`HydrationError::TemplateNotFound`] when the level references an
    /// unknown template. `self` may be partially updated in that case.
    pub fn change_level(
        &mut self,
        config: &GameConfig,
        level: &LevelData,
        templates: &(impl TemplateOracle + ?Sized),
    ) -> Result<(), HydrationError> {
        let world = level_world(level, templates)?;
        self.player.position = world.grid.clamp(world.player_spawn);
        self.player.hp = self.player.max_hp;
        self.player.jaunt.armed = false;
        self.world = world;
        self.monsters.clear();
        self.combat = CombatState::default();
        self.ranged = RangedState::default();
        self.ui.teleport_flashes.clear();
        self.turn.move_count = 0;
        self.populate(config, level, templates)?;
        tracing::info!(level = %self.world.level, monsters = self.monsters.len(), "level changed");
        Ok(())
    }

    fn populate(
        &mut self,
        config: &GameConfig,
        level: &LevelData,
        templates: &(impl TemplateOracle + ?Sized),
    ) -> Result<(), HydrationError> {
        let monsters =
            hydration::hydrate_monsters(&level.monsters, templates, || self.allocate_entity_id())?;
        for monster in monsters {
            slots::admit(self, config, monster);
        }
        Ok(())
    }

    /// Adds a hydrated monster, keeping the allocator ahead of ids chosen
    /// outside of it (level files, host-provided instances).
    pub fn insert_monster(&mut self, monster: Monster) -> Option<Monster> {
        if monster.id.is_assignable() {
            self.next_entity_id = self.next_entity_id.max(monster.id.0.saturating_add(1));
        }
        self.monsters.insert(monster)
    }

    /// Allocates a new unique monster ID.
    ///
    /// IDs are never reused; the reserved PLAYER and SYSTEM ids are skipped.
    pub fn allocate_entity_id(&mut self) -> EntityId {
        loop {
            let id = EntityId(self.next_entity_id);
            self.next_entity_id = self.next_entity_id.wrapping_add(1);
            if id.is_assignable() {
                return id;
            }
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.run.game_over.is_some()
    }

    /// The single death transition.
    ///
    /// Zeroes the player's HP, freezes run statistics, clears combat, every
    /// monster and the ranged sub-mode. Only a reset (or loading a save) leads
    /// back to a playable state.
    pub fn enter_game_over(
        &mut self,
        killer: impl Into<String>,
        message: impl Into<String>,
        config: &GameConfig,
    ) {
        if self.is_game_over() {
            return;
        }
        let killer = killer.into();
        let message = message.into();
        tracing::info!(
            killer = %killer,
            moves = self.turn.move_count,
            kills = self.run.monsters_killed,
            "player died"
        );

        self.player.hp = 0;
        self.player.hide.active = false;
        self.player.jaunt.armed = false;
        self.player.cloak = Cloak::None;
        self.run.game_over = Some(DeathRecord {
            message,
            killer: killer.clone(),
            moves: self.turn.move_count,
            kills: self.run.monsters_killed,
        });
        self.combat.record(
            CombatEvent::PlayerDefeated { killer },
            config.combat_log_capacity,
        );
        self.combat.reset();
        self.monsters.clear();
        self.ranged.deactivate();
        self.ranged.in_flight.clear();
    }

    /// Starts a new run on the same level.
    ///
    /// Keeps the seed, nonce, level geometry and scenery; everything the
    /// player earned or suffered is reset.
    pub fn reset_run(&mut self, config: &GameConfig) {
        let spawn = self.world.grid.clamp(self.world.player_spawn);
        self.player = PlayerState::new(config, spawn);
        self.monsters.clear();
        self.combat = CombatState::default();
        self.ranged = RangedState::default();
        self.ui = UiState::default();
        self.run = RunStats::default();
        self.progress = ProgressState::default();
        self.turn.move_count = 0;
        for object in &mut self.world.objects {
            object.last_triggered = None;
        }
    }
}

/// World geometry, scenery and ground items of `level`.
fn level_world(
    level: &LevelData,
    templates: &(impl TemplateOracle + ?Sized),
) -> Result<WorldState, HydrationError> {
    let mut world = WorldState::new(level.grid, level.player_spawn);
    world.level = level.id.clone();
    world.turns_per_hit_point = level.turns_per_hit_point;
    world.objects = hydration::hydrate_objects(&level.objects, templates)?;
    for item in &level.items {
        let id = world.allocate_item_id();
        let ground = hydration::hydrate_item(item, id, templates)?;
        world.items.push(ground);
    }
    Ok(world)
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(&GameConfig::default(), 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::TemplateCatalog;
    use crate::hydration::MonsterInstance;
    use crate::monster::tests::{abhuman, night_hound};

    fn catalog() -> TemplateCatalog {
        TemplateCatalog::new()
            .with_monster(abhuman())
            .with_monster(night_hound())
    }

    #[test]
    fn allocation_skips_reserved_ids() {
        let mut state = GameState::default();
        state.next_entity_id = u32::MAX;
        let id = state.allocate_entity_id();
        assert_eq!(id, EntityId(1));
        assert_eq!(state.allocate_entity_id(), EntityId(2));
    }

    #[test]
    fn game_over_freezes_stats_and_clears_combat() {
        let config = GameConfig::default();
        let mut state = GameState::new(&config, 7);
        state.turn.move_count = 42;
        state.run.monsters_killed = 3;
        let id = state.allocate_entity_id();
        state.monsters.insert(Monster {
            id,
            state: MonsterState::InSlot { slot: 0, ticket: 1 },
            ..Monster::default()
        });
        state.combat.phase = CombatPhase::Engaged;
        state.ranged.active = true;

        state.enter_game_over("abhuman", "You were slain.", &config);

        let record = state.run.game_over.clone().unwrap();
        assert_eq!(record.moves, 42);
        assert_eq!(record.kills, 3);
        assert_eq!(record.killer, "abhuman");
        assert_eq!(state.player.hp, 0);
        assert!(state.monsters.is_empty());
        assert!(!state.combat.is_engaged());
        assert!(!state.ranged.active);

        // A second death does not overwrite the first record.
        state.enter_game_over("poison", "again", &config);
        assert_eq!(state.run.game_over.unwrap().killer, "abhuman");
    }

    #[test]
    fn reset_restores_a_playable_run() {
        let config = GameConfig::default();
        let mut state = GameState::new(&config, 7);
        state.player.unlocks = Unlocks::HIDE | Unlocks::JAUNT;
        state.enter_game_over("night hound", "Torn apart.", &config);

        state.reset_run(&config);

        assert!(!state.is_game_over());
        assert_eq!(state.player.hp, config.player_max_hp);
        assert!(state.player.unlocks.is_empty());
        assert_eq!(state.game_seed, 7);
        assert_eq!(state.player.position, config.player_spawn);
    }

    #[test]
    fn level_monsters_with_authored_slots_start_combat_properly() {
        let config = GameConfig::default();
        let monsters = (0..5)
            .map(|i| MonsterInstance {
                state: Some(MonsterState::InSlot { slot: 0, ticket: i }),
                ..MonsterInstance::new("abhuman", Position::new(20, 20 + i as i32))
            })
            .collect();
        let level = LevelData {
            id: "ambush".into(),
            grid: GridSize::new(100, 100),
            player_spawn: Position::new(50, 50),
            monsters,
            ..LevelData::default()
        };

        let state = GameState::from_level(&config, 1, &level, &catalog()).unwrap();

        assert!(state.combat.is_engaged());
        assert_eq!(state.monsters.slot_count(), 4);
        assert_eq!(state.monsters.waiting_queue().len(), 1);
        assert_eq!(state.combat.turn_order.len(), 5);
    }

    #[test]
    fn changing_level_rebuilds_the_world_and_keeps_the_player_kit() {
        let config = GameConfig::default();
        let templates = catalog();
        let mut state = GameState::new(&config, 5);
        let id = state.allocate_entity_id();
        state.insert_monster(Monster {
            id,
            state: MonsterState::InSlot { slot: 0, ticket: 1 },
            ..Monster::default()
        });
        state.combat.phase = CombatPhase::Engaged;
        state.ranged.active = true;
        state.turn.move_count = 30;
        state.turn.nonce = 12;
        state.player.hp = 10;
        state.player.unlocks = Unlocks::HIDE;
        state.player.weapons.push("shortsword".into());
        state.run.monsters_killed = 2;
        state
            .progress
            .sub_games_completed
            .insert("hermit_hollow".into(), true);

        let level = LevelData {
            id: "crypt".into(),
            grid: GridSize::new(60, 60),
            player_spawn: Position::new(55, 30),
            monsters: vec![MonsterInstance::new("night_hound", Position::new(10, 10))],
            ..LevelData::default()
        };
        state.change_level(&config, &level, &templates).unwrap();

        assert_eq!(state.world.level, "crypt");
        assert_eq!(state.world.grid, GridSize::new(60, 60));
        assert_eq!(state.player.position, Position::new(55, 30));
        assert_eq!(state.player.hp, state.player.max_hp);
        assert_eq!(state.turn.move_count, 0);
        assert_eq!(state.turn.nonce, 12);
        assert!(!state.combat.is_engaged());
        assert!(!state.ranged.active);
        assert!(!state.monsters.contains(id));
        assert_eq!(state.monsters.count_template("night_hound"), 1);
        assert!(state.monsters.iter().all(|m| m.id != id && m.state.is_roaming()));
        assert!(state.player.unlocks.contains(Unlocks::HIDE));
        assert!(state.player.weapons.iter().any(|w| w == "shortsword"));
        assert_eq!(state.run.monsters_killed, 2);
        assert!(state.progress.is_sub_game_completed("hermit_hollow"));
        assert_eq!(state.game_seed, 5);
    }

    #[test]
    fn unknown_level_template_is_reported() {
        let config = GameConfig::default();
        let mut state = GameState::new(&config, 5);
        let level = LevelData {
            monsters: vec![MonsterInstance::new("wyrm", Position::ORIGIN)],
            ..LevelData::default()
        };
        assert!(state.change_level(&config, &level, &catalog()).is_err());
    }

    #[test]
    fn reset_forgets_progress_flags() {
        let config = GameConfig::default();
        let mut state = GameState::new(&config, 7);
        state.progress.sub_games_completed.insert("tesseract".into(), true);
        state.progress.waypoints_created.insert("jaunt_cave".into());

        state.reset_run(&config);

        assert_eq!(state.progress, ProgressState::default());
        assert!(!state.progress.is_sub_game_completed("tesseract"));
        assert!(!state.progress.has_waypoint("jaunt_cave"));
    }
}
