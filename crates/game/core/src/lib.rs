//! Deterministic simulation core for a turn-based dungeon crawler.
//!
//! `game-core` owns the rules: the world state, the monster lifecycle, melee
//! and ranged combat, the ability charge machines and the effect interpreter.
//! All of it is reachable through [`engine::GameEngine`], a pure reducer
//! from `(state, action)` to the next state. Template data, tunables and
//! randomness are injected through [`env::Env`]; nothing here reads a clock,
//! a file or a global.
pub mod ability;
pub mod action;
pub mod combat;
pub mod config;
pub mod effect;
pub mod engine;
pub mod env;
pub mod error;
pub mod hydration;
pub mod monster;
pub mod spatial;
pub mod state;
pub mod turn;

pub use ability::AbilityError;
pub use action::{Action, ActionDomain};
pub use combat::{AttackOutcome, AttackResult, CombatError, ImpactReport, RangedError};
pub use config::GameConfig;
pub use effect::{Effect, EffectOutcome};
pub use engine::{GameEngine, InventoryError, MoveError, Reduction};
pub use env::{
    Env, FixedRng, GameEnv, ItemKind, ItemTemplate, MonsterTemplate, ObjectTemplate, PcgRng,
    RngOracle, SpawnRule, TemplateCatalog, TemplateOracle, WeaponKind, WeaponTemplate,
};
pub use error::{ErrorSeverity, GameError};
pub use hydration::{
    HydrationError, ItemInstance, LevelData, MonsterInstance, ObjectInstance, TemplateKind,
};
pub use spatial::{SpatialEntity, SpatialGrid, SpatialKey};
pub use state::{
    Ability, CombatPhase, Combatant, Direction, EntityId, GameState, GridSize, ItemId, Monster,
    MonsterState, PlayerState, Position, ProgressState, Unlocks,
};
