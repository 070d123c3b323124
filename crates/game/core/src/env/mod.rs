//! Read-only collaborators injected into the reducer.
//!
//! Oracles expose template data, tunables and randomness. The [`Env`]
//! aggregate bundles them so the engine reaches everything it needs without
//! hidden globals or hard coupling to concrete implementations.
mod rng;
mod templates;

pub use rng::{Dice, FixedRng, PcgRng, RngOracle, RollStream, compute_seed};
pub use templates::{
    ItemKind, ItemTemplate, MonsterTemplate, ObjectTemplate, SpawnRule, TemplateCatalog,
    TemplateOracle, WeaponKind, WeaponTemplate,
};

use crate::config::GameConfig;
use crate::state::GameState;

/// Aggregates the collaborators required by the reducer.
pub struct Env<'a, T, R>
where
    T: TemplateOracle + ?Sized,
    R: RngOracle + ?Sized,
{
    templates: &'a T,
    rng: &'a R,
    config: &'a GameConfig,
}

impl<T, R> Clone for Env<'_, T, R>
where
    T: TemplateOracle + ?Sized,
    R: RngOracle + ?Sized,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, R> Copy for Env<'_, T, R>
where
    T: TemplateOracle + ?Sized,
    R: RngOracle + ?Sized,
{
}

pub type GameEnv<'a> = Env<'a, dyn TemplateOracle + 'a, dyn RngOracle + 'a>;

impl<'a, T, R> Env<'a, T, R>
where
    T: TemplateOracle + ?Sized,
    R: RngOracle + ?Sized,
{
    pub fn new(templates: &'a T, rng: &'a R, config: &'a GameConfig) -> Self {
        Self {
            templates,
            rng,
            config,
        }
    }

    pub fn templates(&self) -> &'a T {
        self.templates
    }

    pub fn rng(&self) -> &'a R {
        self.rng
    }

    pub fn config(&self) -> &'a GameConfig {
        self.config
    }
}

impl<'a, T, R> Env<'a, T, R>
where
    T: TemplateOracle + 'a,
    R: RngOracle + 'a,
{
    /// Converts this environment into a trait-object based `GameEnv`.
    pub fn into_game_env(self) -> GameEnv<'a> {
        let templates: &'a dyn TemplateOracle = self.templates;
        let rng: &'a dyn RngOracle = self.rng;
        Env::new(templates, rng, self.config)
    }
}

impl<'a> GameEnv<'a> {
    /// Dice for one action on `stream`, seeded from the state's seed and nonce.
    pub fn dice(&self, state: &GameState, stream: RollStream) -> Dice<'a> {
        Dice::new(self.rng, state.game_seed, state.turn.nonce, stream)
    }
}
