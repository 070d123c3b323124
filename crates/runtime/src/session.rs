//! A running game: authoritative state, its content, and its save slot.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use game_content::ContentFactory;
use game_core::{
    Action, ActionDomain, Env, GameConfig, GameEngine, GameEnv, GameState, PcgRng, RngOracle,
    TemplateOracle,
};

use crate::autosave::{AutoSaveScheduler, SaveJob};
use crate::config::RuntimeConfig;
use crate::error::{Result, RuntimeError};
use crate::repository::{FileSaveRepository, SaveRepository};

/// What one dispatched action did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dispatch {
    pub changed: bool,
    pub handled_by: Option<ActionDomain>,
}

/// Owns the state and routes every input through the reducer.
///
/// The session is single-threaded and never blocks: hosts call
/// [`Self::poll_autosave`] from their frame or timer loop to let a due
/// autosave happen.
pub struct GameSession {
    config: GameConfig,
    templates: Arc<dyn TemplateOracle>,
    rng: Arc<dyn RngOracle>,
    repository: Arc<dyn SaveRepository>,
    autosave: AutoSaveScheduler,
    state: GameState,
}

impl GameSession {
    pub fn new(
        config: GameConfig,
        templates: Arc<dyn TemplateOracle>,
        repository: Arc<dyn SaveRepository>,
        runtime: &RuntimeConfig,
        state: GameState,
    ) -> Self {
        Self {
            config,
            templates,
            rng: Arc::new(PcgRng),
            repository,
            autosave: AutoSaveScheduler::new(
                runtime.autosave_slot.clone(),
                runtime.autosave_throttle,
            ),
            state,
        }
    }

    /// Builds a fresh run of `level` from a content directory, saving under
    /// `runtime.save_dir`.
    ///
    /// # Errors
    ///
    /// Content that fails to load or hydrate, or a save directory that
    /// cannot be created.
    pub fn from_content(
        runtime: &RuntimeConfig,
        content: &ContentFactory,
        level: &str,
    ) -> Result<Self> {
        let config = content.load_config()?;
        let catalog = content.load_catalog()?;
        let level = content.load_level(level)?;
        let state = GameState::from_level(&config, runtime.game_seed, &level, &catalog)
            .map_err(RuntimeError::Hydration)?;
        let repository = FileSaveRepository::new(&runtime.save_dir)?;
        tracing::info!(
            level = %level.id,
            seed = runtime.game_seed,
            save_dir = %runtime.save_dir.display(),
            "session started"
        );
        Ok(Self::new(
            config,
            Arc::new(catalog),
            Arc::new(repository),
            runtime,
            state,
        ))
    }

    /// Replaces the randomness source, e.g. with a fixed roll for tests.
    pub fn with_rng(mut self, rng: Arc<dyn RngOracle>) -> Self {
        self.rng = rng;
        self
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn autosave(&self) -> &AutoSaveScheduler {
        &self.autosave
    }

    pub fn repository(&self) -> &dyn SaveRepository {
        self.repository.as_ref()
    }

    fn engine(&self) -> GameEngine<'_> {
        let env: GameEnv<'_> = Env::new(self.templates.as_ref(), self.rng.as_ref(), &self.config);
        GameEngine::new(env)
    }

    /// Applies `action` and schedules an autosave when the state changed.
    ///
    /// A run that is over or has not started cancels any pending autosave
    /// instead, so a stale pre-death snapshot never lands in the slot.
    pub fn dispatch(&mut self, action: Action, now: DateTime<Utc>) -> Dispatch {
        let reduction = self.engine().apply(&self.state, &action);
        self.state = reduction.state;

        if reduction.changed {
            if AutoSaveScheduler::is_saveable(&self.state) {
                self.autosave.request(&self.state, now);
            } else {
                self.autosave.cancel();
            }
        }
        Dispatch {
            changed: reduction.changed,
            handled_by: reduction.handled_by,
        }
    }

    /// Moves the run onto the bundled level `level` through the reducer.
    ///
    /// # Errors
    ///
    /// A level file that fails to load, or that names templates this
    /// session's catalogue does not have. The state is untouched then.
    pub fn change_level(
        &mut self,
        content: &ContentFactory,
        level: &str,
        now: DateTime<Utc>,
    ) -> Result<Dispatch> {
        let level = content.load_level(level)?;
        self.state
            .clone()
            .change_level(&self.config, &level, self.templates.as_ref())
            .map_err(RuntimeError::Hydration)?;
        Ok(self.dispatch(
            Action::SetLevel {
                level: Box::new(level),
            },
            now,
        ))
    }

    /// Writes the pending autosave if it is due. Returns whether a write
    /// happened.
    ///
    /// # Errors
    ///
    /// The repository failure, after the scheduler has been told.
    pub fn poll_autosave(&mut self, now: DateTime<Utc>) -> Result<bool> {
        let Some(job) = self.autosave.take_due(now) else {
            return Ok(false);
        };
        self.perform(&job)?;
        Ok(true)
    }

    /// Saves right away, bypassing the throttle. Returns `false` when the
    /// run is not saveable (dead, or no turns taken yet).
    ///
    /// # Errors
    ///
    /// [`RuntimeError::SaveInProgress`] while another write is out, or the
    /// repository failure.
    pub fn save_now(&mut self, now: DateTime<Utc>) -> Result<bool> {
        if !AutoSaveScheduler::is_saveable(&self.state) {
            return Ok(false);
        }
        let job = self
            .autosave
            .force(&self.state, now)
            .ok_or(RuntimeError::SaveInProgress)?;
        self.perform(&job)?;
        Ok(true)
    }

    /// Restores the autosave slot. See [`Self::load_slot`].
    pub fn load(&mut self) -> Result<Option<DateTime<Utc>>> {
        let slot = self.autosave.slot().to_owned();
        self.load_slot(&slot)
    }

    /// Replaces the state with the snapshot in `slot`, through the reducer.
    /// Returns when that snapshot was saved, if it says.
    ///
    /// # Errors
    ///
    /// [`RuntimeError::EmptySlot`] when nothing was saved there, or the
    /// repository failure.
    pub fn load_slot(&mut self, slot: &str) -> Result<Option<DateTime<Utc>>> {
        let snapshot = self
            .repository
            .load(slot)?
            .ok_or_else(|| RuntimeError::EmptySlot(slot.to_owned()))?;
        let (state, saved_at) = snapshot.restore();

        let reduction = self.engine().apply(
            &self.state,
            &Action::HydrateSnapshot {
                state: Box::new(state),
            },
        );
        self.state = reduction.state;
        self.autosave.cancel();
        self.autosave.mark_written(&self.state);
        tracing::info!(
            slot,
            nonce = self.state.turn.nonce,
            moves = self.state.turn.move_count,
            "save loaded"
        );
        Ok(saved_at)
    }

    fn perform(&mut self, job: &SaveJob) -> Result<()> {
        let result = self.repository.save(&job.slot, &job.snapshot);
        self.autosave.complete(job, &result);
        Ok(result?)
    }
}
