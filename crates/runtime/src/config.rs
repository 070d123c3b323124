//! Host settings read from the environment.

use std::path::PathBuf;

use chrono::TimeDelta;
use directories::ProjectDirs;

use crate::error::{Result, RuntimeError};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Directory holding one JSON file per save slot.
    pub save_dir: PathBuf,
    pub game_seed: u64,
    /// Delay between an autosave request and the write.
    pub autosave_throttle: TimeDelta,
    pub autosave_slot: String,
}

impl RuntimeConfig {
    pub const SAVE_DIR_VAR: &'static str = "DUNGEON_SAVE_DIR";
    pub const GAME_SEED_VAR: &'static str = "DUNGEON_GAME_SEED";
    pub const THROTTLE_VAR: &'static str = "DUNGEON_AUTOSAVE_THROTTLE_MS";
    pub const SLOT_VAR: &'static str = "DUNGEON_AUTOSAVE_SLOT";

    pub const DEFAULT_GAME_SEED: u64 = 0x5eed;
    pub const DEFAULT_THROTTLE_MS: i64 = 500;
    pub const DEFAULT_SLOT: &'static str = "autosave";

    /// Reads the `DUNGEON_*` variables; anything unset takes its default.
    ///
    /// # Errors
    ///
    /// [`RuntimeError::InvalidConfig`] for a value that does not parse, and
    /// [`RuntimeError::NoSaveDir`] when no save directory is set and the
    /// platform has no data directory.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`Self::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let save_dir = match lookup(Self::SAVE_DIR_VAR).filter(|v| !v.trim().is_empty()) {
            Some(dir) => PathBuf::from(dir),
            None => Self::default_save_dir().ok_or(RuntimeError::NoSaveDir)?,
        };

        let game_seed = match lookup(Self::GAME_SEED_VAR) {
            Some(raw) => parse_number(Self::GAME_SEED_VAR, &raw)?,
            None => Self::DEFAULT_GAME_SEED,
        };

        let throttle_ms: i64 = match lookup(Self::THROTTLE_VAR) {
            Some(raw) => parse_number(Self::THROTTLE_VAR, &raw)?,
            None => Self::DEFAULT_THROTTLE_MS,
        };
        let autosave_throttle = TimeDelta::try_milliseconds(throttle_ms)
            .filter(|d| *d >= TimeDelta::zero())
            .ok_or_else(|| RuntimeError::InvalidConfig {
                key: Self::THROTTLE_VAR,
                value: throttle_ms.to_string(),
            })?;

        let autosave_slot = lookup(Self::SLOT_VAR)
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| Self::DEFAULT_SLOT.to_owned());
        if crate::repository::validate_slot(&autosave_slot).is_err() {
            return Err(RuntimeError::InvalidConfig {
                key: Self::SLOT_VAR,
                value: autosave_slot,
            });
        }

        let config = Self {
            save_dir,
            game_seed,
            autosave_throttle,
            autosave_slot,
        };
        tracing::debug!(
            save_dir = %config.save_dir.display(),
            seed = config.game_seed,
            throttle_ms,
            slot = %config.autosave_slot,
            "runtime config resolved"
        );
        Ok(config)
    }

    /// Config for a given save directory with every other setting defaulted.
    pub fn with_save_dir(save_dir: impl Into<PathBuf>) -> Self {
        Self {
            save_dir: save_dir.into(),
            game_seed: Self::DEFAULT_GAME_SEED,
            autosave_throttle: TimeDelta::milliseconds(Self::DEFAULT_THROTTLE_MS),
            autosave_slot: Self::DEFAULT_SLOT.to_owned(),
        }
    }

    /// Platform data directory, e.g. `~/.local/share/dungeon/saves`.
    pub fn default_save_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "dungeon").map(|dirs| dirs.data_dir().join("saves"))
    }
}

fn parse_number<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T> {
    raw.trim().parse().map_err(|_| RuntimeError::InvalidConfig {
        key,
        value: raw.to_owned(),
    })
}
