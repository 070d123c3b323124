//! Game configuration loader.

use std::path::Path;

use anyhow::{Context, bail};
use game_core::GameConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for [`GameConfig`] from TOML files.
///
/// Every field is optional; missing keys keep their defaults.
pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load(path: &Path) -> LoadResult<GameConfig> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn parse(content: &str) -> LoadResult<GameConfig> {
        let config: GameConfig = toml::from_str(content).context("failed to parse config TOML")?;
        Self::validate(&config)?;
        Ok(config)
    }

    fn validate(config: &GameConfig) -> LoadResult<()> {
        if config.grid_rows == 0 || config.grid_cols == 0 {
            bail!("grid must be at least 1x1");
        }
        if config.spatial_cell_size == 0 {
            bail!("spatial_cell_size must be positive");
        }
        if config.player_max_hp == 0 {
            bail!("player_max_hp must be positive");
        }
        if config.hide_recharge_turns == 0 || config.jaunt_recharge_turns == 0 {
            bail!("ability recharge periods must be positive");
        }
        if !config.grid().contains(config.player_spawn) {
            bail!("player_spawn {} lies outside the grid", config.player_spawn);
        }
        if config.max_attackers > GameConfig::ATTACK_SLOTS {
            tracing::warn!(
                requested = config.max_attackers,
                cap = GameConfig::ATTACK_SLOTS,
                "max_attackers exceeds the number of attack slots"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use game_core::Position;

    use super::*;

    #[test]
    fn missing_keys_keep_defaults() {
        let config = ConfigLoader::parse(
            r#"
            grid_rows = 60
            grid_cols = 60
            player_spawn = { row = 55, col = 30 }
            default_weapon = "shortsword"
            "#,
        )
        .unwrap();
        assert_eq!(config.grid_rows, 60);
        assert_eq!(config.player_spawn, Position::new(55, 30));
        assert_eq!(config.default_weapon.as_deref(), Some("shortsword"));
        assert_eq!(config.hide_max_charges, GameConfig::DEFAULT_HIDE_MAX);
        assert_eq!(config.inventory_capacity, GameConfig::DEFAULT_INVENTORY_CAPACITY);
    }

    #[test]
    fn empty_document_is_the_default_config() {
        assert_eq!(ConfigLoader::parse("").unwrap(), GameConfig::default());
    }

    #[test]
    fn rejects_spawn_outside_grid() {
        let error = ConfigLoader::parse("grid_rows = 10\ngrid_cols = 10\n").unwrap_err();
        assert!(error.to_string().contains("outside the grid"), "{error}");
    }

    #[test]
    fn rejects_zero_recharge() {
        assert!(ConfigLoader::parse("jaunt_recharge_turns = 0").is_err());
    }
}
