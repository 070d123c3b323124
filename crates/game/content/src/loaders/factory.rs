//! Content factory for loading game content from a data directory.

use std::path::{Path, PathBuf};

use game_core::{GameConfig, LevelData, TemplateCatalog};

use crate::loaders::{CatalogLoader, ConfigLoader, LevelLoader, LoadResult};

/// Resolves content files under one data directory:
///
/// ```text
/// <data_dir>/config.toml
/// <data_dir>/catalog.ron
/// <data_dir>/levels/<name>.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub const CONFIG_FILE: &'static str = "config.toml";
    pub const CATALOG_FILE: &'static str = "catalog.ron";
    pub const LEVELS_DIR: &'static str = "levels";

    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Content shipped with this crate.
    pub fn bundled() -> Self {
        Self::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("data"))
    }

    /// Loads `config.toml`, or the default config when the file is absent.
    pub fn load_config(&self) -> LoadResult<GameConfig> {
        let path = self.data_dir.join(Self::CONFIG_FILE);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(GameConfig::default());
        }
        ConfigLoader::load(&path)
    }

    pub fn load_catalog(&self) -> LoadResult<TemplateCatalog> {
        CatalogLoader::load(&self.data_dir.join(Self::CATALOG_FILE))
    }

    pub fn load_level(&self, name: &str) -> LoadResult<LevelData> {
        LevelLoader::load(&self.level_path(name))
    }

    pub fn level_path(&self, name: &str) -> PathBuf {
        self.data_dir
            .join(Self::LEVELS_DIR)
            .join(format!("{name}.ron"))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
