//! Level layout loader.

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, bail};
use game_core::LevelData;

use crate::loaders::{LoadResult, read_file};

/// Loader for level layouts from RON files.
pub struct LevelLoader;

impl LevelLoader {
    pub fn load(path: &Path) -> LoadResult<LevelData> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("invalid level {}", path.display()))
    }

    /// Parses a level and checks its geometry.
    ///
    /// Template references are not resolved here; hydration reports those
    /// against whichever catalogue the level is paired with.
    pub fn parse(content: &str) -> LoadResult<LevelData> {
        let level: LevelData = ron::from_str(content).context("failed to parse level RON")?;
        if level.grid.rows == 0 || level.grid.cols == 0 {
            bail!("level '{}' has an empty grid", level.id);
        }
        if !level.grid.contains(level.player_spawn) {
            bail!(
                "level '{}' spawns the player outside the grid at {}",
                level.id,
                level.player_spawn
            );
        }

        let mut object_ids = BTreeSet::new();
        for object in &level.objects {
            if !object_ids.insert(object.id) {
                bail!("level '{}' repeats object id {}", level.id, object.id);
            }
        }
        let placements = level
            .monsters
            .iter()
            .map(|m| m.position)
            .chain(level.objects.iter().map(|o| o.position))
            .chain(level.items.iter().map(|i| i.position));
        for position in placements {
            if !level.grid.contains(position) {
                bail!("level '{}' places content outside the grid at {position}", level.id);
            }
        }
        tracing::debug!(
            level = %level.id,
            monsters = level.monsters.len(),
            objects = level.objects.len(),
            items = level.items.len(),
            "level loaded"
        );
        Ok(level)
    }
}

#[cfg(test)]
mod tests {
    use game_core::{GridSize, Position};

    use super::*;

    const LEVEL: &str = r#"
(
    id: "crypt",
    grid: (rows: 60, cols: 60),
    player_spawn: (row: 55, col: 30),
    turns_per_hit_point: 10,
    monsters: [
        (template: "abhuman", position: (row: 20, col: 30), hp: Some(5)),
    ],
    objects: [
        (id: 1, template: "fountain", position: (row: 50, col: 30)),
        (id: 2, template: "pillar", position: (row: 40, col: 28)),
    ],
    items: [
        (template: "healing_draught", position: (row: 54, col: 31)),
    ],
)
"#;

    #[test]
    fn parses_a_level() {
        let level = LevelLoader::parse(LEVEL).unwrap();
        assert_eq!(level.grid, GridSize::new(60, 60));
        assert_eq!(level.player_spawn, Position::new(55, 30));
        assert_eq!(level.monsters[0].hp, Some(5));
        assert_eq!(level.monsters[0].id, None);
        assert_eq!(level.objects.len(), 2);
        assert_eq!(level.objects[0].solid, None, "solidity falls back to the template");
    }

    #[test]
    fn rejects_out_of_bounds_spawn() {
        let broken = LEVEL.replace("player_spawn: (row: 55", "player_spawn: (row: 75");
        let error = LevelLoader::parse(&broken).unwrap_err();
        assert!(error.to_string().contains("outside the grid"), "{error}");
    }

    #[test]
    fn rejects_repeated_object_ids() {
        let broken = LEVEL.replace("(id: 2,", "(id: 1,");
        assert!(LevelLoader::parse(&broken).is_err());
    }

    #[test]
    fn rejects_misplaced_content() {
        let broken = LEVEL.replace("(row: 54, col: 31)", "(row: 54, col: 91)");
        assert!(LevelLoader::parse(&broken).is_err());
    }
}
