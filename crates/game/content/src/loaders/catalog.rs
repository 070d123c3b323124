//! Template catalogue loader.

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, bail};
use game_core::{
    Effect, ItemKind, ItemTemplate, MonsterTemplate, ObjectTemplate, SpawnRule, TemplateCatalog,
    WeaponTemplate,
};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// On-disk layout of `catalog.ron`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogFile {
    pub monsters: Vec<MonsterTemplate>,
    pub weapons: Vec<WeaponTemplate>,
    pub objects: Vec<ObjectTemplate>,
    pub items: Vec<ItemTemplate>,
    pub spawn_rules: Vec<SpawnRule>,
}

/// Loader for the template catalogue from RON files.
pub struct CatalogLoader;

impl CatalogLoader {
    pub fn load(path: &Path) -> LoadResult<TemplateCatalog> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("invalid catalogue {}", path.display()))
    }

    /// Parses and cross-checks a catalogue.
    ///
    /// Duplicate ids and references to templates that do not exist (spawn
    /// rules, weapon items, spawn effects) are rejected here rather than
    /// surfacing mid-run.
    pub fn parse(content: &str) -> LoadResult<TemplateCatalog> {
        let file: CatalogFile =
            ron::from_str(content).context("failed to parse catalogue RON")?;
        Self::validate(&file)?;

        let mut catalog = TemplateCatalog::new();
        for monster in file.monsters {
            catalog.add_monster(monster);
        }
        for weapon in file.weapons {
            catalog.add_weapon(weapon);
        }
        for object in file.objects {
            catalog.add_object(object);
        }
        for item in file.items {
            catalog.add_item(item);
        }
        catalog.set_spawn_rules(
            file.spawn_rules
                .into_iter()
                .map(|rule| SpawnRule::new(rule.template, rule.rate, rule.max_instances))
                .collect(),
        );
        tracing::debug!(monsters = catalog.monster_count(), "catalogue loaded");
        Ok(catalog)
    }

    fn validate(file: &CatalogFile) -> LoadResult<()> {
        let monsters = unique_ids("monster", file.monsters.iter().map(|m| m.id.as_str()))?;
        let weapons = unique_ids("weapon", file.weapons.iter().map(|w| w.id.as_str()))?;
        unique_ids("object", file.objects.iter().map(|o| o.id.as_str()))?;
        unique_ids("item", file.items.iter().map(|i| i.id.as_str()))?;

        for rule in &file.spawn_rules {
            if !monsters.contains(rule.template.as_str()) {
                bail!("spawn rule references unknown monster '{}'", rule.template);
            }
            if !(0.0..=1.0).contains(&rule.rate) {
                bail!("spawn rate {} for '{}' is outside [0, 1]", rule.rate, rule.template);
            }
        }
        for item in &file.items {
            match &item.kind {
                ItemKind::Weapon { weapon } if !weapons.contains(weapon.as_str()) => {
                    bail!("item '{}' grants unknown weapon '{weapon}'", item.id);
                }
                ItemKind::Consumable { effects } => check_effects(&item.id, effects, &monsters)?,
                ItemKind::Weapon { .. } => {}
            }
        }
        for object in &file.objects {
            check_effects(&object.id, &object.effects, &monsters)?;
        }
        Ok(())
    }
}

fn unique_ids<'a>(
    kind: &str,
    ids: impl Iterator<Item = &'a str>,
) -> LoadResult<BTreeSet<&'a str>> {
    let mut seen = BTreeSet::new();
    for id in ids {
        if !seen.insert(id) {
            bail!("duplicate {kind} id '{id}'");
        }
    }
    Ok(seen)
}

fn check_effects(owner: &str, effects: &[Effect], monsters: &BTreeSet<&str>) -> LoadResult<()> {
    for effect in effects {
        if let Effect::Spawn { template, .. } | Effect::Swarm { template, .. } = effect
            && !monsters.contains(template.as_str())
        {
            bail!("'{owner}' spawns unknown monster '{template}'");
        }
    }
    Ok(())
}
