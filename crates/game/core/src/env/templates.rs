//! Read-only template catalogue consumed by hydration and spawning.

use std::collections::BTreeMap;

use crate::effect::Effect;
use crate::state::{Attributes, Footprint};

/// Static monster definition keyed by a short name (e.g. `"abhuman"`).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonsterTemplate {
    pub id: String,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub image: String,
    pub hp: u32,
    pub attack: i32,
    pub ac: i32,
    pub move_rate: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub initiative: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub attributes: Attributes,
    #[cfg_attr(feature = "serde", serde(default))]
    pub footprint: Footprint,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum WeaponKind {
    #[default]
    Melee,
    Ranged,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeaponTemplate {
    pub id: String,
    pub name: String,
    /// Damage die size: a hit rolls `1..=damage`.
    pub damage: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub hit_bonus: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub kind: WeaponKind,
    /// Permanent weapons cannot be dropped.
    #[cfg_attr(feature = "serde", serde(default))]
    pub permanent: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectTemplate {
    pub id: String,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub image: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub footprint: Footprint,
    #[cfg_attr(feature = "serde", serde(default))]
    pub solid: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub effects: Vec<Effect>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub cooldown_turns: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ItemKind {
    Consumable { effects: Vec<Effect> },
    Weapon { weapon: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemTemplate {
    pub id: String,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub image: String,
    pub kind: ItemKind,
}

/// Population rule: at most `max_instances` live monsters of `template`,
/// each spawn check adding one with probability `rate`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpawnRule {
    pub template: String,
    pub rate: f64,
    pub max_instances: u32,
}

impl SpawnRule {
    pub fn new(template: impl Into<String>, rate: f64, max_instances: u32) -> Self {
        Self {
            template: template.into(),
            rate: rate.clamp(0.0, 1.0),
            max_instances,
        }
    }
}

/// Read-only access to monster, weapon, object and item templates.
pub trait TemplateOracle: Send + Sync {
    fn monster(&self, id: &str) -> Option<&MonsterTemplate>;

    fn weapon(&self, id: &str) -> Option<&WeaponTemplate>;

    fn object(&self, id: &str) -> Option<&ObjectTemplate>;

    fn item(&self, id: &str) -> Option<&ItemTemplate>;

    /// Spawn rules evaluated, in order, on every spawn check.
    fn spawn_rules(&self) -> &[SpawnRule];
}

/// In-memory catalogue backed by ordered maps.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TemplateCatalog {
    monsters: BTreeMap<String, MonsterTemplate>,
    weapons: BTreeMap<String, WeaponTemplate>,
    objects: BTreeMap<String, ObjectTemplate>,
    items: BTreeMap<String, ItemTemplate>,
    spawn_rules: Vec<SpawnRule>,
}

impl TemplateCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_monster(mut self, template: MonsterTemplate) -> Self {
        self.add_monster(template);
        self
    }

    pub fn with_weapon(mut self, template: WeaponTemplate) -> Self {
        self.add_weapon(template);
        self
    }

    pub fn with_object(mut self, template: ObjectTemplate) -> Self {
        self.add_object(template);
        self
    }

    pub fn with_item(mut self, template: ItemTemplate) -> Self {
        self.add_item(template);
        self
    }

    pub fn with_spawn_rule(mut self, rule: SpawnRule) -> Self {
        self.spawn_rules.push(rule);
        self
    }

    pub fn add_monster(&mut self, template: MonsterTemplate) {
        self.monsters.insert(template.id.clone(), template);
    }

    pub fn add_weapon(&mut self, template: WeaponTemplate) {
        self.weapons.insert(template.id.clone(), template);
    }

    pub fn add_object(&mut self, template: ObjectTemplate) {
        self.objects.insert(template.id.clone(), template);
    }

    pub fn add_item(&mut self, template: ItemTemplate) {
        self.items.insert(template.id.clone(), template);
    }

    pub fn set_spawn_rules(&mut self, rules: Vec<SpawnRule>) {
        self.spawn_rules = rules;
    }

    pub fn monster_count(&self) -> usize {
        self.monsters.len()
    }
}

impl TemplateOracle for TemplateCatalog {
    fn monster(&self, id: &str) -> Option<&MonsterTemplate> {
        self.monsters.get(id)
    }

    fn weapon(&self, id: &str) -> Option<&WeaponTemplate> {
        self.weapons.get(id)
    }

    fn object(&self, id: &str) -> Option<&ObjectTemplate> {
        self.objects.get(id)
    }

    fn item(&self, id: &str) -> Option<&ItemTemplate> {
        self.items.get(id)
    }

    fn spawn_rules(&self) -> &[SpawnRule] {
        &self.spawn_rules
    }
}
