//! Merges static templates with runtime instance data.
//!
//! Instance fields always win over template defaults. Batch hydration fails
//! fast on the first instance that names an unknown template: that is a
//! broken catalogue or level file, not something gameplay can recover from.

use strum::Display;

use crate::env::{ItemKind, MonsterTemplate, ObjectTemplate, TemplateOracle};
use crate::error::{ErrorSeverity, GameError};
use crate::state::{
    EntityId, Footprint, GridSize, GroundItem, GroundItemKind, ItemId, Monster, MonsterState,
    ObjectId, Position, WorldObject,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum TemplateKind {
    Monster,
    Object,
    Item,
    Weapon,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum HydrationError {
    #[error("{kind} template '{id}' not found")]
    TemplateNotFound { kind: TemplateKind, id: String },
}

impl GameError for HydrationError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }
}

/// Runtime data for one monster, as placed by a level or a spawn.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MonsterInstance {
    pub id: Option<EntityId>,
    pub template: String,
    pub position: Position,
    pub hp: Option<u32>,
    pub state: Option<MonsterState>,
}

impl MonsterInstance {
    pub fn new(template: impl Into<String>, position: Position) -> Self {
        Self {
            template: template.into(),
            position,
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ObjectInstance {
    pub id: u32,
    pub template: String,
    pub position: Position,
    pub footprint: Option<Footprint>,
    pub solid: Option<bool>,
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ItemInstance {
    pub template: String,
    pub position: Position,
}

/// Everything a level file places on the grid.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LevelData {
    pub id: String,
    pub grid: GridSize,
    pub player_spawn: Position,
    pub turns_per_hit_point: u32,
    pub monsters: Vec<MonsterInstance>,
    pub objects: Vec<ObjectInstance>,
    pub items: Vec<ItemInstance>,
}

/// Hydrates one monster. `id` is used when the instance carries none.
pub fn hydrate_monster(template: &MonsterTemplate, instance: &MonsterInstance, id: EntityId) -> Monster {
    let max_hp = template.hp.max(1);
    Monster {
        id: instance.id.unwrap_or(id),
        template: template.id.clone(),
        name: template.name.clone(),
        image: template.image.clone(),
        position: instance.position,
        hp: instance.hp.unwrap_or(max_hp).min(max_hp),
        max_hp,
        attack: template.attack,
        ac: template.ac,
        move_rate: template.move_rate,
        initiative: template.initiative,
        attributes: template.attributes,
        footprint: template.footprint,
        state: instance.state.unwrap_or_default(),
        stunned_turns: 0,
    }
}

/// Hydrates a batch of monsters, drawing ids from `allocate` for instances
/// without a usable one.
///
/// # Errors
///
/// [`HydrationError::TemplateNotFound`] for the first unknown template.
pub fn hydrate_monsters(
    instances: &[MonsterInstance],
    templates: &(impl TemplateOracle + ?Sized),
    mut allocate: impl FnMut() -> EntityId,
) -> Result<Vec<Monster>, HydrationError> {
    instances
        .iter()
        .map(|instance| {
            let template = templates.monster(&instance.template).ok_or_else(|| {
                HydrationError::TemplateNotFound {
                    kind: TemplateKind::Monster,
                    id: instance.template.clone(),
                }
            })?;
            let id = match instance.id {
                Some(id) if id.is_assignable() => id,
                _ => allocate(),
            };
            let instance = MonsterInstance {
                id: Some(id),
                ..instance.clone()
            };
            Ok(hydrate_monster(template, &instance, id))
        })
        .collect()
}

pub fn hydrate_object(template: &ObjectTemplate, instance: &ObjectInstance) -> WorldObject {
    WorldObject {
        id: ObjectId(instance.id),
        template: template.id.clone(),
        name: template.name.clone(),
        image: template.image.clone(),
        position: instance.position,
        footprint: instance.footprint.unwrap_or(template.footprint),
        solid: instance.solid.unwrap_or(template.solid),
        effects: template.effects.clone(),
        cooldown_turns: template.cooldown_turns,
        last_triggered: None,
    }
}

/// # Errors
///
/// [`HydrationError::TemplateNotFound`] for the first unknown template.
pub fn hydrate_objects(
    instances: &[ObjectInstance],
    templates: &(impl TemplateOracle + ?Sized),
) -> Result<Vec<WorldObject>, HydrationError> {
    instances
        .iter()
        .map(|instance| {
            templates
                .object(&instance.template)
                .map(|template| hydrate_object(template, instance))
                .ok_or_else(|| HydrationError::TemplateNotFound {
                    kind: TemplateKind::Object,
                    id: instance.template.clone(),
                })
        })
        .collect()
}

/// # Errors
///
/// [`HydrationError::TemplateNotFound`] if the item, or the weapon it
/// grants, is not in the catalogue.
pub fn hydrate_item(
    instance: &ItemInstance,
    id: ItemId,
    templates: &(impl TemplateOracle + ?Sized),
) -> Result<GroundItem, HydrationError> {
    let template =
        templates
            .item(&instance.template)
            .ok_or_else(|| HydrationError::TemplateNotFound {
                kind: TemplateKind::Item,
                id: instance.template.clone(),
            })?;
    let kind = match &template.kind {
        ItemKind::Consumable { effects } => GroundItemKind::Consumable {
            effects: effects.clone(),
        },
        ItemKind::Weapon { weapon } => {
            if templates.weapon(weapon).is_none() {
                return Err(HydrationError::TemplateNotFound {
                    kind: TemplateKind::Weapon,
                    id: weapon.clone(),
                });
            }
            GroundItemKind::Weapon {
                weapon: weapon.clone(),
            }
        }
    };
    Ok(GroundItem {
        id,
        template: template.id.clone(),
        name: template.name.clone(),
        position: instance.position,
        kind,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::TemplateCatalog;
    use crate::state::Attributes;

    fn abhuman() -> MonsterTemplate {
        MonsterTemplate {
            id: "abhuman".into(),
            name: "Abhuman".into(),
            image: "abhuman.png".into(),
            hp: 12,
            attack: 5,
            ac: 12,
            move_rate: 2,
            initiative: 3,
            attributes: Attributes::new(16, 8, 10, 10, 10, 8),
            footprint: Footprint::SINGLE,
        }
    }

    #[test]
    fn instance_fields_override_template() {
        let instance = MonsterInstance {
            id: Some(EntityId(9)),
            hp: Some(4),
            state: Some(MonsterState::Waiting { ticket: 2 }),
            ..MonsterInstance::new("abhuman", Position::new(3, 4))
        };
        let monster = hydrate_monster(&abhuman(), &instance, EntityId(1));
        assert_eq!(monster.id, EntityId(9));
        assert_eq!(monster.hp, 4);
        assert_eq!(monster.max_hp, 12);
        assert_eq!(monster.position, Position::new(3, 4));
        assert_eq!(monster.state, MonsterState::Waiting { ticket: 2 });
        assert_eq!(monster.attributes.str_mod(), 3);
    }

    #[test]
    fn missing_hp_means_full_health_and_excess_is_clamped() {
        let fresh = hydrate_monster(
            &abhuman(),
            &MonsterInstance::new("abhuman", Position::ORIGIN),
            EntityId(1),
        );
        assert_eq!(fresh.hp, 12);

        let overfull = MonsterInstance {
            hp: Some(99),
            ..MonsterInstance::new("abhuman", Position::ORIGIN)
        };
        assert_eq!(hydrate_monster(&abhuman(), &overfull, EntityId(1)).hp, 12);
    }

    #[test]
    fn batch_fails_on_unknown_template() {
        let catalog = TemplateCatalog::new().with_monster(abhuman());
        let instances = vec![
            MonsterInstance::new("abhuman", Position::ORIGIN),
            MonsterInstance::new("wyrm", Position::ORIGIN),
        ];
        let mut next = 0;
        let err = hydrate_monsters(&instances, &catalog, || {
            next += 1;
            EntityId(next)
        })
        .unwrap_err();
        assert_eq!(
            err,
            HydrationError::TemplateNotFound {
                kind: TemplateKind::Monster,
                id: "wyrm".into()
            }
        );
        assert_eq!(err.to_string(), "monster template 'wyrm' not found");
        assert_eq!(err.severity(), ErrorSeverity::Validation);
    }

    #[test]
    fn batch_replaces_reserved_ids() {
        let catalog = TemplateCatalog::new().with_monster(abhuman());
        let instances = vec![
            MonsterInstance {
                id: Some(EntityId::PLAYER),
                ..MonsterInstance::new("abhuman", Position::ORIGIN)
            },
            MonsterInstance::new("abhuman", Position::new(1, 1)),
        ];
        let mut next = 10;
        let monsters = hydrate_monsters(&instances, &catalog, || {
            next += 1;
            EntityId(next)
        })
        .unwrap();
        assert_eq!(monsters[0].id, EntityId(11));
        assert_eq!(monsters[1].id, EntityId(12));
    }
}
