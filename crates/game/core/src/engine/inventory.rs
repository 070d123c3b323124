//! Consumables and the weapon kit.

use super::errors::InventoryError;
use super::movement::add_weapon_to_kit;
use crate::effect;
use crate::env::{GameEnv, RollStream, WeaponKind};
use crate::state::{GameState, GroundItem, GroundItemKind, ItemId};

/// Applies a consumable's effects; it is used up if any of them took.
///
/// # Errors
///
/// [`InventoryError::UnknownItem`] if the player does not carry `item`.
pub fn use_item(state: &mut GameState, env: &GameEnv<'_>, item: ItemId) -> Result<bool, InventoryError> {
    ensure_alive(state)?;
    let carried = state
        .player
        .inventory
        .iter()
        .find(|i| i.id == item)
        .cloned()
        .ok_or(InventoryError::UnknownItem(item))?;

    let mut dice = env.dice(state, RollStream::Effect);
    let outcome = effect::apply_all(state, env, &mut dice, &carried.effects, &carried.name);
    if outcome.applied {
        state.player.inventory.retain(|i| i.id != item);
    }
    tracing::debug!(item = %carried.name, consumed = outcome.applied, "item used");
    Ok(outcome.applied)
}

/// Puts a consumable back on the ground under the player.
///
/// # Errors
///
/// [`InventoryError::UnknownItem`] if the player does not carry `item`.
pub fn drop_item(state: &mut GameState, item: ItemId) -> Result<(), InventoryError> {
    ensure_alive(state)?;
    let index = state
        .player
        .inventory
        .iter()
        .position(|i| i.id == item)
        .ok_or(InventoryError::UnknownItem(item))?;
    let carried = state.player.inventory.remove(index);
    state.world.items.push(GroundItem {
        id: carried.id,
        template: carried.template,
        name: carried.name,
        position: state.player.position,
        kind: GroundItemKind::Consumable {
            effects: carried.effects,
        },
    });
    Ok(())
}

/// # Errors
///
/// [`InventoryError::UnknownWeapon`] if the catalogue lacks `weapon`.
pub fn add_weapon(state: &mut GameState, env: &GameEnv<'_>, weapon: &str) -> Result<(), InventoryError> {
    ensure_alive(state)?;
    if add_weapon_to_kit(state, env, weapon) {
        Ok(())
    } else {
        Err(InventoryError::UnknownWeapon(weapon.to_owned()))
    }
}

/// # Errors
///
/// [`InventoryError::NotOwned`] unless `weapon` is a carried melee weapon.
pub fn equip_weapon(state: &mut GameState, weapon: &str) -> Result<(), InventoryError> {
    ensure_alive(state)?;
    if !state.player.weapons.iter().any(|w| w == weapon) {
        return Err(InventoryError::NotOwned(weapon.to_owned()));
    }
    state.player.equipped_weapon = Some(weapon.to_owned());
    Ok(())
}

/// # Errors
///
/// [`InventoryError::NotOwned`] unless `weapon` is a carried ranged weapon.
pub fn equip_ranged_weapon(state: &mut GameState, weapon: &str) -> Result<(), InventoryError> {
    ensure_alive(state)?;
    if !state.player.ranged_weapons.iter().any(|w| w == weapon) {
        return Err(InventoryError::NotOwned(weapon.to_owned()));
    }
    state.player.equipped_ranged = Some(weapon.to_owned());
    Ok(())
}

/// Leaves a weapon on the player's cell. Permanent weapons stay.
///
/// # Errors
///
/// [`InventoryError::NotOwned`], [`InventoryError::Permanent`] or
/// [`InventoryError::UnknownWeapon`].
pub fn drop_weapon(state: &mut GameState, env: &GameEnv<'_>, weapon: &str) -> Result<(), InventoryError> {
    ensure_alive(state)?;
    let template = env
        .templates()
        .weapon(weapon)
        .ok_or_else(|| InventoryError::UnknownWeapon(weapon.to_owned()))?;
    if template.permanent {
        return Err(InventoryError::Permanent(weapon.to_owned()));
    }

    let player = &mut state.player;
    let (list, equipped) = match template.kind {
        WeaponKind::Melee => (&mut player.weapons, &mut player.equipped_weapon),
        WeaponKind::Ranged => (&mut player.ranged_weapons, &mut player.equipped_ranged),
    };
    let index = list
        .iter()
        .position(|w| w == weapon)
        .ok_or_else(|| InventoryError::NotOwned(weapon.to_owned()))?;
    list.remove(index);
    if equipped.as_deref() == Some(weapon) {
        *equipped = None;
        if template.kind == WeaponKind::Ranged {
            state.ranged.deactivate();
        }
    }

    let id = state.world.allocate_item_id();
    state.world.items.push(GroundItem {
        id,
        template: template.id.clone(),
        name: template.name.clone(),
        position: state.player.position,
        kind: GroundItemKind::Weapon {
            weapon: template.id.clone(),
        },
    });
    Ok(())
}

fn ensure_alive(state: &GameState) -> Result<(), InventoryError> {
    if state.is_game_over() {
        return Err(InventoryError::PlayerDead);
    }
    Ok(())
}
