use super::{AbilityError, recharge};
use crate::config::GameConfig;
use crate::state::{Ability, GameState};

/// Flips concealment. Returns the new `active` flag.
///
/// Turning it off is always allowed; turning it on needs the unlock and at
/// least one charge.
///
/// # Errors
///
/// [`AbilityError::Locked`] or [`AbilityError::NoCharges`] when activating.
pub fn toggle_hide(state: &mut GameState) -> Result<bool, AbilityError> {
    let hide = &mut state.player.hide;
    if hide.active {
        hide.active = false;
        tracing::debug!(charges = hide.charges, "hide deactivated");
        return Ok(false);
    }
    if state.is_game_over() {
        return Err(AbilityError::PlayerDead);
    }
    if !state.player.has_unlocked(Ability::Hide) {
        return Err(AbilityError::Locked(Ability::Hide));
    }
    let hide = &mut state.player.hide;
    if hide.charges == 0 {
        return Err(AbilityError::NoCharges(Ability::Hide));
    }
    hide.active = true;
    tracing::debug!(charges = hide.charges, "hide activated");
    Ok(true)
}

/// Spends a charge while hidden, recharges while not.
pub fn tick_hide(state: &mut GameState, config: &GameConfig) {
    if !state.player.has_unlocked(Ability::Hide) {
        return;
    }
    let hide = &mut state.player.hide;
    if hide.active {
        hide.charges = hide.charges.saturating_sub(1);
        if hide.charges == 0 {
            hide.active = false;
            tracing::debug!("hide ran out of charges");
        }
        return;
    }
    let recharging = recharge(
        &mut hide.charges,
        &mut hide.progress,
        config.hide_max_charges,
        config.hide_recharge_turns,
    );
    if !recharging {
        hide.progress = 0;
    }
}
