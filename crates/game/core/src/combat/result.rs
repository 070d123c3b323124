//! Combat result types and attack resolution.

use super::damage::calculate_damage;
use super::hit::{AttackProfile, DefenseProfile, attack_total, check_hit};
use crate::env::{Dice, WeaponTemplate};
use crate::state::{Monster, PlayerState};

/// Outcome of an attack attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AttackOutcome {
    Miss,
    Hit,
    /// Natural 20: always hits, damage die doubled.
    Critical,
}

impl AttackOutcome {
    pub const fn is_hit(self) -> bool {
        !matches!(self, Self::Miss)
    }
}

/// Result of a combat resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttackResult {
    pub roll: u32,
    pub total: i32,
    pub outcome: AttackOutcome,
    /// Damage dealt (None if miss).
    pub damage: Option<u32>,
}

/// Rolls the d20 and, on a hit, the damage die.
pub fn resolve_attack(
    dice: &mut Dice<'_>,
    attacker: &AttackProfile,
    defender: &DefenseProfile,
) -> AttackResult {
    let roll = dice.d20();
    let outcome = check_hit(roll, attacker, defender);
    let damage = outcome.is_hit().then(|| {
        let base = dice.range(1, attacker.damage_die.max(1));
        calculate_damage(base, outcome == AttackOutcome::Critical, attacker.str_mod)
    });
    AttackResult {
        roll,
        total: attack_total(roll, attacker),
        outcome,
        damage,
    }
}

/// The player's attack: base attack plus the weapon's to-hit and damage die.
pub fn player_profile(
    player: &PlayerState,
    weapon: Option<&WeaponTemplate>,
    unarmed_damage: u32,
) -> AttackProfile {
    AttackProfile {
        attack_bonus: player.attack,
        str_mod: player.attributes.str_mod(),
        to_hit: weapon.map_or(0, |w| w.hit_bonus),
        damage_die: weapon.map_or(unarmed_damage, |w| w.damage),
    }
}

/// A monster attacks with its template attack, which is also its damage die.
pub fn monster_profile(monster: &Monster) -> AttackProfile {
    AttackProfile {
        attack_bonus: monster.attack,
        str_mod: monster.attributes.str_mod(),
        to_hit: 0,
        damage_die: monster.attack.max(1) as u32,
    }
}

pub fn player_defense(player: &PlayerState) -> DefenseProfile {
    DefenseProfile {
        ac: player.ac,
        dex_mod: player.attributes.dex_mod(),
    }
}

pub fn monster_defense(monster: &Monster) -> DefenseProfile {
    DefenseProfile {
        ac: monster.ac,
        dex_mod: monster.attributes.dex_mod(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{FixedRng, RollStream};

    #[test]
    fn forced_roll_resolves_hit_with_minimum_damage() {
        let rng = FixedRng::d20(15);
        let mut dice = Dice::new(&rng, 0, 0, RollStream::Combat);
        let attacker = AttackProfile {
            attack_bonus: 4,
            str_mod: 0,
            to_hit: 0,
            damage_die: 4,
        };
        let defender = DefenseProfile { ac: 12, dex_mod: 0 };

        let result = resolve_attack(&mut dice, &attacker, &defender);
        assert_eq!(result.roll, 15);
        assert_eq!(result.outcome, AttackOutcome::Hit);
        // FixedRng(14): 1 + 14 % 4
        assert_eq!(result.damage, Some(3));
    }

    #[test]
    fn miss_rolls_no_damage() {
        let rng = FixedRng::d20(2);
        let mut dice = Dice::new(&rng, 0, 0, RollStream::Combat);
        let attacker = AttackProfile::default();
        let defender = DefenseProfile { ac: 30, dex_mod: 0 };

        let result = resolve_attack(&mut dice, &attacker, &defender);
        assert_eq!(result.outcome, AttackOutcome::Miss);
        assert_eq!(result.damage, None);
        assert_eq!(dice.draws(), 1);
    }
}
