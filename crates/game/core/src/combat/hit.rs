//! d20 attack rolls.

use super::result::AttackOutcome;

/// Die face that always hits and doubles damage.
pub const NATURAL_CRITICAL: u32 = 20;

/// Offensive side of an attack roll.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct AttackProfile {
    /// Player's base attack, or the monster's template attack.
    pub attack_bonus: i32,
    /// STR modifier of the attacker.
    pub str_mod: i32,
    /// Weapon to-hit bonus (0 for monsters and unarmed attacks).
    pub to_hit: i32,
    /// Damage die size: a hit rolls `1..=damage_die`.
    pub damage_die: u32,
}

/// Defensive side of an attack roll.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct DefenseProfile {
    pub ac: i32,
    pub dex_mod: i32,
}

impl DefenseProfile {
    pub const fn effective_ac(&self) -> i32 {
        self.ac + self.dex_mod
    }
}

/// `roll + attack_bonus + STR mod + to_hit`.
pub const fn attack_total(roll: u32, attacker: &AttackProfile) -> i32 {
    roll as i32 + attacker.attack_bonus + attacker.str_mod + attacker.to_hit
}

/// Compares the attack total against `AC + DEX mod`; a natural 20 is a
/// critical regardless of the totals.
///
/// # Formula
///
/// ```text
/// critical  if roll == 20
/// hit       if roll + attack + str_mod + to_hit >= ac + dex_mod
/// miss      otherwise
/// ```
pub fn check_hit(roll: u32, attacker: &AttackProfile, defender: &DefenseProfile) -> AttackOutcome {
    if roll == NATURAL_CRITICAL {
        AttackOutcome::Critical
    } else if attack_total(roll, attacker) >= defender.effective_ac() {
        AttackOutcome::Hit
    } else {
        AttackOutcome::Miss
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAYER: AttackProfile = AttackProfile {
        attack_bonus: 4,
        str_mod: 0,
        to_hit: 0,
        damage_die: 4,
    };

    #[test]
    fn forced_fifteen_hits_armor_twelve() {
        let abhuman = DefenseProfile { ac: 12, dex_mod: 0 };
        assert_eq!(check_hit(15, &PLAYER, &abhuman), AttackOutcome::Hit);
        assert_eq!(attack_total(15, &PLAYER), 19);
    }

    #[test]
    fn low_roll_misses_and_natural_twenty_always_lands() {
        let fortress = DefenseProfile { ac: 40, dex_mod: 3 };
        assert_eq!(check_hit(2, &PLAYER, &fortress), AttackOutcome::Miss);
        assert_eq!(check_hit(19, &PLAYER, &fortress), AttackOutcome::Miss);
        assert_eq!(check_hit(20, &PLAYER, &fortress), AttackOutcome::Critical);
    }

    #[test]
    fn meeting_armor_exactly_is_a_hit() {
        let target = DefenseProfile { ac: 14, dex_mod: 1 };
        assert_eq!(check_hit(11, &PLAYER, &target), AttackOutcome::Hit);
        assert_eq!(check_hit(10, &PLAYER, &target), AttackOutcome::Miss);
    }
}
