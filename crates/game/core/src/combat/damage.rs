//! Damage calculation and application.

/// Final damage of a landed blow.
///
/// # Formula
///
/// ```text
/// dealt = (critical ? 2 × base : base) + str_mod
/// final = max(dealt, 1)
/// ```
pub fn calculate_damage(base: u32, critical: bool, str_mod: i32) -> u32 {
    let base = if critical { base.saturating_mul(2) } else { base };
    let dealt = i64::from(base) + i64::from(str_mod);
    dealt.max(1) as u32
}

/// Apply damage to current HP (clamped to 0).
pub fn apply_damage(current_hp: u32, damage: u32) -> u32 {
    current_hp.saturating_sub(damage)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn critical_doubles_before_the_modifier() {
        assert_eq!(calculate_damage(3, false, 2), 5);
        assert_eq!(calculate_damage(3, true, 2), 8);
    }

    #[test]
    fn weak_blows_still_deal_one() {
        assert_eq!(calculate_damage(1, false, -4), 1);
        assert_eq!(calculate_damage(0, true, 0), 1);
    }

    #[test]
    fn hp_never_underflows() {
        assert_eq!(apply_damage(5, 8), 0);
        assert_eq!(apply_damage(12, 3), 9);
    }
}
