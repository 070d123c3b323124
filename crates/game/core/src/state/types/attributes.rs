/// The six core attributes that drive combat modifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Attributes {
    pub strength: i32,
    pub intellect: i32,
    pub dexterity: i32,
    pub willpower: i32,
    pub wisdom: i32,
    pub charisma: i32,
}

impl Attributes {
    /// Score at which an attribute grants no modifier.
    pub const BASELINE: i32 = 10;

    pub const fn new(
        strength: i32,
        intellect: i32,
        dexterity: i32,
        willpower: i32,
        wisdom: i32,
        charisma: i32,
    ) -> Self {
        Self {
            strength,
            intellect,
            dexterity,
            willpower,
            wisdom,
            charisma,
        }
    }

    pub const fn baseline() -> Self {
        Self::new(
            Self::BASELINE,
            Self::BASELINE,
            Self::BASELINE,
            Self::BASELINE,
            Self::BASELINE,
            Self::BASELINE,
        )
    }

    /// `floor((score - 10) / 2)`, rounding toward negative infinity.
    pub const fn modifier(score: i32) -> i32 {
        (score - Self::BASELINE).div_euclid(2)
    }

    pub const fn str_mod(&self) -> i32 {
        Self::modifier(self.strength)
    }

    pub const fn dex_mod(&self) -> i32 {
        Self::modifier(self.dexterity)
    }
}

impl Default for Attributes {
    fn default() -> Self {
        Self::baseline()
    }
}
