use crate::state::{GridSize, Position};

/// Game configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    pub grid_rows: u32,
    pub grid_cols: u32,
    /// Edge length, in tiles, of one spatial-index bucket.
    pub spatial_cell_size: u32,
    /// Melee attackers allowed at once; never more than [`Self::ATTACK_SLOTS`].
    pub max_attackers: usize,

    pub spawn_min_distance: u32,
    pub spawn_max_distance: u32,
    pub spawn_attempts: u32,

    pub hide_max_charges: u32,
    pub hide_recharge_turns: u32,
    pub jaunt_max_charges: u32,
    pub jaunt_recharge_turns: u32,

    /// Damage die for an unarmed player (1..=N).
    pub unarmed_damage: u32,
    pub player_max_hp: u32,
    pub player_attack: i32,
    pub player_ac: i32,
    pub player_initiative: i32,
    pub player_spawn: Position,
    /// Weapon every new run starts with, equipped.
    pub default_weapon: Option<String>,

    pub inventory_capacity: usize,
    pub combat_log_capacity: usize,
}

impl GameConfig {
    // ===== compile-time constants used as type parameters =====
    /// Fixed diagonal positions around the player that attackers occupy.
    pub const ATTACK_SLOTS: usize = 4;
    /// Player plus every attack slot.
    pub const TURN_ORDER_LEN: usize = Self::ATTACK_SLOTS + 1;
    /// (row, col) offsets of the attack slots, indexed by slot number.
    pub const SLOT_OFFSETS: [(i32, i32); Self::ATTACK_SLOTS] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_GRID: u32 = 400;
    pub const DEFAULT_CELL_SIZE: u32 = 10;
    pub const DEFAULT_MAX_ATTACKERS: usize = 4;
    pub const DEFAULT_SPAWN_BAND: (u32, u32) = (5, 20);
    pub const DEFAULT_SPAWN_ATTEMPTS: u32 = 10;
    pub const DEFAULT_HIDE_MAX: u32 = 10;
    pub const DEFAULT_HIDE_RECHARGE: u32 = 5;
    pub const DEFAULT_JAUNT_MAX: u32 = 3;
    pub const DEFAULT_JAUNT_RECHARGE: u32 = 20;
    pub const DEFAULT_UNARMED_DAMAGE: u32 = 4;
    pub const DEFAULT_INVENTORY_CAPACITY: usize = 10;
    pub const DEFAULT_LOG_CAPACITY: usize = 50;

    pub fn new() -> Self {
        Self {
            grid_rows: Self::DEFAULT_GRID,
            grid_cols: Self::DEFAULT_GRID,
            spatial_cell_size: Self::DEFAULT_CELL_SIZE,
            max_attackers: Self::DEFAULT_MAX_ATTACKERS,
            spawn_min_distance: Self::DEFAULT_SPAWN_BAND.0,
            spawn_max_distance: Self::DEFAULT_SPAWN_BAND.1,
            spawn_attempts: Self::DEFAULT_SPAWN_ATTEMPTS,
            hide_max_charges: Self::DEFAULT_HIDE_MAX,
            hide_recharge_turns: Self::DEFAULT_HIDE_RECHARGE,
            jaunt_max_charges: Self::DEFAULT_JAUNT_MAX,
            jaunt_recharge_turns: Self::DEFAULT_JAUNT_RECHARGE,
            unarmed_damage: Self::DEFAULT_UNARMED_DAMAGE,
            player_max_hp: 100,
            player_attack: 4,
            player_ac: 14,
            player_initiative: 10,
            player_spawn: Position::new(395, 200),
            default_weapon: None,
            inventory_capacity: Self::DEFAULT_INVENTORY_CAPACITY,
            combat_log_capacity: Self::DEFAULT_LOG_CAPACITY,
        }
    }

    pub fn with_grid(rows: u32, cols: u32) -> Self {
        Self {
            grid_rows: rows,
            grid_cols: cols,
            ..Self::new()
        }
    }

    pub fn grid(&self) -> GridSize {
        GridSize::new(self.grid_rows, self.grid_cols)
    }

    /// Attack-slot capacity actually enforced.
    pub fn attacker_cap(&self) -> usize {
        self.max_attackers.min(Self::ATTACK_SLOTS)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
