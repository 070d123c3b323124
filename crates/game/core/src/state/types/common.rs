use std::fmt;

/// Unique identifier for any entity tracked in the state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub u32);

impl EntityId {
    /// Reserved identifier for the controllable player character.
    pub const PLAYER: Self = Self(0);

    /// Reserved identifier for system-level bookkeeping.
    ///
    /// Never handed out to monsters; a monster carrying it was not assigned a
    /// stable id and is ignored by the movement pass.
    pub const SYSTEM: Self = Self(u32::MAX);

    /// Returns true if this entity represents a system actor.
    #[inline]
    pub const fn is_system(self) -> bool {
        self.0 == Self::SYSTEM.0
    }

    /// Returns true if this entity represents the player.
    #[inline]
    pub const fn is_player(self) -> bool {
        self.0 == Self::PLAYER.0
    }

    /// Returns true if this id is one a monster may legitimately carry.
    #[inline]
    pub const fn is_assignable(self) -> bool {
        !self.is_player() && !self.is_system()
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::SYSTEM
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Discrete grid position expressed in (row, col) tile coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub const ORIGIN: Self = Self { row: 0, col: 0 };

    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    pub const fn offset(self, d_row: i32, d_col: i32) -> Self {
        Self {
            row: self.row + d_row,
            col: self.col + d_col,
        }
    }

    pub fn step(self, direction: Direction) -> Self {
        let (d_row, d_col) = direction.delta();
        self.offset(d_row, d_col)
    }

    pub fn manhattan(self, other: Self) -> u32 {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// Chessboard distance; 1 means the two cells touch, diagonals included.
    pub fn chebyshev(self, other: Self) -> u32 {
        self.row.abs_diff(other.row).max(self.col.abs_diff(other.col))
    }

    pub fn euclidean(self, other: Self) -> f64 {
        let d_row = f64::from(self.row - other.row);
        let d_col = f64::from(self.col - other.col);
        (d_row * d_row + d_col * d_col).sqrt()
    }

    pub fn is_adjacent(self, other: Self) -> bool {
        self.chebyshev(other) == 1
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Bounds of the playable grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridSize {
    pub rows: u32,
    pub cols: u32,
}

impl GridSize {
    pub const fn new(rows: u32, cols: u32) -> Self {
        Self { rows, cols }
    }

    pub fn contains(&self, position: Position) -> bool {
        position.row >= 0
            && position.col >= 0
            && (position.row as u32) < self.rows
            && (position.col as u32) < self.cols
    }

    /// Clamps a position into the grid bounds.
    pub fn clamp(&self, position: Position) -> Position {
        let max_row = self.rows.saturating_sub(1) as i32;
        let max_col = self.cols.saturating_sub(1) as i32;
        Position::new(position.row.clamp(0, max_row), position.col.clamp(0, max_col))
    }

    pub fn center(&self) -> Position {
        Position::new((self.rows / 2) as i32, (self.cols / 2) as i32)
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self::new(400, 400)
    }
}

/// Tile extent of a multi-tile entity, anchored at its top-left position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Footprint {
    pub rows: u32,
    pub cols: u32,
}

impl Footprint {
    pub const SINGLE: Self = Self { rows: 1, cols: 1 };

    pub const fn new(rows: u32, cols: u32) -> Self {
        Self { rows, cols }
    }

    /// Returns true if an entity anchored at `origin` covers `cell`.
    pub fn covers(&self, origin: Position, cell: Position) -> bool {
        let d_row = cell.row - origin.row;
        let d_col = cell.col - origin.col;
        d_row >= 0 && d_col >= 0 && (d_row as u32) < self.rows && (d_col as u32) < self.cols
    }

    /// Bottom-right cell covered when anchored at `origin`.
    pub fn last_cell(&self, origin: Position) -> Position {
        origin.offset(
            self.rows.max(1) as i32 - 1,
            self.cols.max(1) as i32 - 1,
        )
    }
}

impl Default for Footprint {
    fn default() -> Self {
        Self::SINGLE
    }
}

/// Cardinal step direction on the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// (row, col) delta of one step.
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (-1, 0),
            Self::Down => (1, 0),
            Self::Left => (0, -1),
            Self::Right => (0, 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_pulls_far_targets_onto_the_last_cell() {
        let grid = GridSize::new(500, 500);
        assert_eq!(grid.clamp(Position::new(600, 600)), Position::new(499, 499));
        assert_eq!(grid.clamp(Position::new(-3, 12)), Position::new(0, 12));
    }

    #[test]
    fn footprint_covers_its_rectangle_only() {
        let fp = Footprint::new(2, 3);
        let origin = Position::new(10, 10);
        assert!(fp.covers(origin, Position::new(11, 12)));
        assert!(!fp.covers(origin, Position::new(12, 10)));
        assert!(!fp.covers(origin, Position::new(9, 10)));
        assert_eq!(fp.last_cell(origin), Position::new(11, 12));
    }

    #[test]
    fn adjacency_includes_diagonals() {
        let p = Position::new(5, 5);
        assert!(p.is_adjacent(Position::new(4, 4)));
        assert!(p.is_adjacent(Position::new(5, 6)));
        assert!(!p.is_adjacent(p));
        assert!(!p.is_adjacent(Position::new(7, 5)));
    }
}
