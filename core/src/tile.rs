use alloc::string::{String, ToString};
use serde::{Deserialize, Serialize};

use crate::*;

/// What occupies a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    Number(TileValue),
    /// Obstacle that only merges with another blocker, annihilating both.
    Blocker,
}

impl TileKind {
    pub const fn value(self) -> Option<TileValue> {
        match self {
            Self::Number(value) => Some(value),
            Self::Blocker => None,
        }
    }

    /// Kind compatibility regardless of per-turn flags.
    pub const fn merges_with(self, other: Self) -> bool {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::Blocker, Self::Blocker) => true,
            _ => false,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    pub kind: TileKind,
    pub row: Coord,
    pub col: Coord,
    /// Spawned this turn.
    pub is_new: bool,
    /// Produced by a merge this turn.
    pub is_merged: bool,
}

impl Tile {
    pub const fn with_value(id: TileId, value: TileValue, position: Position) -> Self {
        Self {
            id,
            kind: TileKind::Number(value),
            row: position.row,
            col: position.col,
            is_new: true,
            is_merged: false,
        }
    }

    pub const fn blocker(id: TileId, position: Position) -> Self {
        Self {
            id,
            kind: TileKind::Blocker,
            row: position.row,
            col: position.col,
            is_new: true,
            is_merged: false,
        }
    }

    pub const fn position(&self) -> Position {
        Position::new(self.row, self.col)
    }

    pub const fn value(&self) -> Option<TileValue> {
        self.kind.value()
    }

    pub const fn is_blocker(&self) -> bool {
        matches!(self.kind, TileKind::Blocker)
    }

    pub const fn can_merge_with(&self, other: &Tile) -> bool {
        !self.is_merged && !other.is_merged && self.kind.merges_with(other.kind)
    }

    /// Returns the tile with both turn flags cleared.
    pub const fn settled(mut self) -> Self {
        self.is_new = false;
        self.is_merged = false;
        self
    }

    pub(crate) const fn moved_to(mut self, position: Position) -> Self {
        self.row = position.row;
        self.col = position.col;
        self
    }

    /// Text drawn on the tile face, empty for blockers.
    pub fn label(&self) -> String {
        match self.kind {
            TileKind::Number(value) => value.to_string(),
            TileKind::Blocker => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: Position = Position::new(0, 0);

    #[test]
    fn new_tiles_are_flagged_new_and_unmerged() {
        let tile = Tile::with_value(1, 8, Position::new(2, 3));
        assert!(tile.is_new);
        assert!(!tile.is_merged);
        assert_eq!(tile.position(), Position::new(2, 3));
        assert_eq!(tile.value(), Some(8));

        let blocker = Tile::blocker(2, ORIGIN);
        assert!(blocker.is_new);
        assert!(blocker.is_blocker());
        assert_eq!(blocker.value(), None);
    }

    #[test]
    fn equal_values_merge_but_mixed_kinds_never_do() {
        let two = Tile::with_value(1, 2, ORIGIN);
        let other_two = Tile::with_value(2, 2, ORIGIN);
        let four = Tile::with_value(3, 4, ORIGIN);
        let blocker = Tile::blocker(4, ORIGIN);
        let other_blocker = Tile::blocker(5, ORIGIN);

        assert!(two.can_merge_with(&other_two));
        assert!(!two.can_merge_with(&four));
        assert!(!two.can_merge_with(&blocker));
        assert!(!blocker.can_merge_with(&two));
        assert!(blocker.can_merge_with(&other_blocker));
    }

    #[test]
    fn merged_tiles_refuse_second_merge() {
        let mut merged = Tile::with_value(1, 4, ORIGIN);
        merged.is_merged = true;
        let four = Tile::with_value(2, 4, ORIGIN);

        assert!(!merged.can_merge_with(&four));
        assert!(!four.can_merge_with(&merged));
        assert!(merged.settled().can_merge_with(&four));
    }

    #[test]
    fn label_shows_value_only_for_numbers() {
        assert_eq!(Tile::with_value(1, 512, ORIGIN).label(), "512");
        assert_eq!(Tile::blocker(2, ORIGIN).label(), "");
    }
}
