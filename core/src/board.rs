use alloc::vec::Vec;
use core::fmt;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// The 5x5 grid. Every occupied cell holds a tile whose `row`/`col` match the cell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBoard")]
pub struct Board {
    cells: Array2<Option<Tile>>,
}

#[derive(Deserialize)]
struct RawBoard {
    cells: Array2<Option<Tile>>,
}

impl TryFrom<RawBoard> for Board {
    type Error = GameError;

    fn try_from(raw: RawBoard) -> Result<Self> {
        Board::from_cells(raw.cells)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl Board {
    pub fn empty() -> Self {
        Self {
            cells: Array2::default([BOARD_SIZE as usize, BOARD_SIZE as usize]),
        }
    }

    pub fn from_cells(cells: Array2<Option<Tile>>) -> Result<Self> {
        if cells.dim() != (BOARD_SIZE as usize, BOARD_SIZE as usize) {
            return Err(GameError::InvalidBoardShape);
        }

        for ((row, col), cell) in cells.indexed_iter() {
            if let Some(tile) = cell {
                if usize::from(tile.row) != row || usize::from(tile.col) != col {
                    return Err(GameError::TilePositionMismatch);
                }
            }
        }

        Ok(Self { cells })
    }

    /// Builds a settled board from kinds, numbering tiles from 1 in row-major order.
    pub fn from_layout(layout: &[[Option<TileKind>; BOARD_SIZE as usize]; BOARD_SIZE as usize]) -> Self {
        let mut board = Self::empty();
        let mut next_id: TileId = 1;
        for pos in Position::all() {
            if let Some(kind) = layout[usize::from(pos.row)][usize::from(pos.col)] {
                let tile = match kind {
                    TileKind::Number(value) => Tile::with_value(next_id, value, pos),
                    TileKind::Blocker => Tile::blocker(next_id, pos),
                };
                board.place(tile.settled(), pos);
                next_id += 1;
            }
        }
        board
    }

    /// Like [`Board::from_layout`] with `0` marking an empty cell.
    pub fn from_values(rows: &[[TileValue; BOARD_SIZE as usize]; BOARD_SIZE as usize]) -> Self {
        let layout = rows.map(|row| row.map(|value| (value != 0).then_some(TileKind::Number(value))));
        Self::from_layout(&layout)
    }

    pub fn tile_at(&self, pos: Position) -> Option<&Tile> {
        self.cells.get(pos.to_nd_index()).and_then(Option::as_ref)
    }

    pub fn kind_at(&self, pos: Position) -> Option<TileKind> {
        self.tile_at(pos).map(|tile| tile.kind)
    }

    pub fn is_occupied(&self, pos: Position) -> bool {
        self.tile_at(pos).is_some()
    }

    /// Unoccupied cells in row-major order.
    pub fn empty_positions(&self) -> Vec<Position> {
        Position::all().filter(|&pos| !self.is_occupied(pos)).collect()
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.cells.iter().flatten()
    }

    pub fn tile_count(&self) -> usize {
        self.tiles().count()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    pub fn max_value(&self) -> Option<TileValue> {
        self.tiles().filter_map(Tile::value).max()
    }

    pub fn contains_value_at_least(&self, threshold: TileValue) -> bool {
        self.max_value().is_some_and(|value| value >= threshold)
    }

    pub(crate) fn max_tile_id(&self) -> Option<TileId> {
        self.tiles().map(|tile| tile.id).max()
    }

    /// Whether at least one of the four directions would change the board.
    pub fn can_move(&self) -> bool {
        Position::all().any(|pos| {
            let Some(tile) = self.tile_at(pos) else {
                return false;
            };
            Direction::ALL
                .into_iter()
                .filter_map(|direction| pos.step(direction))
                .any(|neighbor| match self.kind_at(neighbor) {
                    None => true,
                    Some(kind) => tile.kind.merges_with(kind),
                })
        })
    }

    /// Full with no legal move left.
    pub fn is_stuck(&self) -> bool {
        self.is_full() && !self.can_move()
    }

    /// Whether moving in `direction` would slide or merge anything.
    pub fn can_move_in(&self, direction: Direction) -> bool {
        (0..BOARD_SIZE).any(|index| {
            let line = direction.line(index);
            line.windows(2).any(|pair| {
                let ahead = self.kind_at(pair[0]);
                match (ahead, self.kind_at(pair[1])) {
                    (_, None) => false,
                    (None, Some(_)) => true,
                    (Some(ahead), Some(behind)) => ahead.merges_with(behind),
                }
            })
        })
    }

    /// Cell-wise comparison of occupancy and kind, ignoring ids and turn flags.
    pub fn same_layout(&self, other: &Board) -> bool {
        self.cells
            .iter()
            .zip(other.cells.iter())
            .all(|(a, b)| a.map(|tile| tile.kind) == b.map(|tile| tile.kind))
    }

    pub(crate) fn place(&mut self, tile: Tile, pos: Position) {
        self.cells[pos.to_nd_index()] = Some(tile.moved_to(pos));
    }

    pub(crate) fn take(&mut self, pos: Position) -> Option<Tile> {
        self.cells.get_mut(pos.to_nd_index()).and_then(Option::take)
    }

    pub(crate) fn clear_row(&mut self, row: Coord) -> usize {
        (0..BOARD_SIZE)
            .filter_map(|col| self.take(Position::new(row, col)))
            .count()
    }

    pub(crate) fn clear_column(&mut self, col: Coord) -> usize {
        (0..BOARD_SIZE)
            .filter_map(|row| self.take(Position::new(row, col)))
            .count()
    }

    pub(crate) fn settle_all(&mut self) {
        for tile in self.cells.iter_mut().flatten() {
            *tile = tile.settled();
        }
    }

    pub(crate) fn drain_tiles(&mut self) -> Vec<Tile> {
        self.cells.iter_mut().filter_map(Option::take).collect()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                match self.kind_at(Position::new(row, col)) {
                    None => write!(f, "{:>6}", ".")?,
                    Some(TileKind::Blocker) => write!(f, "{:>6}", "#")?,
                    Some(TileKind::Number(value)) => write!(f, "{value:>6}")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
