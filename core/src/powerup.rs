use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PowerupKind {
    DestroyTile,
    ClearRow,
    ClearColumn,
    UpgradeTile,
    Shuffle,
    Undo,
    Freeze,
    Shield,
}

impl PowerupKind {
    pub const ALL: [PowerupKind; 8] = [
        PowerupKind::DestroyTile,
        PowerupKind::ClearRow,
        PowerupKind::ClearColumn,
        PowerupKind::UpgradeTile,
        PowerupKind::Shuffle,
        PowerupKind::Undo,
        PowerupKind::Freeze,
        PowerupKind::Shield,
    ];
}

/// A player-selected board mutation together with its target.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Powerup {
    /// Removes the tile at `target`.
    DestroyTile { target: Position },
    ClearRow { row: Coord },
    ClearColumn { col: Coord },
    /// Doubles the value of the normal tile at `target`.
    UpgradeTile { target: Position },
    /// Scatters every tile over random cells.
    Shuffle,
    /// Restores the board from before the last successful move.
    Undo,
    /// No tile spawns after each of the next `moves` successful moves.
    Freeze { moves: u8 },
    /// No blocker is injected during the next `moves` successful moves.
    Shield { moves: u8 },
}

impl Powerup {
    pub const fn kind(&self) -> PowerupKind {
        match self {
            Self::DestroyTile { .. } => PowerupKind::DestroyTile,
            Self::ClearRow { .. } => PowerupKind::ClearRow,
            Self::ClearColumn { .. } => PowerupKind::ClearColumn,
            Self::UpgradeTile { .. } => PowerupKind::UpgradeTile,
            Self::Shuffle => PowerupKind::Shuffle,
            Self::Undo => PowerupKind::Undo,
            Self::Freeze { .. } => PowerupKind::Freeze,
            Self::Shield { .. } => PowerupKind::Shield,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    Freeze,
    Shield,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveEffect {
    pub kind: EffectKind,
    pub remaining_moves: u8,
}

/// Receives duration effects that ran out.
pub trait EffectObserver {
    fn on_effect_expired(&mut self, kind: EffectKind);
}

impl EffectObserver for () {
    fn on_effect_expired(&mut self, _kind: EffectKind) {}
}

impl EffectObserver for Vec<EffectKind> {
    fn on_effect_expired(&mut self, kind: EffectKind) {
        self.push(kind);
    }
}

/// How many of each powerup the player holds.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerupInventory {
    counts: BTreeMap<PowerupKind, u32>,
}

impl PowerupInventory {
    /// One of every powerup.
    pub fn starter() -> Self {
        let mut inventory = Self::default();
        for kind in PowerupKind::ALL {
            inventory.add(kind, 1);
        }
        inventory
    }

    pub fn with(mut self, kind: PowerupKind, count: u32) -> Self {
        self.set(kind, count);
        self
    }

    pub fn count(&self, kind: PowerupKind) -> u32 {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    pub fn set(&mut self, kind: PowerupKind, count: u32) {
        if count == 0 {
            self.counts.remove(&kind);
        } else {
            self.counts.insert(kind, count);
        }
    }

    pub fn add(&mut self, kind: PowerupKind, count: u32) {
        let total = self.count(kind).saturating_add(count);
        self.set(kind, total);
    }

    /// Takes one, returning false when none are left.
    pub fn consume(&mut self, kind: PowerupKind) -> bool {
        match self.count(kind) {
            0 => false,
            count => {
                self.set(kind, count - 1);
                true
            }
        }
    }
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum PowerupRejection {
    #[error("No {0:?} powerup left")]
    NotOwned(PowerupKind),
    #[error("Target is outside the board")]
    OutOfBounds,
    #[error("Target cell is empty")]
    EmptyCell,
    #[error("Target tile cannot be upgraded")]
    NotUpgradable,
    #[error("Board has no tiles to shuffle")]
    NothingToShuffle,
    #[error("No previous move to undo")]
    NothingToUndo,
    #[error("Effect duration must be at least one move")]
    ZeroDuration,
    #[error("{0:?} is already active")]
    AlreadyActive(EffectKind),
}

#[derive(Clone, Debug, PartialEq)]
pub enum PowerupOutcome {
    Applied(GameState),
    /// The selection was invalid and nothing was consumed.
    Rejected(PowerupRejection),
}

impl PowerupOutcome {
    pub const fn has_update(&self) -> bool {
        match self {
            Self::Applied(_) => true,
            Self::Rejected(_) => false,
        }
    }

    pub fn applied(self) -> Option<GameState> {
        match self {
            Self::Applied(state) => Some(state),
            Self::Rejected(_) => None,
        }
    }
}

impl Engine {
    /// Validates `powerup` against the settled board and applies it to a copy of `state`.
    pub fn apply_powerup<R: Rng + ?Sized>(
        &self,
        state: &GameState,
        powerup: Powerup,
        rng: &mut R,
    ) -> PowerupOutcome {
        use PowerupOutcome::*;

        let kind = powerup.kind();
        if state.inventory().count(kind) == 0 {
            return Rejected(PowerupRejection::NotOwned(kind));
        }
        if let Err(rejection) = check_target(state, powerup) {
            log::debug!("Rejected {:?}: {}", powerup, rejection);
            return Rejected(rejection);
        }

        let mut next = state.clone();
        if self.has_player_won(state) {
            next.mark_won();
        }
        next.inventory_mut().consume(kind);
        match powerup {
            Powerup::DestroyTile { target } => {
                next.board_mut().take(target);
            }
            Powerup::ClearRow { row } => {
                let removed = next.board_mut().clear_row(row);
                log::trace!("Cleared {} tiles from row {}", removed, row);
            }
            Powerup::ClearColumn { col } => {
                let removed = next.board_mut().clear_column(col);
                log::trace!("Cleared {} tiles from column {}", removed, col);
            }
            Powerup::UpgradeTile { target } => {
                if let Some(mut tile) = next.board_mut().take(target) {
                    if let TileKind::Number(value) = tile.kind {
                        let upgraded = value * 2;
                        tile.kind = TileKind::Number(upgraded);
                        if self.config().is_milestone(upgraded) && next.reach_milestone(upgraded) {
                            log::debug!("Milestone {} reached by upgrade, blocker earned", upgraded);
                        }
                    }
                    next.board_mut().place(tile, target);
                }
            }
            Powerup::Shuffle => shuffle_tiles(next.board_mut(), rng),
            Powerup::Undo => {
                next.restore_undo();
            }
            Powerup::Freeze { moves } => next.effects_mut().push(ActiveEffect {
                kind: EffectKind::Freeze,
                remaining_moves: moves,
            }),
            Powerup::Shield { moves } => next.effects_mut().push(ActiveEffect {
                kind: EffectKind::Shield,
                remaining_moves: moves,
            }),
        }

        if next.board().contains_value_at_least(self.config().win_value) {
            next.mark_won();
        }
        next.refresh_game_over();
        log::debug!("Applied {:?}", powerup);
        Applied(next)
    }
}

fn check_target(state: &GameState, powerup: Powerup) -> core::result::Result<(), PowerupRejection> {
    use PowerupRejection::*;

    let board = state.board();
    match powerup {
        Powerup::DestroyTile { target } => {
            if !target.is_in_bounds() {
                return Err(OutOfBounds);
            }
            if !board.is_occupied(target) {
                return Err(EmptyCell);
            }
        }
        Powerup::ClearRow { row: index } | Powerup::ClearColumn { col: index } => {
            if index >= BOARD_SIZE {
                return Err(OutOfBounds);
            }
        }
        Powerup::UpgradeTile { target } => {
            if !target.is_in_bounds() {
                return Err(OutOfBounds);
            }
            match board.kind_at(target) {
                None => return Err(EmptyCell),
                Some(TileKind::Blocker) => return Err(NotUpgradable),
                Some(TileKind::Number(value)) if value.checked_mul(2).is_none() => {
                    return Err(NotUpgradable);
                }
                Some(TileKind::Number(_)) => {}
            }
        }
        Powerup::Shuffle => {
            if board.is_empty() {
                return Err(NothingToShuffle);
            }
        }
        Powerup::Undo => {
            if !state.can_undo() {
                return Err(NothingToUndo);
            }
        }
        Powerup::Freeze { moves } => check_duration(state, EffectKind::Freeze, moves)?,
        Powerup::Shield { moves } => check_duration(state, EffectKind::Shield, moves)?,
    }
    Ok(())
}

fn check_duration(
    state: &GameState,
    kind: EffectKind,
    moves: u8,
) -> core::result::Result<(), PowerupRejection> {
    if moves == 0 {
        Err(PowerupRejection::ZeroDuration)
    } else if state.is_effect_active(kind) {
        Err(PowerupRejection::AlreadyActive(kind))
    } else {
        Ok(())
    }
}

fn shuffle_tiles<R: Rng + ?Sized>(board: &mut Board, rng: &mut R) {
    let tiles = board.drain_tiles();
    let mut positions: Vec<Position> = Position::all().collect();
    positions.shuffle(rng);
    for (tile, pos) in tiles.into_iter().zip(positions) {
        board.place(tile.settled(), pos);
    }
}

/// Counts down every active effect after a successful move, dropping the expired ones.
pub(crate) fn tick_effects<O: EffectObserver + ?Sized>(state: &mut GameState, observer: &mut O) {
    let mut expired: SmallVec<[EffectKind; 2]> = SmallVec::new();
    state.effects_mut().retain(|effect| {
        effect.remaining_moves = effect.remaining_moves.saturating_sub(1);
        if effect.remaining_moves == 0 {
            expired.push(effect.kind);
            false
        } else {
            true
        }
    });
    for kind in expired {
        log::debug!("{:?} expired", kind);
        observer.on_effect_expired(kind);
    }
}
