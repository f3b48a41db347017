use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

bitflags! {
    /// Presentation modes carried through the engine untouched.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct ModeFlags: u8 {
        const TIME_ATTACK = 1 << 0;
        const SCENIC = 1 << 1;
    }
}

impl Default for ModeFlags {
    fn default() -> Self {
        Self::empty()
    }
}

/// What undo brings back: the board plus the blocker bookkeeping tied to it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct UndoSnapshot {
    board: Board,
    milestones_reached: SmallVec<[TileValue; 4]>,
    pending_blockers: u8,
}

/// Everything the engine knows about one game in progress.
///
/// Deserialized states recompute the derived fields from the board.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawGameState")]
pub struct GameState {
    board: Board,
    score: Score,
    best_score: Score,
    is_game_over: bool,
    has_won: bool,
    modes: ModeFlags,
    next_tile_id: TileId,
    milestones_reached: SmallVec<[TileValue; 4]>,
    pending_blockers: u8,
    effects: SmallVec<[ActiveEffect; 2]>,
    inventory: PowerupInventory,
    previous: Option<UndoSnapshot>,
    moves_made: u32,
}

#[derive(Deserialize)]
struct RawGameState {
    board: Board,
    score: Score,
    best_score: Score,
    is_game_over: bool,
    has_won: bool,
    modes: ModeFlags,
    next_tile_id: TileId,
    milestones_reached: SmallVec<[TileValue; 4]>,
    pending_blockers: u8,
    effects: SmallVec<[ActiveEffect; 2]>,
    inventory: PowerupInventory,
    previous: Option<UndoSnapshot>,
    moves_made: u32,
}

impl From<RawGameState> for GameState {
    fn from(raw: RawGameState) -> Self {
        let min_next_id = next_id_after(&raw.board).max(
            raw.previous
                .as_ref()
                .map_or(1, |snapshot| next_id_after(&snapshot.board)),
        );
        if raw.next_tile_id < min_next_id {
            log::warn!(
                "Stored next tile id {} collides with board ids, using {}",
                raw.next_tile_id,
                min_next_id
            );
        }
        let is_game_over = raw.board.is_stuck();
        if is_game_over != raw.is_game_over {
            log::warn!("Stored game over flag disagrees with the board");
        }
        Self {
            next_tile_id: raw.next_tile_id.max(min_next_id),
            is_game_over,
            best_score: raw.best_score.max(raw.score),
            board: raw.board,
            score: raw.score,
            has_won: raw.has_won,
            modes: raw.modes,
            milestones_reached: raw.milestones_reached,
            pending_blockers: raw.pending_blockers,
            effects: raw.effects,
            inventory: raw.inventory,
            previous: raw.previous,
            moves_made: raw.moves_made,
        }
    }
}

fn next_id_after(board: &Board) -> TileId {
    board.max_tile_id().map_or(1, |id| id + 1)
}

impl Default for GameState {
    fn default() -> Self {
        Self::from_board(Board::empty())
    }
}

impl GameState {
    /// Wraps an existing board, continuing tile ids after the highest one present.
    pub fn from_board(board: Board) -> Self {
        let next_tile_id = next_id_after(&board);
        let is_game_over = board.is_stuck();
        Self {
            board,
            score: 0,
            best_score: 0,
            is_game_over,
            has_won: false,
            modes: ModeFlags::empty(),
            next_tile_id,
            milestones_reached: SmallVec::new(),
            pending_blockers: 0,
            effects: SmallVec::new(),
            inventory: PowerupInventory::default(),
            previous: None,
            moves_made: 0,
        }
    }

    pub fn with_modes(mut self, modes: ModeFlags) -> Self {
        self.modes = modes;
        self
    }

    pub fn with_best_score(mut self, best_score: Score) -> Self {
        self.best_score = best_score.max(self.score);
        self
    }

    pub fn with_inventory(mut self, inventory: PowerupInventory) -> Self {
        self.inventory = inventory;
        self
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn best_score(&self) -> Score {
        self.best_score
    }

    pub fn is_game_over(&self) -> bool {
        self.is_game_over
    }

    /// Sticky flag, see [`Engine::has_player_won`] for the live check.
    pub fn has_won(&self) -> bool {
        self.has_won
    }

    pub fn modes(&self) -> ModeFlags {
        self.modes
    }

    pub fn pending_blockers(&self) -> u8 {
        self.pending_blockers
    }

    pub fn milestones_reached(&self) -> &[TileValue] {
        &self.milestones_reached
    }

    pub fn effects(&self) -> &[ActiveEffect] {
        &self.effects
    }

    pub fn is_effect_active(&self, kind: EffectKind) -> bool {
        self.effects.iter().any(|effect| effect.kind == kind)
    }

    pub fn inventory(&self) -> &PowerupInventory {
        &self.inventory
    }

    pub fn can_undo(&self) -> bool {
        self.previous.is_some()
    }

    /// Successful (board-changing) moves made this game.
    pub fn moves_made(&self) -> u32 {
        self.moves_made
    }

    pub(crate) fn allocate_id(&mut self) -> TileId {
        let id = self.next_tile_id;
        self.next_tile_id += 1;
        id
    }

    pub(crate) fn add_score(&mut self, delta: Score) {
        self.score = self.score.saturating_add(delta);
        self.best_score = self.best_score.max(self.score);
    }

    pub(crate) fn mark_won(&mut self) {
        if !self.has_won {
            log::debug!("Win value reached with score {}", self.score);
        }
        self.has_won = true;
    }

    pub(crate) fn refresh_game_over(&mut self) {
        self.is_game_over = self.board.is_stuck();
    }

    /// Records a first-time milestone, returning whether it was new.
    pub(crate) fn reach_milestone(&mut self, value: TileValue) -> bool {
        if self.milestones_reached.contains(&value) {
            return false;
        }
        self.milestones_reached.push(value);
        self.pending_blockers = self.pending_blockers.saturating_add(1);
        true
    }

    pub(crate) fn take_pending_blocker(&mut self) -> bool {
        if self.pending_blockers == 0 {
            return false;
        }
        self.pending_blockers -= 1;
        true
    }

    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub(crate) fn replace_board(&mut self, board: Board) -> Board {
        core::mem::replace(&mut self.board, board)
    }

    /// Remembers `board` together with the current milestone and blocker counters.
    pub(crate) fn remember_for_undo(&mut self, board: Board) {
        self.previous = Some(UndoSnapshot {
            board,
            milestones_reached: self.milestones_reached.clone(),
            pending_blockers: self.pending_blockers,
        });
    }

    /// Puts the remembered board back with settled tiles, returning false when there is none.
    pub(crate) fn restore_undo(&mut self) -> bool {
        let Some(UndoSnapshot {
            mut board,
            milestones_reached,
            pending_blockers,
        }) = self.previous.take()
        else {
            return false;
        };
        board.settle_all();
        self.board = board;
        self.milestones_reached = milestones_reached;
        self.pending_blockers = pending_blockers;
        true
    }

    pub(crate) fn effects_mut(&mut self) -> &mut SmallVec<[ActiveEffect; 2]> {
        &mut self.effects
    }

    pub(crate) fn inventory_mut(&mut self) -> &mut PowerupInventory {
        &mut self.inventory
    }

    pub(crate) fn count_move(&mut self) {
        self.moves_made = self.moves_made.saturating_add(1);
    }
}
