use smallvec::SmallVec;

use crate::*;

/// Result of sliding one line toward its destination edge.
#[derive(Clone, Debug, Default, PartialEq)]
struct LineOutcome {
    /// Tiles packed from the destination edge outward.
    tiles: SmallVec<[Tile; BOARD_SIZE as usize]>,
    score: Score,
    created: SmallVec<[TileValue; 2]>,
}

/// Compacts settled `tiles`, given in travel order, merging each tile at most once.
fn slide_line(tiles: &[Tile], state: &mut GameState) -> LineOutcome {
    let mut outcome = LineOutcome::default();

    for &tile in tiles {
        let mergeable = outcome
            .tiles
            .last()
            .is_some_and(|placed| placed.can_merge_with(&tile));

        if !mergeable {
            outcome.tiles.push(tile);
            continue;
        }

        let Some(placed) = outcome.tiles.pop() else {
            continue;
        };
        match placed.kind {
            // blockers annihilate, the freed slot is reused by later tiles
            TileKind::Blocker => {}
            TileKind::Number(value) => {
                let merged_value = value.saturating_mul(2);
                let mut merged = Tile::with_value(state.allocate_id(), merged_value, placed.position());
                merged.is_new = false;
                merged.is_merged = true;
                outcome.tiles.push(merged);
                outcome.score += Score::from(merged_value);
                outcome.created.push(merged_value);
            }
        }
    }

    outcome
}

/// New state after a slide, spawns are left to the caller.
#[derive(Clone, Debug, PartialEq)]
pub struct MoveResult {
    pub state: GameState,
    pub score_delta: Score,
    /// False for a no-op move, in which case `state` equals the input.
    pub changed: bool,
    /// Values produced by merges, in line order.
    pub created: SmallVec<[TileValue; 8]>,
}

impl MoveResult {
    fn unchanged(state: &GameState) -> Self {
        Self {
            state: state.clone(),
            score_delta: 0,
            changed: false,
            created: SmallVec::new(),
        }
    }
}

impl Engine {
    pub fn move_tiles(&self, state: &GameState, direction: Direction) -> MoveResult {
        if state.is_game_over() {
            return MoveResult::unchanged(state);
        }

        let source = state.board();
        let mut next = state.clone();
        let mut board = Board::empty();
        let mut score_delta: Score = 0;
        let mut created: SmallVec<[TileValue; 8]> = SmallVec::new();

        for index in 0..BOARD_SIZE {
            let cells = direction.line(index);
            let tiles: SmallVec<[Tile; BOARD_SIZE as usize]> = cells
                .iter()
                .filter_map(|&pos| source.tile_at(pos).copied())
                .map(Tile::settled)
                .collect();

            let line = slide_line(&tiles, &mut next);
            for (tile, &pos) in line.tiles.into_iter().zip(cells.iter()) {
                board.place(tile, pos);
            }
            score_delta += line.score;
            created.extend(line.created);
        }

        if board.same_layout(source) {
            log::trace!("Move {:?} changed nothing", direction);
            return MoveResult::unchanged(state);
        }

        let previous = next.replace_board(board);
        next.remember_for_undo(previous);
        next.add_score(score_delta);
        next.count_move();

        for &value in &created {
            if value >= self.config().win_value {
                next.mark_won();
            }
            if self.config().is_milestone(value) && next.reach_milestone(value) {
                log::debug!("Milestone {} reached, blocker earned", value);
            }
        }
        next.refresh_game_over();

        log::trace!(
            "Move {:?} scored {} with {} merges",
            direction,
            score_delta,
            created.len()
        );
        MoveResult {
            state: next,
            score_delta,
            changed: true,
            created,
        }
    }
}
