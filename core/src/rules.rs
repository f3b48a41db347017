use crate::*;

/// Full board with no slide or merge left in any direction.
pub fn is_game_over(state: &GameState) -> bool {
    state.board().is_stuck()
}

/// Score gained between two states of the same game.
pub fn calculate_move_score(before: &GameState, after: &GameState) -> Score {
    after.score().saturating_sub(before.score())
}

impl Engine {
    /// Live check OR'd with the sticky flag, so removing the winning tile keeps the win.
    pub fn has_player_won(&self, state: &GameState) -> bool {
        state.has_won() || state.board().contains_value_at_least(self.config().win_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn full_board_with_pair_is_not_over() {
        let state = GameState::from_board(Board::from_values(&[
            [2, 4, 2, 4, 2],
            [4, 2, 4, 2, 4],
            [2, 4, 8, 4, 2],
            [4, 2, 8, 2, 4],
            [2, 4, 2, 4, 2],
        ]));
        assert!(!is_game_over(&state));
        assert!(!state.is_game_over());
    }

    #[test]
    fn full_board_without_pairs_is_over() {
        let state = GameState::from_board(Board::from_values(&[
            [2, 4, 2, 4, 2],
            [4, 2, 4, 2, 4],
            [2, 4, 2, 4, 2],
            [4, 2, 4, 2, 4],
            [2, 4, 2, 4, 2],
        ]));
        assert!(is_game_over(&state));
        assert!(state.is_game_over());
    }

    #[test]
    fn partially_filled_board_is_never_over() {
        let mut rows = [[2, 4, 2, 4, 2], [4, 2, 4, 2, 4], [2, 4, 2, 4, 2], [4, 2, 4, 2, 4], [2, 4, 2, 4, 2]];
        rows[2][2] = 0;
        assert!(!is_game_over(&GameState::from_board(Board::from_values(&rows))));
    }

    #[test]
    fn win_from_merging_two_1024_tiles() {
        let engine = Engine::default();
        let mut rows = [[0; 5]; 5];
        rows[1][3] = 1024;
        rows[1][4] = 1024;
        let state = GameState::from_board(Board::from_values(&rows));
        assert!(!engine.has_player_won(&state));

        let moved = engine.move_tiles(&state, Direction::Right);
        assert_eq!(moved.state.board().max_value(), Some(2048));
        assert!(engine.has_player_won(&moved.state));
    }

    #[test]
    fn win_survives_removal_of_winning_tile() {
        let engine = Engine::default();
        let mut rows = [[0; 5]; 5];
        rows[0][0] = 1024;
        rows[0][1] = 1024;
        rows[4][4] = 2;
        let state = GameState::from_board(Board::from_values(&rows))
            .with_inventory(PowerupInventory::starter());
        let won = engine.move_tiles(&state, Direction::Left).state;
        assert!(engine.has_player_won(&won));

        let cleared = engine
            .apply_powerup(&won, Powerup::ClearRow { row: 0 }, &mut SmallRng::seed_from_u64(0))
            .applied()
            .unwrap();
        assert!(!cleared.board().contains_value_at_least(2048));
        assert!(engine.has_player_won(&cleared));
    }

    #[test]
    fn move_score_is_difference_of_scores() {
        let engine = Engine::default();
        let mut rows = [[0; 5]; 5];
        rows[0] = [2, 2, 4, 4, 0];
        let before = GameState::from_board(Board::from_values(&rows));
        let after = engine.move_tiles(&before, Direction::Left).state;

        assert_eq!(calculate_move_score(&before, &after), 12);
        assert_eq!(calculate_move_score(&after, &before), 0);
    }
}
