use rand::prelude::*;

use crate::*;

impl Engine {
    /// Places a 2 (or, with `four_probability`, a 4) in a uniformly chosen empty cell.
    ///
    /// A full board is returned unchanged.
    pub fn add_random_tile<R: Rng + ?Sized>(&self, state: &GameState, rng: &mut R) -> GameState {
        let mut next = state.clone();
        self.spawn_number(&mut next, rng);
        next
    }

    /// Places one earned blocker in a uniformly chosen empty cell.
    ///
    /// Without a pending blocker, or on a full board, the state is returned unchanged.
    pub fn add_blocker_tile<R: Rng + ?Sized>(&self, state: &GameState, rng: &mut R) -> GameState {
        let mut next = state.clone();
        self.spawn_blocker(&mut next, rng);
        next
    }

    pub(crate) fn spawn_number<R: Rng + ?Sized>(
        &self,
        state: &mut GameState,
        rng: &mut R,
    ) -> Option<Position> {
        let pos = pick_empty(state.board(), rng)?;
        let value = if rng.random_bool(self.config().four_probability) {
            4
        } else {
            2
        };
        let id = state.allocate_id();
        state.board_mut().place(Tile::with_value(id, value, pos), pos);
        state.refresh_game_over();
        log::trace!("Spawned {} at {:?}", value, pos);
        Some(pos)
    }

    pub(crate) fn spawn_blocker<R: Rng + ?Sized>(
        &self,
        state: &mut GameState,
        rng: &mut R,
    ) -> Option<Position> {
        if state.pending_blockers() == 0 {
            return None;
        }
        let Some(pos) = pick_empty(state.board(), rng) else {
            log::debug!("Board full, blocker stays pending");
            return None;
        };
        state.take_pending_blocker();
        let id = state.allocate_id();
        state.board_mut().place(Tile::blocker(id, pos), pos);
        state.refresh_game_over();
        log::debug!("Injected blocker at {:?}", pos);
        Some(pos)
    }
}

fn pick_empty<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Option<Position> {
    let empty = board.empty_positions();
    if empty.is_empty() {
        return None;
    }
    Some(empty[rng.random_range(0..empty.len())])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn full_board() -> Board {
        Board::from_values(&[[2, 4, 8, 16, 32]; 5])
    }

    #[test]
    fn spawn_lands_on_a_previously_empty_cell() {
        let engine = Engine::default();
        let mut rng = SmallRng::seed_from_u64(1);
        let mut state = GameState::from_board(Board::from_values(&[
            [2, 0, 4, 0, 8],
            [0, 16, 0, 32, 0],
            [64, 0, 128, 0, 2],
            [0, 4, 0, 8, 0],
            [16, 0, 32, 0, 64],
        ]));

        while !state.board().is_full() {
            let empty_before = state.board().empty_positions();
            let next = engine.add_random_tile(&state, &mut rng);
            assert_eq!(next.board().tile_count(), state.board().tile_count() + 1);

            let added: alloc::vec::Vec<_> = Position::all()
                .filter(|&pos| next.board().is_occupied(pos) && !state.board().is_occupied(pos))
                .collect();
            assert_eq!(added.len(), 1);
            assert!(empty_before.contains(&added[0]));

            let tile = next.board().tile_at(added[0]).unwrap();
            assert!(tile.is_new);
            assert!(matches!(tile.value(), Some(2) | Some(4)));
            state = next;
        }
    }

    #[test]
    fn spawn_on_full_board_is_a_no_op() {
        let engine = Engine::default();
        let mut rng = SmallRng::seed_from_u64(2);
        let state = GameState::from_board(full_board());

        assert_eq!(engine.add_random_tile(&state, &mut rng), state);
    }

    #[test]
    fn spawned_values_follow_configured_weighting() {
        let engine = Engine::default();
        let mut rng = SmallRng::seed_from_u64(3);
        let empty = GameState::default();

        let mut fours = 0;
        let trials = 10_000;
        for _ in 0..trials {
            let next = engine.add_random_tile(&empty, &mut rng);
            match next.board().max_value() {
                Some(4) => fours += 1,
                Some(2) => {}
                other => panic!("unexpected spawn {other:?}"),
            }
        }
        // 10% expected, well within four standard deviations
        assert!((880..=1120).contains(&fours), "{fours} fours");
    }

    #[test]
    fn configured_probability_one_always_spawns_four() {
        let config = EngineConfig {
            four_probability: 1.0,
            ..EngineConfig::default()
        };
        let engine = Engine::new(config).unwrap();
        let mut rng = SmallRng::seed_from_u64(4);
        let next = engine.add_random_tile(&GameState::default(), &mut rng);
        assert_eq!(next.board().max_value(), Some(4));
    }

    #[test]
    fn blocker_needs_to_be_earned() {
        let engine = Engine::default();
        let mut rng = SmallRng::seed_from_u64(5);
        let state = GameState::default();
        assert_eq!(engine.add_blocker_tile(&state, &mut rng), state);

        let mut earned = state.clone();
        earned.reach_milestone(256);
        let next = engine.add_blocker_tile(&earned, &mut rng);
        assert_eq!(next.pending_blockers(), 0);
        assert_eq!(next.board().tiles().filter(|tile| tile.is_blocker()).count(), 1);
    }

    #[test]
    fn blocker_stays_pending_on_full_board() {
        let engine = Engine::default();
        let mut rng = SmallRng::seed_from_u64(6);
        let mut state = GameState::from_board(full_board());
        state.reach_milestone(256);

        let next = engine.add_blocker_tile(&state, &mut rng);
        assert_eq!(next.pending_blockers(), 1);
    }

    #[test]
    fn seeded_spawns_are_deterministic() {
        let engine = Engine::default();
        let a = engine.add_random_tile(&GameState::default(), &mut SmallRng::seed_from_u64(9));
        let b = engine.add_random_tile(&GameState::default(), &mut SmallRng::seed_from_u64(9));
        assert_eq!(a, b);
    }
}
