use rand::prelude::*;
use smallvec::SmallVec;

use crate::powerup::tick_effects;
use crate::*;

/// Outcome of one player turn.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Nothing could slide or merge; no tile was spawned.
    NoChange,
    Moved,
    /// The win value was reached for the first time this game.
    Won,
    /// The board locked up after this turn's spawns.
    GameOver,
}

impl TurnOutcome {
    pub const fn has_update(self) -> bool {
        use TurnOutcome::*;
        match self {
            NoChange => false,
            Moved => true,
            Won => true,
            GameOver => true,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TurnReport {
    pub state: GameState,
    pub outcome: TurnOutcome,
    pub score_delta: Score,
    /// Values produced by merges this turn.
    pub created: SmallVec<[TileValue; 8]>,
}

/// Stateless rules engine. Every operation maps an input state to a new one.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Empty board seeded with `initial_tiles` spawns and the starting inventory.
    pub fn initialize_game<R: Rng + ?Sized>(&self, rng: &mut R) -> GameState {
        let mut state = GameState::default().with_inventory(self.config.starting_powerups.clone());
        for _ in 0..self.config.initial_tiles {
            self.spawn_number(&mut state, rng);
        }
        log::debug!("New game with {} tiles", state.board().tile_count());
        state
    }

    /// Fresh game that keeps the best score and modes of `state`.
    pub fn restart<R: Rng + ?Sized>(&self, state: &GameState, rng: &mut R) -> GameState {
        self.initialize_game(rng)
            .with_best_score(state.best_score())
            .with_modes(state.modes())
    }

    /// Moves, then on change ticks effects, spawns and injects earned blockers.
    pub fn play_turn<R, O>(
        &self,
        state: &GameState,
        direction: Direction,
        rng: &mut R,
        observer: &mut O,
    ) -> TurnReport
    where
        R: Rng + ?Sized,
        O: EffectObserver + ?Sized,
    {
        let moved = self.move_tiles(state, direction);
        if !moved.changed {
            return TurnReport {
                state: moved.state,
                outcome: TurnOutcome::NoChange,
                score_delta: 0,
                created: moved.created,
            };
        }

        let mut next = moved.state;
        let frozen = next.is_effect_active(EffectKind::Freeze);
        let shielded = next.is_effect_active(EffectKind::Shield);
        tick_effects(&mut next, observer);

        if frozen {
            log::trace!("Frozen, skipping spawn");
        } else {
            self.spawn_number(&mut next, rng);
        }
        if !shielded {
            self.spawn_blocker(&mut next, rng);
        }
        next.refresh_game_over();

        let outcome = if next.has_won() && !state.has_won() {
            TurnOutcome::Won
        } else if next.is_game_over() {
            log::debug!("Game over with score {}", next.score());
            TurnOutcome::GameOver
        } else {
            TurnOutcome::Moved
        };

        TurnReport {
            state: next,
            outcome,
            score_delta: moved.score_delta,
            created: moved.created,
        }
    }
}
