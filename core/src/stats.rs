use alloc::collections::BTreeMap;
use serde::{Deserialize, Serialize};

use crate::*;

/// Aggregate numbers across every finished game.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameStatistics {
    pub games_played: u32,
    pub games_won: u32,
    pub best_score: Score,
    pub total_score: Score,
    pub powerup_usage: BTreeMap<PowerupKind, u32>,
    /// How often each value was produced by a merge.
    pub tile_achievements: BTreeMap<TileValue, u32>,
}

impl GameStatistics {
    /// Counts a finished (or abandoned) game.
    pub fn record_game(&mut self, state: &GameState) {
        self.games_played = self.games_played.saturating_add(1);
        if state.has_won() {
            self.games_won = self.games_won.saturating_add(1);
        }
        self.best_score = self.best_score.max(state.score());
        self.total_score = self.total_score.saturating_add(state.score());
    }

    pub fn record_powerup(&mut self, kind: PowerupKind) {
        let count = self.powerup_usage.entry(kind).or_default();
        *count = count.saturating_add(1);
    }

    pub fn record_tiles(&mut self, values: &[TileValue]) {
        for &value in values {
            let count = self.tile_achievements.entry(value).or_default();
            *count = count.saturating_add(1);
        }
    }

    pub fn win_rate(&self) -> f64 {
        if self.games_played == 0 {
            0.0
        } else {
            f64::from(self.games_won) / f64::from(self.games_played)
        }
    }

    pub fn average_score(&self) -> Score {
        match self.games_played {
            0 => 0,
            played => self.total_score / Score::from(played),
        }
    }

    pub fn powerup_count(&self, kind: PowerupKind) -> u32 {
        self.powerup_usage.get(&kind).copied().unwrap_or(0)
    }

    pub fn achievement_count(&self, value: TileValue) -> u32 {
        self.tile_achievements.get(&value).copied().unwrap_or(0)
    }
}
