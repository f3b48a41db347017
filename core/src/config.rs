use serde::{Deserialize, Serialize};
use smallvec::{SmallVec, smallvec};

use crate::*;

/// Value a tile must reach for the player to win.
pub const WIN_VALUE: TileValue = 2048;

/// Chance that a spawned tile is a 4 instead of a 2.
pub const FOUR_PROBABILITY: f64 = 0.1;

/// Tile values whose first creation earns a blocker injection.
pub const BLOCKER_MILESTONES: [TileValue; 3] = [256, 512, 1024];

/// Tiles placed on a fresh board.
pub const INITIAL_TILES: u8 = 2;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub win_value: TileValue,
    pub four_probability: f64,
    pub blocker_milestones: SmallVec<[TileValue; 4]>,
    pub initial_tiles: u8,
    pub starting_powerups: PowerupInventory,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            win_value: WIN_VALUE,
            four_probability: FOUR_PROBABILITY,
            blocker_milestones: smallvec![
                BLOCKER_MILESTONES[0],
                BLOCKER_MILESTONES[1],
                BLOCKER_MILESTONES[2]
            ],
            initial_tiles: INITIAL_TILES,
            starting_powerups: PowerupInventory::default(),
        }
    }
}

impl EngineConfig {
    /// Parses overrides from JSON, missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|err| {
            log::warn!("Rejected engine config: {}", err);
            GameError::InvalidConfig("malformed config json")
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.four_probability) {
            return Err(GameError::InvalidConfig(
                "four probability must be within 0 and 1",
            ));
        }
        if !is_tile_value(self.win_value) {
            return Err(GameError::InvalidConfig(
                "win value must be a power of two of at least 4",
            ));
        }
        if !self.blocker_milestones.iter().copied().all(is_tile_value) {
            return Err(GameError::InvalidConfig(
                "blocker milestones must be powers of two of at least 4",
            ));
        }
        if usize::from(self.initial_tiles) > CELL_COUNT {
            return Err(GameError::InvalidConfig("too many initial tiles"));
        }
        Ok(())
    }

    pub fn is_milestone(&self, value: TileValue) -> bool {
        self.blocker_milestones.contains(&value)
    }
}

const fn is_tile_value(value: TileValue) -> bool {
    value >= 4 && value.is_power_of_two()
}
