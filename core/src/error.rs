use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Board shape is not 5x5")]
    InvalidBoardShape,
    #[error("Tile position does not match its cell")]
    TilePositionMismatch,
    #[error("Invalid engine configuration: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = core::result::Result<T, GameError>;
