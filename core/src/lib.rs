#![no_std]

extern crate alloc;

pub use board::*;
pub use config::*;
pub use engine::*;
pub use error::*;
pub use movement::*;
pub use persistence::*;
pub use powerup::*;
pub use rules::*;
pub use state::*;
pub use stats::*;
pub use tile::*;
pub use types::*;

mod board;
mod config;
mod engine;
mod error;
mod movement;
mod persistence;
mod powerup;
mod rules;
mod spawn;
mod state;
mod stats;
mod tile;
mod types;
