pub mod astar;
pub mod bfs;
mod config;
pub mod controller;
mod error;
mod puzzle;
pub mod shuffle;

pub use astar::Hint;
pub use config::{PuzzleConfig, MAX_DIFFICULTY_FLOOR};
pub use controller::{Controller, NoTicker, Session, Ticker};
pub use error::{BoardError, Error, Result};
pub use puzzle::{Move, Puzzle, CELLS, SIZE};
