//! Twixt game implementation

pub mod board;
pub mod game;
pub mod links;
pub mod rules;
pub mod state;

pub use board::{Board, Cell, DEFAULT_BOARD_SIZE, Move, Player};
pub use game::{Game, GameOutcome, PlayedMove};
pub use links::{Link, LinkSet};
pub use rules::{ADJACENT_OFFSETS, ConnectionRule, KNIGHT_OFFSETS};
pub use state::{GameState, MAX_BOARD_SIZE, MIN_BOARD_SIZE};
