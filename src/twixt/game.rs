//! High-level game management

use serde::{Deserialize, Serialize};

use super::{
    board::{Move, Player},
    rules::ConnectionRule,
    state::GameState,
};

/// Outcome of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOutcome {
    Win(Player),
    Draw,
}

/// A placed pin together with who placed it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayedMove {
    pub position: Move,
    pub player: Player,
}

/// A complete game with history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    pub size: usize,
    pub rule: ConnectionRule,
    pub moves: Vec<PlayedMove>,
    pub outcome: Option<GameOutcome>,
    #[serde(skip)]
    state: Option<GameState>,
}

impl Game {
    /// Start a game on an empty board
    pub fn new(size: usize, rule: ConnectionRule) -> Result<Self, crate::Error> {
        let state = GameState::with_rules(size, rule)?;
        Ok(Game {
            size,
            rule,
            moves: Vec::new(),
            outcome: None,
            state: Some(state),
        })
    }

    /// Play a move for the side to move
    pub fn play(&mut self, position: Move) -> Result<(), crate::Error> {
        if self.outcome.is_some() {
            return Err(crate::Error::GameOver);
        }

        let mut state = self.current_state()?;
        let player = state.to_move();
        state.apply_move(position)?;

        self.moves.push(PlayedMove { position, player });
        self.outcome = state.outcome();
        self.state = Some(state);
        Ok(())
    }

    /// Current board state, replaying the history if the cache was not restored
    ///
    /// # Errors
    ///
    /// Returns error if any move in the history is invalid, which indicates
    /// corrupted game data.
    pub fn current_state(&self) -> Result<GameState, crate::Error> {
        if let Some(state) = &self.state {
            return Ok(state.clone());
        }
        let positions: Vec<Move> = self.moves.iter().map(|m| m.position).collect();
        GameState::from_moves(self.size, self.rule, &positions)
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}
