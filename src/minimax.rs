//! Depth-limited minimax search with alpha-beta pruning
//!
//! Values come from [`Evaluator::score`], so they are from X's point of view:
//! X maximizes and O minimizes. Won and lost positions score `±∞` and
//! dominate any heuristic value at every depth.

use serde::{Deserialize, Serialize};

use crate::{
    evaluator::Evaluator,
    twixt::{GameState, Move, Player},
};

/// Default search depth in plies
pub const DEFAULT_DEPTH: usize = 3;

/// Outcome of a root search
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SearchResult {
    /// `None` only when the position has no legal moves
    pub best_move: Option<Move>,
    /// Value of `best_move` from X's point of view
    pub value: f64,
    /// Positions visited, root children included
    pub nodes: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinimaxAgent {
    depth: usize,
    evaluator: Evaluator,
}

impl MinimaxAgent {
    /// A depth of 0 behaves like 1: every root move is still scored once.
    pub fn new(depth: usize, evaluator: Evaluator) -> Self {
        Self { depth, evaluator }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Best move for the side to move at the configured depth
    pub fn best_move(&self, state: &GameState) -> Option<Move> {
        self.search(state, self.depth).best_move
    }

    /// Score every legal move with a full-window alpha-beta search to
    /// `depth - 1` and keep the first strictly best one in row-major order.
    pub fn search(&self, state: &GameState, depth: usize) -> SearchResult {
        let legal_moves = state.legal_moves();
        let mut nodes = 0;
        let Some(&first) = legal_moves.first() else {
            return SearchResult {
                best_move: None,
                value: self.evaluator.score(state),
                nodes,
            };
        };

        let maximizing = state.to_move() == Player::X;
        let mut best_move = first;
        let mut best_value = if maximizing {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };

        for mv in legal_moves {
            let Ok(child) = state.successor(mv) else {
                continue;
            };
            nodes += 1;
            let value = self.alphabeta(
                &child,
                depth.saturating_sub(1),
                f64::NEG_INFINITY,
                f64::INFINITY,
                &mut nodes,
            );

            let improves = if maximizing {
                value > best_value
            } else {
                value < best_value
            };
            if improves {
                best_value = value;
                best_move = mv;
            }
        }

        // Every move loses outright: the first move keeps the sentinel value.
        SearchResult {
            best_move: Some(best_move),
            value: best_value,
            nodes,
        }
    }

    fn alphabeta(
        &self,
        state: &GameState,
        depth: usize,
        mut alpha: f64,
        mut beta: f64,
        nodes: &mut u64,
    ) -> f64 {
        if depth == 0 || state.is_terminal() {
            return self.evaluator.score(state);
        }

        let legal_moves = state.legal_moves();
        if legal_moves.is_empty() {
            return self.evaluator.score(state);
        }

        if state.to_move() == Player::X {
            let mut value = f64::NEG_INFINITY;
            for mv in legal_moves {
                let Ok(child) = state.successor(mv) else {
                    continue;
                };
                *nodes += 1;
                value = value.max(self.alphabeta(&child, depth - 1, alpha, beta, nodes));
                alpha = alpha.max(value);
                if alpha >= beta {
                    break;
                }
            }
            value
        } else {
            let mut value = f64::INFINITY;
            for mv in legal_moves {
                let Ok(child) = state.successor(mv) else {
                    continue;
                };
                *nodes += 1;
                value = value.min(self.alphabeta(&child, depth - 1, alpha, beta, nodes));
                beta = beta.min(value);
                if alpha >= beta {
                    break;
                }
            }
            value
        }
    }
}

impl Default for MinimaxAgent {
    fn default() -> Self {
        Self::new(DEFAULT_DEPTH, Evaluator::default())
    }
}
