//! Static position evaluation
//!
//! Scores are from X's point of view: positive favours X, negative favours O.
//! Terminal positions map to `f64::INFINITY` (X won), `f64::NEG_INFINITY`
//! (O won) or `0.0` (draw), which dominate every finite heuristic value.

use serde::{Deserialize, Serialize};

use crate::twixt::{GameOutcome, GameState, Move, Player};

/// Tunable weights for the heuristic terms
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorWeights {
    /// Per start/goal pin pair: `(size - distance) * connection_weight`
    pub connection_weight: f64,
    /// Per unordered pair of neighbouring friendly pins
    pub adjacency_weight: f64,
    /// Per legal move
    pub mobility_weight: f64,
    /// Scales the centre/corner positional term
    pub strategic_weight: f64,
}

impl Default for EvaluatorWeights {
    fn default() -> Self {
        Self {
            connection_weight: 10.0,
            adjacency_weight: 2.0,
            mobility_weight: 0.1,
            strategic_weight: 0.2,
        }
    }
}

/// Individual terms of a heuristic evaluation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub x_score: f64,
    pub o_score: f64,
    pub mobility: f64,
    pub strategic: f64,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f64 {
        (self.x_score - self.o_score) + self.mobility + self.strategic
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Evaluator {
    weights: EvaluatorWeights,
}

impl Evaluator {
    pub fn new(weights: EvaluatorWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &EvaluatorWeights {
        &self.weights
    }

    /// Search score: terminal sentinels, otherwise the heuristic
    pub fn score(&self, state: &GameState) -> f64 {
        match state.outcome() {
            Some(GameOutcome::Win(Player::X)) => f64::INFINITY,
            Some(GameOutcome::Win(Player::O)) => f64::NEG_INFINITY,
            Some(GameOutcome::Draw) => 0.0,
            None => self.heuristic(state),
        }
    }

    /// Weighted heuristic, ignoring whether the game is over
    pub fn heuristic(&self, state: &GameState) -> f64 {
        self.breakdown(state).total()
    }

    pub fn breakdown(&self, state: &GameState) -> ScoreBreakdown {
        ScoreBreakdown {
            x_score: self.player_score(state, Player::X),
            o_score: self.player_score(state, Player::O),
            mobility: self.weights.mobility_weight * state.legal_moves().len() as f64,
            strategic: self.weights.strategic_weight * strategic_position(state),
        }
    }

    /// Connection potential plus adjacency density for one player
    pub fn player_score(&self, state: &GameState, player: Player) -> f64 {
        let size = state.size();
        let pins = state.board().pins(player);
        let starts = pins.iter().filter(|&&pin| player.on_start_edge(pin));

        let mut score = 0.0;
        for &start in starts {
            for &goal in pins.iter().filter(|&&pin| player.on_goal_edge(pin, size)) {
                if let Some(distance) = state.rule().path_distance(
                    state.board(),
                    state.links(),
                    start,
                    goal,
                    player,
                ) {
                    score += (size as f64 - distance as f64) * self.weights.connection_weight;
                }
            }
        }

        score + adjacent_pairs(state, player) as f64 * self.weights.adjacency_weight
    }
}

/// Unordered pairs of `player`'s pins one rule-offset apart
pub fn adjacent_pairs(state: &GameState, player: Player) -> usize {
    let board = state.board();
    let ordered: usize = board
        .pins(player)
        .into_iter()
        .map(|pin| {
            state
                .rule()
                .offsets()
                .iter()
                .filter_map(|&(dr, dc)| pin.offset(dr, dc, board.size()))
                .filter(|&next| board.is_owned_by(next, player))
                .count()
        })
        .sum();
    // Offsets are symmetric, so every pair was seen from both ends.
    ordered / 2
}

/// X pins near the centre score up, O pins near a corner score down
pub fn strategic_position(state: &GameState) -> f64 {
    let board = state.board();
    let size = board.size();
    let center = Move::new(size / 2, size / 2);
    let last = size - 1;
    let corners = [
        Move::new(0, 0),
        Move::new(0, last),
        Move::new(last, 0),
        Move::new(last, last),
    ];

    let x_total: f64 = board
        .pins(Player::X)
        .into_iter()
        .map(|pin| size as f64 - pin.manhattan(center) as f64)
        .sum();
    let o_total: f64 = board
        .pins(Player::O)
        .into_iter()
        .map(|pin| {
            let nearest = corners
                .iter()
                .map(|&corner| pin.manhattan(corner))
                .min()
                .unwrap_or(0);
            size as f64 - nearest as f64
        })
        .sum();

    x_total - o_total
}
