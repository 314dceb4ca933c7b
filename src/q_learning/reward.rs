//! Reward shaping for Q-learning episodes

use crate::{
    evaluator::Evaluator,
    twixt::{GameOutcome, GameState, Player},
};

pub const WIN_REWARD: f64 = 100.0;
pub const LOSS_REWARD: f64 = -100.0;
/// Draws are penalised so the agent prefers playing for a connection
pub const DRAW_REWARD: f64 = -10.0;
/// Scale applied to the heuristic score of non-terminal positions
pub const SHAPING_SCALE: f64 = 0.1;

/// Reward for `agent` in `state`, the position reached by its transition
///
/// Terminal positions get the fixed outcome rewards. Otherwise the evaluator
/// score is scaled and oriented so that positive always favours `agent`.
pub fn shaped_reward(state: &GameState, agent: Player, evaluator: &Evaluator) -> f64 {
    match state.outcome() {
        Some(GameOutcome::Win(winner)) if winner == agent => WIN_REWARD,
        Some(GameOutcome::Win(_)) => LOSS_REWARD,
        Some(GameOutcome::Draw) => DRAW_REWARD,
        None => {
            let score = SHAPING_SCALE * evaluator.heuristic(state);
            match agent {
                Player::X => score,
                Player::O => -score,
            }
        }
    }
}
