//! Evaluation harness: matches between players and aggregate reports
//!
//! The Q-learning agent always plays greedily here; [`QLearningAgent`]'s
//! [`Learner`] implementation never explores.

use serde::{Deserialize, Serialize};

use super::learners::{MinimaxLearner, RandomLearner};
use crate::{
    Result,
    config::GameConfig,
    evaluator::Evaluator,
    ports::Learner,
    q_learning::QLearningAgent,
    twixt::{Game, GameOutcome, Player},
};

/// Play one game to completion, X moving first.
pub fn play_match(x: &mut dyn Learner, o: &mut dyn Learner, game: &GameConfig) -> Result<Game> {
    let mut record = Game::new(game.board_size, game.rule)?;
    let mut state = game.initial_state()?;

    while !state.is_terminal() {
        let player: &mut dyn Learner = match state.to_move() {
            Player::X => &mut *x,
            Player::O => &mut *o,
        };
        let mv = player.select_move(&state)?;
        state.apply_move(mv)?;
        record.play(mv)?;
    }

    Ok(record)
}

fn rate(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

/// Results of the agent against the uniform random baseline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub games: usize,
    pub win_rate: f64,
    /// Mean heuristic value of the final positions, from X's point of view
    pub avg_score: f64,
    /// Mean number of pins placed per game, both sides counted
    pub avg_moves: f64,
}

/// Agent as X against a uniform random O.
///
/// `avg_score` uses [`Evaluator::heuristic`] rather than the search score so
/// that won and lost games do not turn the average infinite.
pub fn evaluate_agent(
    agent: &mut QLearningAgent,
    games: usize,
    game: &GameConfig,
    evaluator: &Evaluator,
    seed: Option<u64>,
) -> Result<EvaluationReport> {
    let mut random = match seed {
        Some(seed) => RandomLearner::with_seed("Random".to_string(), seed),
        None => RandomLearner::new("Random".to_string()),
    };

    let mut wins = 0;
    let mut total_score = 0.0;
    let mut total_moves = 0;
    for _ in 0..games {
        let record = play_match(agent, &mut random, game)?;
        if record.outcome == Some(GameOutcome::Win(Player::X)) {
            wins += 1;
        }
        total_moves += record.len();
        total_score += evaluator.heuristic(&record.current_state()?);
    }

    if games == 0 {
        return Ok(EvaluationReport {
            games,
            win_rate: 0.0,
            avg_score: 0.0,
            avg_moves: 0.0,
        });
    }

    Ok(EvaluationReport {
        games,
        win_rate: rate(wins, games),
        avg_score: total_score / games as f64,
        avg_moves: total_moves as f64 / games as f64,
    })
}

/// Fraction of `games` won by `agent` playing as `agent_player` against `opponent`
pub fn win_rate_against(
    agent: &mut dyn Learner,
    opponent: &mut dyn Learner,
    agent_player: Player,
    games: usize,
    game: &GameConfig,
) -> Result<f64> {
    let mut wins = 0;
    for _ in 0..games {
        let record = match agent_player {
            Player::X => play_match(agent, opponent, game)?,
            Player::O => play_match(opponent, agent, game)?,
        };
        if record.outcome == Some(GameOutcome::Win(agent_player)) {
            wins += 1;
        }
    }
    Ok(rate(wins, games))
}

/// Agent as X against the search agent as O
pub fn evaluate_against_minimax(
    agent: &mut QLearningAgent,
    depth: usize,
    games: usize,
    game: &GameConfig,
    evaluator: &Evaluator,
) -> Result<f64> {
    let mut minimax = MinimaxLearner::new(depth, *evaluator);
    win_rate_against(agent, &mut minimax, Player::X, games, game)
}

/// Head-to-head record with each side taking both seats
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    /// Games played in each seat
    pub games_per_seat: usize,
    pub q_wins: usize,
    pub minimax_wins: usize,
    pub draws: usize,
    pub q_win_rate: f64,
    pub minimax_win_rate: f64,
    pub draw_rate: f64,
}

/// `games` with the agent as X, then `games` with the search agent as X
pub fn compare_vs_minimax(
    agent: &mut QLearningAgent,
    depth: usize,
    games: usize,
    game: &GameConfig,
    evaluator: &Evaluator,
) -> Result<ComparisonReport> {
    let mut minimax = MinimaxLearner::new(depth, *evaluator);
    let mut q_wins = 0;
    let mut minimax_wins = 0;
    let mut draws = 0;

    for agent_player in [Player::X, Player::O] {
        for _ in 0..games {
            let record = match agent_player {
                Player::X => play_match(agent, &mut minimax, game)?,
                Player::O => play_match(&mut minimax, agent, game)?,
            };
            match record.outcome {
                Some(GameOutcome::Win(winner)) if winner == agent_player => q_wins += 1,
                Some(GameOutcome::Win(_)) => minimax_wins += 1,
                _ => draws += 1,
            }
        }
    }

    let total = games * 2;
    Ok(ComparisonReport {
        games_per_seat: games,
        q_wins,
        minimax_wins,
        draws,
        q_win_rate: rate(q_wins, total),
        minimax_win_rate: rate(minimax_wins, total),
        draw_rate: rate(draws, total),
    })
}
