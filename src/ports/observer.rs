//! Observer port - abstraction for training observation and data collection
//!
//! Training code reports through this trait instead of printing, so progress
//! bars, metrics and structured logs can be composed freely.

use serde::Serialize;

use crate::{
    Result,
    twixt::{GameOutcome, GameState, Move, Player},
};

/// What happened in one training episode
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EpisodeSummary {
    /// 0-based episode index
    pub episode: usize,
    pub outcome: GameOutcome,
    /// Seat the learning agent played
    pub agent: Player,
    /// Pins placed by both sides
    pub moves: usize,
    /// Sum of the agent's shaped rewards
    pub total_reward: f64,
    /// ε after this episode's decay
    pub epsilon: f64,
}

impl EpisodeSummary {
    pub fn agent_won(&self) -> bool {
        self.outcome == GameOutcome::Win(self.agent)
    }

    pub fn agent_lost(&self) -> bool {
        self.outcome == GameOutcome::Win(self.agent.opponent())
    }
}

/// Periodic report emitted every save interval
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckpointSummary {
    /// Episodes completed so far
    pub episode: usize,
    /// Agent win rate over the last save interval
    pub window_win_rate: f64,
    /// Win rate against the search agent with exploration off, if evaluated
    pub eval_win_rate: Option<f64>,
    pub epsilon: f64,
    /// Where the checkpoint was written, if anywhere
    pub path: Option<std::path::PathBuf>,
}

/// Observer trait for monitoring training
///
/// # Event Sequence
///
/// 1. `on_training_start(total_episodes)` - once
/// 2. For each episode:
///    - `on_episode_start(episode)`
///    - `on_move(...)` - for each pin placed, by either side
///    - `on_episode_end(summary)`
///    - `on_checkpoint(summary)` - every save interval
/// 3. `on_training_end()` - once
///
/// # Examples
///
/// ```no_run
/// use twixt::ports::{EpisodeSummary, Observer};
///
/// struct WinCounter {
///     wins: usize,
/// }
///
/// impl Observer for WinCounter {
///     fn on_episode_end(&mut self, summary: &EpisodeSummary) -> twixt::Result<()> {
///         if summary.agent_won() {
///             self.wins += 1;
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    fn on_training_start(&mut self, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    fn on_episode_start(&mut self, _episode: usize) -> Result<()> {
        Ok(())
    }

    /// Called after a move is chosen and before it is applied.
    ///
    /// `state` is the position before the move.
    fn on_move(
        &mut self,
        _episode: usize,
        _step: usize,
        _state: &GameState,
        _mv: Move,
    ) -> Result<()> {
        Ok(())
    }

    fn on_episode_end(&mut self, _summary: &EpisodeSummary) -> Result<()> {
        Ok(())
    }

    fn on_checkpoint(&mut self, _summary: &CheckpointSummary) -> Result<()> {
        Ok(())
    }

    /// Last call of a run; finalize outputs and print summaries here.
    fn on_training_end(&mut self) -> Result<()> {
        Ok(())
    }
}
