//! Training driver for the Q-learning agent

use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
    sync::Arc,
};

use serde::{Deserialize, Serialize};

use super::{
    evaluation::win_rate_against,
    learners::{MinimaxLearner, RandomLearner},
};
use crate::{
    Error, Result,
    adapters::{SaveHandle, save_in_background},
    config::TwixtConfig,
    ports::{CheckpointRepository, CheckpointSummary, EpisodeSummary, Learner, Observer},
    q_learning::{QLearningAgent, QLearningConfig, shaped_reward},
    twixt::{GameOutcome, Move, Player},
};

/// Who the agent trains against
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpponentKind {
    #[default]
    Minimax,
    Random,
}

impl fmt::Display for OpponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpponentKind::Minimax => write!(f, "minimax"),
            OpponentKind::Random => write!(f, "random"),
        }
    }
}

impl FromStr for OpponentKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "minimax" => Ok(OpponentKind::Minimax),
            "random" => Ok(OpponentKind::Random),
            other => Err(Error::InvalidConfiguration {
                message: format!("unknown opponent '{other}' (expected minimax or random)"),
            }),
        }
    }
}

/// Training configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Number of training episodes
    pub episodes: usize,

    /// Report, evaluate and checkpoint every this many episodes
    pub save_interval: usize,

    /// Games against the search agent at each interval; 0 skips evaluation
    pub eval_games: usize,

    pub opponent: OpponentKind,

    /// Seat the agent plays
    pub agent_player: Player,

    /// Random seed
    pub seed: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            episodes: 10_000,
            save_interval: 1_000,
            eval_games: 10,
            opponent: OpponentKind::Minimax,
            agent_player: Player::X,
            seed: None,
        }
    }
}

/// Result of a training run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingResult {
    pub total_episodes: usize,
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
    pub win_rate: f64,
    pub draw_rate: f64,
    pub loss_rate: f64,

    /// ε when training stopped
    pub final_epsilon: f64,

    /// Mean total reward per episode in this run
    pub mean_reward: f64,

    /// Win rate against the search agent at each interval
    pub evaluations: Vec<f64>,
}

impl TrainingResult {
    pub fn new(total_episodes: usize, wins: usize, draws: usize, losses: usize) -> Self {
        let rate = |count: usize| {
            if total_episodes > 0 {
                count as f64 / total_episodes as f64
            } else {
                0.0
            }
        };

        Self {
            total_episodes,
            wins,
            draws,
            losses,
            win_rate: rate(wins),
            draw_rate: rate(draws),
            loss_rate: rate(losses),
            final_epsilon: 0.0,
            mean_reward: 0.0,
            evaluations: Vec::new(),
        }
    }
}

/// Load the agent stored at `path`, or a fresh one if nothing is there.
///
/// # Errors
///
/// A corrupted, unreadable or unusable checkpoint is an [`Error::Load`]
/// rather than a fresh start.
pub fn resume_agent(
    repository: &dyn CheckpointRepository,
    path: &Path,
    config: QLearningConfig,
) -> Result<QLearningAgent> {
    match repository.load_optional(path)? {
        Some(checkpoint) => {
            QLearningAgent::from_checkpoint(config, checkpoint).map_err(|e| Error::Load {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
        }
        None => {
            eprintln!(
                "Warning: checkpoint '{}' not found, starting from a fresh agent",
                path.display()
            );
            Ok(QLearningAgent::new(config))
        }
    }
}

struct CheckpointTarget {
    repository: Arc<dyn CheckpointRepository>,
    path: PathBuf,
    background: bool,
}

/// Trains a [`QLearningAgent`] against a fixed opponent
///
/// Each agent decision produces one update. The target state is the agent's
/// next decision point, after the opponent has replied, or the final
/// position if the game ended first. A loss on the opponent's reply is
/// charged to the agent's last move.
pub struct TrainingPipeline {
    config: TwixtConfig,
    observers: Vec<Box<dyn Observer>>,
    checkpoint: Option<CheckpointTarget>,
    pending_save: Option<SaveHandle>,
}

impl TrainingPipeline {
    pub fn new(config: TwixtConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
            checkpoint: None,
            pending_save: None,
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Checkpoint to `path` at every save interval and at the end of the run
    pub fn with_checkpoints(
        mut self,
        repository: Arc<dyn CheckpointRepository>,
        path: impl Into<PathBuf>,
    ) -> Self {
        self.checkpoint = Some(CheckpointTarget {
            repository,
            path: path.into(),
            background: false,
        });
        self
    }

    /// Write interval checkpoints on a background thread
    pub fn with_background_saves(mut self, background: bool) -> Self {
        if let Some(target) = &mut self.checkpoint {
            target.background = background;
        }
        self
    }

    pub fn config(&self) -> &TwixtConfig {
        &self.config
    }

    fn build_opponent(&self) -> Box<dyn Learner> {
        match self.config.training.opponent {
            OpponentKind::Minimax => Box::new(MinimaxLearner::new(
                self.config.minimax.depth,
                self.config.evaluator(),
            )),
            OpponentKind::Random => Box::new(RandomLearner::new("Random".to_string())),
        }
    }

    /// Run the configured number of episodes.
    pub fn run(&mut self, agent: &mut QLearningAgent) -> Result<TrainingResult> {
        self.config.validate()?;
        let training = self.config.training.clone();

        let mut opponent = self.build_opponent();
        if let Some(seed) = training.seed {
            agent.set_rng_seed(seed)?;
            opponent.set_rng_seed(seed.wrapping_add(1))?;
        }

        let mut wins = 0;
        let mut draws = 0;
        let mut losses = 0;
        let mut reward_sum = 0.0;
        let mut window: Vec<bool> = Vec::with_capacity(training.save_interval);
        let mut evaluations = Vec::new();

        for observer in &mut self.observers {
            observer.on_training_start(training.episodes)?;
        }

        for episode in 0..training.episodes {
            let summary = self.play_episode(episode, agent, opponent.as_mut())?;
            reward_sum += summary.total_reward;

            if summary.agent_won() {
                wins += 1;
            } else if summary.agent_lost() {
                losses += 1;
            } else {
                draws += 1;
            }
            window.push(summary.agent_won());

            for observer in &mut self.observers {
                observer.on_episode_end(&summary)?;
            }

            if (episode + 1) % training.save_interval == 0 {
                let eval_win_rate = self.evaluate(agent)?;
                if let Some(rate) = eval_win_rate {
                    evaluations.push(rate);
                }
                let path = self.save_checkpoint(agent, true)?;

                let checkpoint = CheckpointSummary {
                    episode: episode + 1,
                    window_win_rate: window.iter().filter(|&&won| won).count() as f64
                        / window.len() as f64,
                    eval_win_rate,
                    epsilon: agent.epsilon(),
                    path,
                };
                window.clear();
                for observer in &mut self.observers {
                    observer.on_checkpoint(&checkpoint)?;
                }
            }
        }

        self.save_checkpoint(agent, false)?;
        if let Some(handle) = self.pending_save.take() {
            handle.wait()?;
        }

        for observer in &mut self.observers {
            observer.on_training_end()?;
        }

        let mut result = TrainingResult::new(training.episodes, wins, draws, losses);
        result.final_epsilon = agent.epsilon();
        result.mean_reward = if training.episodes > 0 {
            reward_sum / training.episodes as f64
        } else {
            0.0
        };
        result.evaluations = evaluations;
        Ok(result)
    }

    fn play_episode(
        &mut self,
        episode: usize,
        agent: &mut QLearningAgent,
        opponent: &mut dyn Learner,
    ) -> Result<EpisodeSummary> {
        for observer in &mut self.observers {
            observer.on_episode_start(episode)?;
        }

        let agent_player = self.config.training.agent_player;
        let evaluator = self.config.evaluator();
        let mut state = self.config.game.initial_state()?;
        let mut pending: Option<(String, Move, f64)> = None;
        let mut agent_moved_last = false;
        let mut total_reward = 0.0;
        let mut step = 0;

        while !state.is_terminal() {
            let key = state.encode();
            let mv = if state.to_move() == agent_player {
                if let Some((prev_key, prev_action, reward)) = pending.take() {
                    agent.update(&prev_key, prev_action, reward, &key);
                }
                agent.choose_action(&state, true).ok_or(Error::NoValidMoves)?
            } else {
                opponent.select_move(&state)?
            };

            for observer in &mut self.observers {
                observer.on_move(episode, step, &state, mv)?;
            }

            let mover = state.to_move();
            state.apply_move(mv)?;
            step += 1;
            agent_moved_last = mover == agent_player;

            if agent_moved_last {
                let reward = shaped_reward(&state, agent_player, &evaluator);
                total_reward += reward;
                pending = Some((key, mv, reward));
            }
        }

        if let Some((prev_key, prev_action, mut reward)) = pending.take() {
            if !agent_moved_last {
                // The opponent ended the game: its outcome replaces the shaped reward.
                let outcome_reward = shaped_reward(&state, agent_player, &evaluator);
                total_reward += outcome_reward - reward;
                reward = outcome_reward;
            }
            agent.update(&prev_key, prev_action, reward, &state.encode());
        }

        agent.decay_epsilon();
        agent.record_episode_reward(total_reward);

        Ok(EpisodeSummary {
            episode,
            outcome: state.outcome().unwrap_or(GameOutcome::Draw),
            agent: agent_player,
            moves: step,
            total_reward,
            epsilon: agent.epsilon(),
        })
    }

    fn evaluate(&self, agent: &mut QLearningAgent) -> Result<Option<f64>> {
        let training = &self.config.training;
        if training.eval_games == 0 {
            return Ok(None);
        }
        let mut minimax = MinimaxLearner::new(self.config.minimax.depth, self.config.evaluator());
        let rate = win_rate_against(
            agent,
            &mut minimax,
            training.agent_player,
            training.eval_games,
            &self.config.game,
        )?;
        Ok(Some(rate))
    }

    /// Waits for any outstanding save first, so two writes to the same
    /// path never overlap.
    fn save_checkpoint(
        &mut self,
        agent: &QLearningAgent,
        allow_background: bool,
    ) -> Result<Option<PathBuf>> {
        let Some(target) = &self.checkpoint else {
            return Ok(None);
        };
        if let Some(handle) = self.pending_save.take() {
            handle.wait()?;
        }

        let snapshot = agent.snapshot();
        if allow_background && target.background {
            self.pending_save = Some(save_in_background(
                Arc::clone(&target.repository),
                snapshot,
                target.path.clone(),
            ));
        } else {
            target.repository.save(&snapshot, &target.path)?;
        }
        Ok(Some(target.path.clone()))
    }
}
