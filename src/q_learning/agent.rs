//! ε-greedy tabular Q-learning agent

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    ports::Learner,
    q_learning::{q_table::QTable, serialization::Checkpoint},
    twixt::{GameState, Move},
};

/// Learning hyperparameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QLearningConfig {
    /// Learning rate α
    pub alpha: f64,
    /// Discount factor γ
    pub gamma: f64,
    /// Initial exploration rate
    pub epsilon: f64,
    /// Floor for ε
    pub min_epsilon: f64,
    /// Multiplicative ε decay per episode
    pub decay: f64,
}

impl Default for QLearningConfig {
    fn default() -> Self {
        Self {
            alpha: 0.1,
            gamma: 0.9,
            epsilon: 1.0,
            min_epsilon: 0.01,
            decay: 0.9995,
        }
    }
}

impl QLearningConfig {
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: String| Err(Error::InvalidConfiguration { message });

        if !(self.alpha > 0.0 && self.alpha <= 1.0) {
            return invalid(format!("alpha must be in (0, 1], got {}", self.alpha));
        }
        if !(0.0..=1.0).contains(&self.gamma) {
            return invalid(format!("gamma must be in [0, 1], got {}", self.gamma));
        }
        if !(0.0..=1.0).contains(&self.epsilon) {
            return invalid(format!("epsilon must be in [0, 1], got {}", self.epsilon));
        }
        if !(0.0..=self.epsilon).contains(&self.min_epsilon) {
            return invalid(format!(
                "min_epsilon must be in [0, epsilon], got {}",
                self.min_epsilon
            ));
        }
        if !(self.decay > 0.0 && self.decay <= 1.0) {
            return invalid(format!("decay must be in (0, 1], got {}", self.decay));
        }
        Ok(())
    }
}

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Q-learning agent (off-policy TD control)
///
/// Learns toward the maximum next-state value regardless of the action the
/// behaviour policy takes next. The state key is the full board plus the
/// side to move, so one table can serve either seat.
#[derive(Debug, Clone)]
pub struct QLearningAgent {
    q_table: QTable,
    config: QLearningConfig,
    epsilon: f64,
    training_rewards: Vec<f64>,
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl QLearningAgent {
    pub fn new(config: QLearningConfig) -> Self {
        Self {
            q_table: QTable::new(),
            config,
            epsilon: config.epsilon,
            training_rewards: Vec::new(),
            rng: build_rng(None),
            rng_seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
        self
    }

    /// Rebuild an agent from a saved table, ε and reward history
    pub fn from_checkpoint(config: QLearningConfig, checkpoint: Checkpoint) -> Result<Self> {
        checkpoint.validate()?;
        Ok(Self {
            q_table: checkpoint.q_table,
            config,
            epsilon: checkpoint.epsilon,
            training_rewards: checkpoint.training_rewards,
            rng: build_rng(None),
            rng_seed: None,
        })
    }

    /// Copy of everything a checkpoint needs
    pub fn snapshot(&self) -> Checkpoint {
        Checkpoint::new(
            self.q_table.clone(),
            self.epsilon,
            self.training_rewards.clone(),
        )
    }

    pub fn config(&self) -> &QLearningConfig {
        &self.config
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn training_rewards(&self) -> &[f64] {
        &self.training_rewards
    }

    pub fn q_value(&self, state: &GameState, action: Move) -> f64 {
        self.q_table.get_or_default(&state.encode(), action)
    }

    /// ε-greedy action selection
    ///
    /// With `explore` set, a uniform draw below ε picks a random legal move.
    /// Otherwise the highest-valued legal move is taken, with ties broken
    /// uniformly at random. Returns `None` when there are no legal moves.
    pub fn choose_action(&mut self, state: &GameState, explore: bool) -> Option<Move> {
        let legal_moves = state.legal_moves();
        if legal_moves.is_empty() {
            return None;
        }

        if explore && self.rng.random::<f64>() < self.epsilon {
            return legal_moves.choose(&mut self.rng).copied();
        }

        let key = state.encode();
        let values: Vec<f64> = legal_moves
            .iter()
            .map(|&mv| self.q_table.get_or_default(&key, mv))
            .collect();
        let max_q = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let best: Vec<Move> = legal_moves
            .iter()
            .zip(&values)
            .filter(|&(_, &q)| q == max_q)
            .map(|(&mv, _)| mv)
            .collect();
        best.choose(&mut self.rng).copied()
    }

    /// One-step Q-learning update using the configured α and γ
    pub fn update(&mut self, state: &str, action: Move, reward: f64, next_state: &str) -> f64 {
        self.q_table.update(
            state,
            action,
            reward,
            next_state,
            self.config.alpha,
            self.config.gamma,
        )
    }

    /// `ε = max(min_epsilon, ε * decay)`, once per episode
    pub fn decay_epsilon(&mut self) {
        self.epsilon = (self.epsilon * self.config.decay).max(self.config.min_epsilon);
    }

    pub fn record_episode_reward(&mut self, total: f64) {
        self.training_rewards.push(total);
    }

    fn reset_rng(&mut self) {
        self.rng = build_rng(self.rng_seed);
    }
}

impl Default for QLearningAgent {
    fn default() -> Self {
        Self::new(QLearningConfig::default())
    }
}

/// Plays greedily: exploration only happens inside the training driver.
impl Learner for QLearningAgent {
    fn select_move(&mut self, state: &GameState) -> Result<Move> {
        self.choose_action(state, false).ok_or(Error::NoValidMoves)
    }

    fn name(&self) -> &str {
        "Q-Learning"
    }

    fn reset(&mut self) -> Result<()> {
        self.q_table.clear();
        self.epsilon = self.config.epsilon;
        self.training_rewards.clear();
        self.reset_rng();
        Ok(())
    }

    fn set_rng_seed(&mut self, seed: u64) -> Result<()> {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::twixt::ConnectionRule;

    fn small_state() -> GameState {
        GameState::with_rules(3, ConnectionRule::Adjacency).unwrap()
    }

    #[test]
    fn test_greedy_picks_highest_value() {
        let state = small_state();
        let mut agent = QLearningAgent::default().with_seed(1);
        agent.q_table.set(&state.encode(), Move::new(1, 1), 5.0);
        agent.q_table.set(&state.encode(), Move::new(2, 2), 3.0);

        for _ in 0..10 {
            assert_eq!(agent.choose_action(&state, false), Some(Move::new(1, 1)));
        }
    }

    #[test]
    fn test_ties_are_broken_among_maxima_only() {
        let state = small_state();
        let mut agent = QLearningAgent::default().with_seed(3);
        let key = state.encode();
        for mv in state.legal_moves() {
            agent.q_table.set(&key, mv, -1.0);
        }
        agent.q_table.set(&key, Move::new(0, 0), 2.0);
        agent.q_table.set(&key, Move::new(2, 1), 2.0);

        let mut seen = std::collections::HashSet::new();
        for _ in 0..64 {
            let mv = agent.choose_action(&state, false).unwrap();
            assert!(mv == Move::new(0, 0) || mv == Move::new(2, 1));
            seen.insert(mv);
        }
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn test_full_exploration_returns_legal_moves() {
        let mut state = small_state();
        state.apply_move(Move::new(1, 1)).unwrap();
        let mut agent = QLearningAgent::default().with_seed(9);
        assert_eq!(agent.epsilon(), 1.0);

        for _ in 0..32 {
            let mv = agent.choose_action(&state, true).unwrap();
            assert!(state.is_valid_move(mv));
        }
    }

    #[test]
    fn test_no_action_on_terminal_state() {
        let state = GameState::from_moves(
            2,
            ConnectionRule::Adjacency,
            &[Move::new(0, 0), Move::new(0, 1), Move::new(1, 0)],
        )
        .unwrap();
        let mut agent = QLearningAgent::default();
        assert_eq!(agent.choose_action(&state, true), None);
        assert!(matches!(agent.select_move(&state), Err(Error::NoValidMoves)));
    }

    #[test]
    fn test_update_uses_config() {
        let mut agent = QLearningAgent::default();
        let value = agent.update("s", Move::new(0, 0), 100.0, "terminal");
        assert!((value - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_decay_epsilon_respects_floor() {
        let mut agent = QLearningAgent::new(QLearningConfig {
            epsilon: 0.5,
            min_epsilon: 0.2,
            decay: 0.5,
            ..QLearningConfig::default()
        });
        agent.decay_epsilon();
        assert_eq!(agent.epsilon(), 0.25);
        agent.decay_epsilon();
        assert_eq!(agent.epsilon(), 0.2);
        agent.decay_epsilon();
        assert_eq!(agent.epsilon(), 0.2);
    }

    #[test]
    fn test_snapshot_restores_agent() {
        let mut agent = QLearningAgent::default();
        agent.update("s", Move::new(1, 2), 5.0, "t");
        agent.decay_epsilon();
        agent.record_episode_reward(12.5);

        let restored =
            QLearningAgent::from_checkpoint(QLearningConfig::default(), agent.snapshot()).unwrap();
        assert_eq!(restored.q_table(), agent.q_table());
        assert_eq!(restored.epsilon(), agent.epsilon());
        assert_eq!(restored.training_rewards(), &[12.5]);
        assert_eq!(restored.q_table().get_or_default("unseen", Move::new(0, 0)), 0.0);
    }

    #[test]
    fn test_reset_clears_learning() {
        let mut agent = QLearningAgent::default();
        agent.update("s", Move::new(0, 0), 1.0, "t");
        agent.decay_epsilon();
        agent.reset().unwrap();
        assert!(agent.q_table().is_empty());
        assert_eq!(agent.epsilon(), 1.0);
    }

    #[test]
    fn test_config_validation() {
        assert!(QLearningConfig::default().validate().is_ok());
        let bad = QLearningConfig {
            alpha: 0.0,
            ..QLearningConfig::default()
        };
        assert!(bad.validate().is_err());
        let bad = QLearningConfig {
            min_epsilon: 0.5,
            epsilon: 0.1,
            ..QLearningConfig::default()
        };
        assert!(bad.validate().is_err());
    }
}
