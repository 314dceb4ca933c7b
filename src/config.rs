//! Run configuration, loadable from TOML
//!
//! ```toml
//! [game]
//! board_size = 6
//! rule = "adjacency"
//!
//! [q_learning]
//! alpha = 0.1
//! epsilon = 1.0
//!
//! [minimax]
//! depth = 3
//!
//! [training]
//! episodes = 10000
//! save_interval = 1000
//! opponent = "minimax"
//! ```
//!
//! Every section and field is optional; missing values take their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    error::Error,
    evaluator::{Evaluator, EvaluatorWeights},
    minimax::DEFAULT_DEPTH,
    pipeline::TrainingConfig,
    q_learning::QLearningConfig,
    twixt::{
        ConnectionRule, DEFAULT_BOARD_SIZE, GameState, MAX_BOARD_SIZE, MIN_BOARD_SIZE,
    },
};

/// Board size and connection rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub board_size: usize,
    pub rule: ConnectionRule,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_size: DEFAULT_BOARD_SIZE,
            rule: ConnectionRule::Adjacency,
        }
    }
}

impl GameConfig {
    pub fn new(board_size: usize, rule: ConnectionRule) -> Self {
        Self { board_size, rule }
    }

    /// Empty board for a new game
    pub fn initial_state(&self) -> Result<GameState> {
        GameState::with_rules(self.board_size, self.rule)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinimaxConfig {
    pub depth: usize,
}

impl Default for MinimaxConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TwixtConfig {
    pub game: GameConfig,
    pub evaluator: EvaluatorWeights,
    pub q_learning: QLearningConfig,
    pub minimax: MinimaxConfig,
    pub training: TrainingConfig,
}

impl TwixtConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
            operation: format!("read config file {path:?}"),
            source,
        })?;
        let config: TwixtConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            eprintln!(
                "Warning: config file '{}' not found, using defaults",
                path.display()
            );
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |message: &str| {
            Err(Error::InvalidConfiguration {
                message: message.to_string(),
            })
        };

        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&self.game.board_size) {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "game.board_size must be in {MIN_BOARD_SIZE}..={MAX_BOARD_SIZE}, got {}",
                    self.game.board_size
                ),
            });
        }
        self.q_learning.validate()?;
        if self.minimax.depth == 0 {
            return invalid("minimax.depth must be >= 1");
        }
        if self.training.save_interval == 0 {
            return invalid("training.save_interval must be >= 1");
        }

        let weights = &self.evaluator;
        let all_finite = [
            weights.connection_weight,
            weights.adjacency_weight,
            weights.mobility_weight,
            weights.strategic_weight,
        ]
        .iter()
        .all(|w| w.is_finite());
        if !all_finite {
            return invalid("evaluator weights must be finite");
        }

        Ok(())
    }

    pub fn evaluator(&self) -> Evaluator {
        Evaluator::new(self.evaluator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{pipeline::OpponentKind, twixt::Player};

    #[test]
    fn test_defaults_are_valid() {
        let config = TwixtConfig::default();
        config.validate().unwrap();
        assert_eq!(config.game.board_size, 6);
        assert_eq!(config.minimax.depth, 3);
        assert_eq!(config.q_learning.alpha, 0.1);
        assert_eq!(config.evaluator.connection_weight, 10.0);
        assert_eq!(config.training.episodes, 10_000);
        assert_eq!(config.training.save_interval, 1_000);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: TwixtConfig = toml::from_str(
            r#"
            [game]
            board_size = 5
            rule = "bridge"

            [training]
            opponent = "random"
            agent_player = "o"
            seed = 42
            "#,
        )
        .unwrap();

        assert_eq!(config.game.board_size, 5);
        assert_eq!(config.game.rule, ConnectionRule::Bridge);
        assert_eq!(config.training.opponent, OpponentKind::Random);
        assert_eq!(config.training.agent_player, Player::O);
        assert_eq!(config.training.seed, Some(42));
        assert_eq!(config.q_learning.gamma, 0.9);
        assert_eq!(config.minimax.depth, 3);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = TwixtConfig::default();
        config.game.board_size = 1;
        assert!(config.validate().is_err());

        let mut config = TwixtConfig::default();
        config.minimax.depth = 0;
        assert!(config.validate().is_err());

        let mut config = TwixtConfig::default();
        config.q_learning.gamma = 1.5;
        assert!(config.validate().is_err());

        let mut config = TwixtConfig::default();
        config.training.save_interval = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("twixt.toml");
        std::fs::write(&path, "[minimax]\ndepth = 2\n").unwrap();

        let config = TwixtConfig::load(&path).unwrap();
        assert_eq!(config.minimax.depth, 2);

        std::fs::write(&path, "[minimax]\ndepth = 0\n").unwrap();
        assert!(TwixtConfig::load(&path).is_err());

        std::fs::write(&path, "[minimax\n").unwrap();
        assert!(matches!(TwixtConfig::load(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = TwixtConfig::load_or_default(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, TwixtConfig::default());
    }
}
