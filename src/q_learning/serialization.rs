//! Checkpoint record for Q-learning agents

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    q_learning::q_table::QTable,
};

/// Everything needed to resume a Q-learning agent
///
/// Hyperparameters other than the current ε come from configuration on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub version: u32,
    pub q_table: QTable,
    pub epsilon: f64,
    /// Total reward of every training episode so far
    pub training_rewards: Vec<f64>,
}

impl Checkpoint {
    pub const VERSION: u32 = 1;

    pub fn new(q_table: QTable, epsilon: f64, training_rewards: Vec<f64>) -> Self {
        Self {
            version: Self::VERSION,
            q_table,
            epsilon,
            training_rewards,
        }
    }

    /// Reject records a usable agent cannot be rebuilt from: an unknown
    /// version, ε outside `[0, 1]`, or any non-finite value.
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: String| -> Result<()> {
            Err(Error::SerializationContext {
                operation: "restore Q-learning agent".to_string(),
                message,
            })
        };

        if self.version != Self::VERSION {
            return invalid(format!(
                "unsupported checkpoint version {}, expected {}",
                self.version,
                Self::VERSION
            ));
        }
        if !(0.0..=1.0).contains(&self.epsilon) {
            return invalid(format!("epsilon {} is outside [0, 1]", self.epsilon));
        }
        if !self.q_table.values().all(f64::is_finite) {
            return invalid("q-table holds a non-finite value".to_string());
        }
        if !self.training_rewards.iter().all(|r| r.is_finite()) {
            return invalid("reward history holds a non-finite value".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::twixt::Move;

    #[test]
    fn test_msgpack_roundtrip() {
        let mut table = QTable::new();
        table.set("X.O......_X", Move::new(2, 2), 4.25);
        table.set("X.O......_X", Move::new(0, 1), -0.5);
        table.set("........._X", Move::new(1, 1), 10.0);
        let checkpoint = Checkpoint::new(table, 0.37, vec![1.0, -100.0, 55.5]);

        let bytes = rmp_serde::to_vec(&checkpoint).unwrap();
        let loaded: Checkpoint = rmp_serde::from_slice(&bytes).unwrap();
        assert_eq!(loaded, checkpoint);
        assert_eq!(
            loaded.q_table.get_or_default("X.O......_X", Move::new(2, 2)),
            4.25
        );
    }

    #[test]
    fn test_unknown_version_rejected() {
        let mut checkpoint = Checkpoint::new(QTable::new(), 1.0, Vec::new());
        checkpoint.version = 99;
        assert!(checkpoint.validate().is_err());
    }

    #[test]
    fn test_unusable_values_rejected() {
        assert!(Checkpoint::new(QTable::new(), f64::NAN, Vec::new()).validate().is_err());
        assert!(Checkpoint::new(QTable::new(), 1.5, Vec::new()).validate().is_err());
        assert!(Checkpoint::new(QTable::new(), 0.5, vec![f64::INFINITY]).validate().is_err());

        let mut table = QTable::new();
        table.set("........._X", Move::new(0, 0), f64::NAN);
        assert!(Checkpoint::new(table, 0.5, Vec::new()).validate().is_err());

        assert!(Checkpoint::new(QTable::new(), 0.0, vec![-1.0]).validate().is_ok());
    }
}
