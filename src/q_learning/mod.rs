//! Tabular Q-learning
//!
//! The agent keeps a table of action values keyed by the encoded game state
//! and the move, learning with the off-policy one-step update
//!
//! ```text
//! Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') - Q(s,a)]
//! ```
//!
//! and acting ε-greedily while training. Rewards are shaped by
//! [`reward::shaped_reward`]: fixed values at the end of a game and a scaled
//! heuristic score in between.
//!
//! ## Usage Example
//!
//! ```no_run
//! use twixt::q_learning::{QLearningAgent, QLearningConfig};
//! use twixt::twixt::GameState;
//!
//! let mut agent = QLearningAgent::new(QLearningConfig::default()).with_seed(7);
//! let state = GameState::new();
//! let action = agent.choose_action(&state, true);
//! ```

pub mod agent;
pub mod q_table;
pub mod reward;
pub mod serialization;

pub use agent::{QLearningAgent, QLearningConfig};
pub use q_table::QTable;
pub use reward::shaped_reward;
pub use serialization::Checkpoint;
