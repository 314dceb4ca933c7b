//! Twixt connection game with two agents
//!
//! This crate provides:
//! - The Twixt board, rules and win detection, with adjacency and bridge
//!   connection rules
//! - A heuristic evaluator and a depth-limited alpha-beta minimax agent
//! - A tabular Q-learning agent with reward shaping and checkpointing
//! - Training and evaluation pipelines with pluggable observers

pub mod adapters;
pub mod cli;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod minimax;
pub mod pipeline;
pub mod ports;
pub mod q_learning;
pub mod twixt;

pub use config::TwixtConfig;
pub use error::{Error, Result};
pub use evaluator::{Evaluator, EvaluatorWeights};
pub use minimax::{MinimaxAgent, SearchResult};
pub use q_learning::{QLearningAgent, QLearningConfig};
pub use twixt::{ConnectionRule, GameOutcome, GameState, Move, Player};
