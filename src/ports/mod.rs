//! Ports (trait boundaries) for external dependencies.
//!
//! The game and agents own these traits; adapters and pipeline types
//! implement them.

pub mod learner;
pub mod observer;
pub mod repository;

pub use learner::Learner;
pub use observer::{CheckpointSummary, EpisodeSummary, Observer};
pub use repository::CheckpointRepository;
