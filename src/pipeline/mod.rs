//! Training and evaluation pipeline abstractions
//!
//! This module provides composable pipelines for:
//! - Training the Q-learning agent against a fixed opponent
//! - Evaluating learned policies against baselines
//! - Recording observations during training

pub mod evaluation;
pub mod learners;
pub mod observers;
pub mod training;

pub use evaluation::{
    ComparisonReport, EvaluationReport, compare_vs_minimax, evaluate_against_minimax,
    evaluate_agent, play_match, win_rate_against,
};
pub use learners::{MinimaxLearner, RandomLearner};
pub use observers::{
    EpisodeObservation, JsonlObserver, MetricsObserver, MetricsSummary, ProgressObserver,
    SharedObserver, StepObservation,
};
pub use training::{OpponentKind, TrainingConfig, TrainingPipeline, TrainingResult, resume_agent};

pub use crate::ports::{Learner, Observer};
