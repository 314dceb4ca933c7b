//! Repository port for checkpoint persistence.

use std::{path::Path, sync::Arc};

use crate::{Result, q_learning::Checkpoint};

/// Port for persisting and loading Q-learning checkpoints.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
///
/// use twixt::{
///     ports::CheckpointRepository,
///     q_learning::QLearningAgent,
/// };
///
/// fn persist<R: CheckpointRepository>(repo: &R, agent: &QLearningAgent) -> twixt::Result<()> {
///     repo.save(&agent.snapshot(), Path::new("twixt_q_learning.msgpack"))
/// }
/// ```
pub trait CheckpointRepository: Send + Sync {
    /// Save a checkpoint, replacing anything stored at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the location cannot be written or serialization
    /// fails.
    fn save(&self, checkpoint: &Checkpoint, path: &Path) -> Result<()>;

    /// Load a checkpoint.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Load`] if the stored data is corrupted, and an
    /// I/O error if it cannot be read.
    fn load(&self, path: &Path) -> Result<Checkpoint>;

    fn exists(&self, path: &Path) -> bool;

    /// Load a checkpoint, or `None` when nothing is stored at `path`.
    fn load_optional(&self, path: &Path) -> Result<Option<Checkpoint>> {
        if !self.exists(path) {
            return Ok(None);
        }
        self.load(path).map(Some)
    }
}

impl<R: CheckpointRepository + ?Sized> CheckpointRepository for Arc<R> {
    fn save(&self, checkpoint: &Checkpoint, path: &Path) -> Result<()> {
        (**self).save(checkpoint, path)
    }

    fn load(&self, path: &Path) -> Result<Checkpoint> {
        (**self).load(path)
    }

    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }
}
