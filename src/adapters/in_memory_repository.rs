//! In-memory checkpoint repository for testing.
//!
//! Stores encoded checkpoints in a shared map keyed by path, so pipeline
//! tests can exercise saving and resuming without touching the file system.

use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use crate::{Result, error::Error, ports::CheckpointRepository, q_learning::Checkpoint};

/// In-memory repository for testing.
///
/// All clones share the same underlying storage.
///
/// # Examples
///
/// ```
/// use std::path::Path;
///
/// use twixt::adapters::InMemoryRepository;
/// use twixt::ports::CheckpointRepository;
/// use twixt::q_learning::QLearningAgent;
///
/// let repo = InMemoryRepository::new();
/// let agent = QLearningAgent::default();
///
/// repo.save(&agent.snapshot(), Path::new("agent"))?;
/// let loaded = repo.load(Path::new("agent"))?;
/// assert_eq!(loaded.epsilon, agent.epsilon());
/// # Ok::<(), twixt::Error>(())
/// ```
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    storage: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn storage(&self) -> MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.storage.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of checkpoints currently stored
    pub fn count(&self) -> usize {
        self.storage().len()
    }

    pub fn clear(&self) {
        self.storage().clear();
    }

    /// Store raw bytes under `path`, e.g. to simulate a corrupted file
    pub fn insert_raw(&self, path: &Path, bytes: Vec<u8>) {
        self.storage().insert(path.to_string_lossy().to_string(), bytes);
    }
}

impl CheckpointRepository for InMemoryRepository {
    fn save(&self, checkpoint: &Checkpoint, path: &Path) -> Result<()> {
        let bytes = rmp_serde::to_vec(checkpoint).map_err(|e| Error::SerializationContext {
            operation: "serialize checkpoint for in-memory storage".to_string(),
            message: e.to_string(),
        })?;

        self.insert_raw(path, bytes);
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<Checkpoint> {
        let key = path.to_string_lossy().to_string();
        let storage = self.storage();

        let bytes = storage.get(&key).ok_or_else(|| Error::Io {
            operation: format!("load checkpoint from in-memory storage at {path:?}"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "key not found in memory"),
        })?;

        rmp_serde::from_slice(bytes).map_err(|e| Error::Load {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    fn exists(&self, path: &Path) -> bool {
        self.storage()
            .contains_key(path.to_string_lossy().as_ref())
    }
}
