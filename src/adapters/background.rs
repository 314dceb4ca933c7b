//! Background checkpoint saving.
//!
//! A save runs on its own thread against a snapshot taken before the thread
//! starts, so training can keep mutating the agent. Callers must [`wait`]
//! on the handle before loading the same path again.
//!
//! [`wait`]: SaveHandle::wait

use std::{
    path::PathBuf,
    thread::{self, JoinHandle},
};

use crate::{Result, error::Error, ports::CheckpointRepository, q_learning::Checkpoint};

/// Handle to an outstanding background save
#[derive(Debug)]
pub struct SaveHandle {
    path: PathBuf,
    handle: JoinHandle<Result<()>>,
}

impl SaveHandle {
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Block until the save completes and return its result.
    pub fn wait(self) -> Result<()> {
        let path = self.path;
        self.handle.join().map_err(|_| Error::BackgroundTask {
            message: format!("checkpoint save to {path:?} panicked"),
        })?
    }
}

/// Start saving `checkpoint` to `path` on a new thread.
pub fn save_in_background<R>(repository: R, checkpoint: Checkpoint, path: PathBuf) -> SaveHandle
where
    R: CheckpointRepository + 'static,
{
    let target = path.clone();
    let handle = thread::spawn(move || repository.save(&checkpoint, &target));
    SaveHandle { path, handle }
}
