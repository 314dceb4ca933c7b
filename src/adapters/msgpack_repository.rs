//! MessagePack implementation of the checkpoint repository.
//!
//! Checkpoints are written to a sibling temp file first and renamed over the
//! target, so readers only ever see a complete file.

use std::{
    ffi::OsString,
    fs::{self, File},
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::{Result, error::Error, ports::CheckpointRepository, q_learning::Checkpoint};

/// MessagePack-based checkpoint repository.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
///
/// use twixt::adapters::MsgPackRepository;
/// use twixt::ports::CheckpointRepository;
/// use twixt::q_learning::QLearningAgent;
///
/// let repo = MsgPackRepository::new();
/// let agent = QLearningAgent::default();
///
/// repo.save(&agent.snapshot(), Path::new("twixt_q_learning.msgpack"))?;
/// let loaded = repo.load(Path::new("twixt_q_learning.msgpack"))?;
/// # Ok::<(), twixt::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MsgPackRepository;

impl MsgPackRepository {
    pub fn new() -> Self {
        Self
    }
}

/// `<path>.tmp` next to the target
pub fn temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

impl CheckpointRepository for MsgPackRepository {
    fn save(&self, checkpoint: &Checkpoint, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| Error::Io {
                operation: format!("create directory {parent:?}"),
                source,
            })?;
        }

        let tmp = temp_path(path);
        let file = File::create(&tmp).map_err(|source| Error::Io {
            operation: format!("create file {tmp:?}"),
            source,
        })?;
        let mut writer = BufWriter::new(file);

        rmp_serde::encode::write(&mut writer, checkpoint).map_err(|e| {
            Error::SerializationContext {
                operation: "serialize checkpoint to MessagePack".to_string(),
                message: e.to_string(),
            }
        })?;
        writer.flush().map_err(|source| Error::Io {
            operation: format!("flush file {tmp:?}"),
            source,
        })?;
        drop(writer);

        fs::rename(&tmp, path).map_err(|source| Error::Io {
            operation: format!("rename {tmp:?} to {path:?}"),
            source,
        })?;

        Ok(())
    }

    fn load(&self, path: &Path) -> Result<Checkpoint> {
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open file {path:?}"),
            source,
        })?;

        rmp_serde::decode::from_read(BufReader::new(file)).map_err(|e| Error::Load {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }
}
