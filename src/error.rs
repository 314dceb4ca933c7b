//! Error types for the Twixt crate

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the Twixt crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid move: ({row}, {col}) is out of bounds or already occupied")]
    InvalidMove { row: usize, col: usize },

    #[error("game already over")]
    GameOver,

    #[error("no valid moves available")]
    NoValidMoves,

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("failed to parse configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to {operation}: {message}")]
    SerializationContext { operation: String, message: String },

    #[error("failed to load checkpoint {path:?}: {message}")]
    Load { path: PathBuf, message: String },

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },

    #[error("background task failed: {message}")]
    BackgroundTask { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_move_display() {
        let err = Error::InvalidMove { row: 7, col: 2 };
        assert_eq!(
            err.to_string(),
            "invalid move: (7, 2) is out of bounds or already occupied"
        );
    }

    #[test]
    fn test_load_error_display() {
        let err = Error::Load {
            path: PathBuf::from("agent.msgpack"),
            message: "unexpected end of input".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "failed to load checkpoint \"agent.msgpack\": unexpected end of input"
        );
    }
}
