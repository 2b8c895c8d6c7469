use std::io;
use std::path::PathBuf;

/// Crate-level error type for taskline operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("task number {position} is out of range (list has {len} tasks)")]
    PositionOutOfRange { position: usize, len: usize },

    #[error("malformed record on line {line}: {text:?}")]
    MalformedLine { line: usize, text: String },

    #[error("unable to find home directory")]
    NoHomeDir,

    #[error("another instance of taskline appears to be running (lock file exists at {})", .0.display())]
    AlreadyRunning(PathBuf),
}

/// Result type alias for taskline operations.
pub type Result<T> = std::result::Result<T, Error>;
