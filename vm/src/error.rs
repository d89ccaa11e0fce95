use std::path::PathBuf;

use thiserror::Error;

use crate::types::FrameNumber;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Trace {} cannot be read: {source}", .path.display())]
    TraceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed trace line {position}: {line:?}")]
    MalformedLine { position: usize, line: String },
    #[error("Frame count must be positive, got {0}")]
    InvalidFrameCount(FrameNumber),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
