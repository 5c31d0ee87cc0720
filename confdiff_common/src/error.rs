use crate::FormatKind;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfDiffError {
    #[error("Failed to read {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{format} parse error: {message}")]
    Parse { format: FormatKind, message: String },

    #[error("Diff render error: {0}")]
    DiffRender(String),

    #[error("Invalid pattern: {0}")]
    Pattern(String),

    #[error("Not a directory: {0}")]
    Directory(String),
}

impl ConfDiffError {
    pub fn file_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfDiffError>;
