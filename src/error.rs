//! Error types
//!
//! Only level loading can fail hard. Everything at runtime degrades to a
//! skipped check instead of an error value.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal failures while loading a level description
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("failed to read level file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("level parse error on line {line}: {message}")]
    Parse { line: usize, message: String },
}

impl LevelError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}

/// Entity world failures
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorldError {
    #[error("an entity named `{0}` already exists")]
    DuplicateName(String),
}
