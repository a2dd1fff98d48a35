//! Error type shared by the scan, rewrite and publish steps.
//! Every variant is fatal to a run; nothing written before the failure is
//! rolled back.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("cannot list {}: {source}", path.display())]
    ListDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// File name does not follow `_YYYY-MM-DD-<name>.<ext>`.
    #[error("invalid note name {name}: {reason}")]
    InvalidName { name: String, reason: String },

    /// Notes need two lines for the index excerpt.
    #[error("note {} has {lines} line(s); at least 2 are needed for the excerpt", path.display())]
    MalformedNote { path: PathBuf, lines: usize },

    #[error("publish failed: {0}")]
    Publish(#[source] io::Error),
}

pub type Result<T> = std::result::Result<T, IndexError>;
