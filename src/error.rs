use std::path::PathBuf;

use thiserror::Error;

use crate::data::model::MemberKind;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Input problems that stop a check before it can pass or fail.
///
/// Every variant exits with its own status so callers can tell a bad input
/// apart from a short dataset (exit 1).
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("no file containing '{marker}' in {}", dir.display())]
    NoWorkloadFile { dir: PathBuf, marker: String },

    #[error("cannot list {}", dir.display())]
    ListDir {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read {}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    #[error("dataset '{dataset}' in {} is scalar and has no leading dimension", path.display())]
    ScalarDataset { path: PathBuf, dataset: String },

    #[error("top-level member '{member}' in {} is a {kind}, not a dataset", path.display())]
    NotADataset {
        path: PathBuf,
        member: String,
        kind: MemberKind,
    },

    #[error("invalid configuration")]
    Config(#[source] BoxError),
}

impl CheckError {
    pub fn unreadable(path: impl Into<PathBuf>, err: anyhow::Error) -> Self {
        CheckError::Unreadable {
            path: path.into(),
            source: err.into(),
        }
    }

    pub fn config(err: anyhow::Error) -> Self {
        CheckError::Config(err.into())
    }

    /// Process exit status for this error. Never 0 or 1.
    pub fn exit_code(&self) -> u8 {
        match self {
            CheckError::NoWorkloadFile { .. } | CheckError::ListDir { .. } => 3,
            CheckError::Unreadable { .. } => 4,
            CheckError::ScalarDataset { .. } => 5,
            CheckError::Config(_) => 6,
            CheckError::NotADataset { .. } => 7,
        }
    }
}
