//! Error taxonomy shared by the parser, the consolidator and the file stores.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TopSeriesError>;

#[derive(Debug, Error)]
pub enum TopSeriesError {
    #[error("no input found: neither {} nor {} exists", raw.display(), table.display())]
    MissingInput { raw: PathBuf, table: PathBuf },

    #[error("directory does not exist: {}", .0.display())]
    MissingDirectory(PathBuf),

    #[error("malformed line {line}: {reason}: {text:?}")]
    MalformedLine {
        line: usize,
        reason: String,
        text: String,
    },

    #[error("cpu/mem series disagree: {0}")]
    Consistency(String),

    #[error("sampling interval must be finite and positive, got {0}")]
    InvalidInterval(f64),

    #[error("no such column: {0}")]
    UnknownColumn(String),

    #[error("malformed table {}: {reason}", path.display())]
    MalformedTable { path: PathBuf, reason: String },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("archive error on {}: {source}", path.display())]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },
}

impl TopSeriesError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result of a no-clobber write. An existing destination is reported, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    Written(PathBuf),
    AlreadyExists(PathBuf),
}

impl WriteOutcome {
    pub fn path(&self) -> &std::path::Path {
        match self {
            WriteOutcome::Written(p) | WriteOutcome::AlreadyExists(p) => p,
        }
    }

    pub fn was_written(&self) -> bool {
        matches!(self, WriteOutcome::Written(_))
    }
}
