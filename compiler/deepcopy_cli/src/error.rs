use std::path::PathBuf;

use deepcopy_ir::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: {source}", .path.display())]
    Model {
        path: PathBuf,
        #[source]
        source: ModelError,
    },

    /// Refuse to replace a file that was not written by the generator.
    #[error("{}: exists and is not a generated file", .path.display())]
    Foreign { path: PathBuf },

    #[error("{count} package(s) failed")]
    Failed { count: usize },

    #[error("{count} generated file(s) are out of date")]
    Stale { count: usize },
}

impl CliError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Process exit code: 2 for usage errors, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Usage(_) => 2,
            _ => 1,
        }
    }
}
