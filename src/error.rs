use std::path::PathBuf;
use thiserror::Error;

/// Failures while reading one of the dashboard's input files.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse CSV {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },
    #[error("Failed to parse JSON {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl LoadError {
    pub(crate) fn from_io(path: PathBuf, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            LoadError::FileNotFound { path }
        } else {
            LoadError::Io { path, source }
        }
    }

    pub fn path(&self) -> &PathBuf {
        match self {
            LoadError::FileNotFound { path }
            | LoadError::Io { path, .. }
            | LoadError::Csv { path, .. }
            | LoadError::Json { path, .. } => path,
        }
    }
}
