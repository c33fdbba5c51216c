use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for results returned by the extraction pipeline.
pub type Result<T> = std::result::Result<T, ExtractError>;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failures surfaced by [`crate::extract_log_mel_feats`] and the archive reader.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("such set type not supported: {0}")]
    UnsupportedSplitType(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("train split requires a manifest path")]
    MissingManifest,

    #[error("failed to read manifest {}", path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("manifest line {line}: {reason}")]
    ManifestRow { line: u64, reason: String },

    #[error("i/o error on {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    #[error("failed to compute spectrogram for {file_name}")]
    Spectrogram {
        file_name: String,
        #[source]
        source: BoxError,
    },

    #[error("invalid feature archive: {0}")]
    Archive(String),

    #[error("feature archive encoding failed")]
    Encode(#[from] bincode::Error),
}

impl ExtractError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ExtractError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn decode(path: impl Into<PathBuf>, source: anyhow::Error) -> Self {
        ExtractError::Decode {
            path: path.into(),
            source: source.into(),
        }
    }
}
