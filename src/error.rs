//! Error type shared by every fallible operation in the crate.

use std::path::PathBuf;

/// Errors surfaced by ingestion, mesh loading, and export.
///
/// Missing inputs (no uploaded image, no composited texture yet) are not
/// errors; those paths return `None` instead.
#[derive(Debug, thiserror::Error)]
pub enum StudioError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to decode image: {0}")]
    Image(#[from] image::ImageError),

    #[error("not a base64 data URL")]
    MalformedDataUrl,

    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("invalid color {0:?}")]
    InvalidColor(String),

    #[error("invalid mesh asset {path}: {reason}")]
    Mesh { path: PathBuf, reason: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("background task ended without delivering a result")]
    TaskDropped,
}

impl StudioError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn mesh(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Mesh {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T, E = StudioError> = std::result::Result<T, E>;
