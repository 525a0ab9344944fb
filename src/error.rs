// Error types for comix.
// Distinguishes transport, remote-status, decode, and persistence failures.

use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ComixError {
    /// Connection-level failure before any HTTP status was received.
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The remote answered with a non-success status.
    #[error("remote error: HTTP {status} for {url}")]
    Remote { status: StatusCode, url: String },

    /// A response body that did not decode into the expected shape.
    #[error("decode error: {0}")]
    Decode(#[source] serde_json::Error),

    /// A fetched comic carried a number other than the one requested.
    #[error("requested comic {requested} but the response describes {received}")]
    NumberMismatch { requested: u32, received: u32 },

    /// The store file could not be read, written, or parsed.
    #[error("store file {}: {source}", path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: PersistenceError,
    },

    #[error("missing GITHUB_TOKEN environment variable")]
    MissingToken,

    #[error("editor failed: {0}")]
    Editor(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// What went wrong underneath a [`ComixError::Persistence`].
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ComixError>;
