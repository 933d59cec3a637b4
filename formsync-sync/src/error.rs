//! Error types for formsync-sync.

use std::path::PathBuf;

use thiserror::Error;

use formsync_core::{ConfigError, FormId};

/// Failures reported by a [`FormsClient`](crate::FormsClient).
///
/// Never retried here; retry policy belongs to the transport.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The request never produced an HTTP response (DNS, TLS, connection reset…).
    #[error("transport error: {0}")]
    Transport(String),

    /// The service answered with a non-success status.
    #[error("remote service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body did not have the expected shape.
    #[error("unexpected response from remote service: {0}")]
    Decode(String),

    /// No usable credentials.
    #[error("authentication error: {0}")]
    Auth(String),
}

/// Failures loading or saving the sync state file.
#[derive(Debug, Error)]
pub enum StateError {
    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The state file exists but is not a valid state document.
    ///
    /// Never treated as empty: that would re-create every remote form.
    #[error("state file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// JSON serialization error (save path).
    #[error("state JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// All errors that can arise from sync operations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Configuration could not be loaded.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// State file could not be loaded or saved.
    #[error("state error: {0}")]
    State(#[from] StateError),

    /// Syncing one form failed; earlier forms are already persisted.
    #[error("form '{id}': {source}")]
    Form {
        id: FormId,
        #[source]
        source: FormError,
    },
}

/// Why a single form could not be synced.
#[derive(Debug, Error)]
pub enum FormError {
    /// The form's questions are invalid; no remote call was made.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A remote call failed; the form's state entry was left untouched.
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// The remote side succeeded but persisting the new state failed.
    #[error(transparent)]
    State(#[from] StateError),
}

/// Convenience constructor for [`StateError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> StateError {
    StateError::Io {
        path: path.into(),
        source,
    }
}
