//! Error types for formsync-core.

use std::path::PathBuf;

use thiserror::Error;

/// Everything that can be wrong with a forms configuration.
///
/// Raised before any remote call is made for the affected form.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O failure while reading the document.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error — includes file path and line context from serde_yaml.
    #[error("failed to parse forms config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The configuration file did not exist.
    #[error("forms config not found at {path}")]
    NotFound { path: PathBuf },

    /// A form entry has an empty `id`.
    #[error("form #{index} has an empty id")]
    EmptyId { index: usize },

    /// Two form entries share the same logical id.
    #[error("duplicate form id '{id}'")]
    DuplicateId { id: String },

    /// A question uses a `type` outside the supported set.
    #[error(
        "question at index {position}: unsupported question type '{kind}' \
         (expected short_answer, paragraph or multiple_choice)"
    )]
    UnsupportedQuestionType { position: usize, kind: String },

    /// A `multiple_choice` question without any options.
    #[error("question at index {position}: multiple_choice requires at least one option")]
    MissingOptions { position: usize },
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ConfigError {
    ConfigError::Io {
        path: path.into(),
        source,
    }
}
