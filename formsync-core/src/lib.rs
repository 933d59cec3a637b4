//! formsync core library — form definitions, config loading, errors.
//!
//! Public API surface:
//! - [`types`] — newtypes and the form / question specification structs
//! - [`error`] — [`ConfigError`]
//! - [`config`] — load and validate a forms configuration document
//! - [`paths`] — per-config state and credential file locations

pub mod config;
pub mod error;
pub mod paths;
pub mod types;

pub use error::ConfigError;
pub use paths::SyncPaths;
pub use types::{FormConfig, FormId, FormSpec, QuestionKind, QuestionSpec};
