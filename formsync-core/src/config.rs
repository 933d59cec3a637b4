//! Forms configuration loading.
//!
//! # Document layout
//!
//! ```yaml
//! forms:
//!   - id: feedback             # logical id, stable across runs
//!     title: Customer feedback
//!     description: Tell us how we did
//!     questions:
//!       - text: Your name
//!         type: short_answer
//!         required: true
//!       - text: Rating
//!         type: multiple_choice
//!         options: [Good, Okay, Bad]
//! ```
//!
//! Loading checks document-level structure only (ids present and unique).
//! Question-level checks (supported `type`, options for `multiple_choice`)
//! happen when the questions are compiled, per form.

use std::collections::HashSet;
use std::path::Path;

use crate::error::{io_err, ConfigError};
use crate::types::{FormConfig, FormSpec};

/// Load and validate the forms configuration at `path`.
///
/// Returns `ConfigError::NotFound` if absent,
/// `ConfigError::Parse` (with path + line context) if malformed YAML.
pub fn load_at(path: &Path) -> Result<Vec<FormSpec>, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    let config: FormConfig =
        serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
    validate(&config.forms)?;
    Ok(config.forms)
}

/// Document-level checks: every form has a non-empty, unique id.
///
/// Duplicate ids would make two forms fight over one state entry.
pub fn validate(forms: &[FormSpec]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for (index, form) in forms.iter().enumerate() {
        if form.id.0.trim().is_empty() {
            return Err(ConfigError::EmptyId { index });
        }
        if !seen.insert(form.id.0.as_str()) {
            return Err(ConfigError::DuplicateId {
                id: form.id.0.clone(),
            });
        }
    }
    Ok(())
}
