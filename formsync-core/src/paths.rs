//! Per-config file locations.
//!
//! Each configuration file gets its own state and credential files, named
//! after the config's file stem and placed next to it:
//!
//! ```text
//! surveys/
//!   questions.yml
//!   questions_state.json   (logical id → remote form mapping)
//!   questions_token.json   (cached OAuth credentials)
//! ```

use std::path::{Path, PathBuf};

/// Stem used when the config path has none (e.g. `..`).
pub const DEFAULT_BASE_NAME: &str = "forms";

pub const STATE_SUFFIX: &str = "_state.json";
pub const TOKEN_SUFFIX: &str = "_token.json";

/// State and credential file locations for one configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncPaths {
    pub state_file: PathBuf,
    pub token_file: PathBuf,
}

impl SyncPaths {
    /// Files next to `config`, named after its stem.
    pub fn for_config(config: &Path) -> Self {
        let dir = config
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        Self::in_dir(dir, &base_name(config))
    }

    /// Files for `base` inside `dir`.
    pub fn in_dir(dir: &Path, base: &str) -> Self {
        Self {
            state_file: dir.join(format!("{base}{STATE_SUFFIX}")),
            token_file: dir.join(format!("{base}{TOKEN_SUFFIX}")),
        }
    }
}

/// File stem of the config path, e.g. `questions` for `surveys/questions.yml`.
pub fn base_name(config: &Path) -> String {
    config
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty() && s != "..")
        .unwrap_or_else(|| DEFAULT_BASE_NAME.to_string())
}
