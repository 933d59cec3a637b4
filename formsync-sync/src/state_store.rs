//! Sync state — logical form id → remote form mapping.
//!
//! Persists a JSON object at the path given by
//! [`SyncPaths::state_file`](formsync_core::SyncPaths):
//!
//! ```json
//! { "feedback": { "form_id": "1FAIpQL…", "hash": "38682c…", "url": "https://…/edit" } }
//! ```
//!
//! Writes go to a `.tmp` sibling which is then renamed over the target, so a
//! reader sees either the previous document or the new one, never a mix.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{io_err, StateError};

/// Persisted record for one logical form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SyncRecord {
    /// Remote form id assigned by the service.
    pub form_id: String,
    /// Fingerprint of the spec last applied to the remote form.
    pub hash: String,
    pub url: String,
}

/// In-memory sync state, keyed by logical form id.
pub type SyncState = BTreeMap<String, SyncRecord>;

/// Temporary sibling used while saving `path`.
pub fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Load the state at `path`.
///
/// Returns an empty state if the file does not yet exist. A file that exists
/// but cannot be parsed is an error.
pub fn load_at(path: &Path) -> Result<SyncState, StateError> {
    if !path.exists() {
        return Ok(SyncState::new());
    }
    let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    serde_json::from_str(&contents).map_err(|e| StateError::Corrupt {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Save `state` to `path` atomically.
///
/// Writes to `<path>.tmp` then renames to `<path>`.
pub fn save_at(path: &Path, state: &SyncState) -> Result<(), StateError> {
    let json = serde_json::to_string_pretty(state)?;
    write_atomic(path, &json, &tmp_path(path))
}

fn write_atomic(path: &Path, contents: &str, tmp: &Path) -> Result<(), StateError> {
    if let Some(dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;
    }

    std::fs::write(tmp, contents).map_err(|e| io_err(tmp, e))?;
    if let Err(e) = std::fs::rename(tmp, path) {
        let _ = std::fs::remove_file(tmp);
        return Err(io_err(path, e));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(form_id: &str, hash: &str) -> SyncRecord {
        SyncRecord {
            form_id: form_id.to_string(),
            hash: hash.to_string(),
            url: crate::client::edit_url(form_id),
        }
    }

    #[test]
    fn empty_state_when_file_missing() {
        let tmp = TempDir::new().unwrap();
        let state = load_at(&tmp.path().join("questions_state.json")).unwrap();
        assert!(state.is_empty());
    }

    #[test]
    fn roundtrip_save_load() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("questions_state.json");
        let mut state = SyncState::new();
        state.insert("feedback".to_string(), record("f1", "deadbeef"));
        state.insert("signup".to_string(), record("f2", "cafebabe"));

        save_at(&path, &state).unwrap();
        assert_eq!(load_at(&path).unwrap(), state);
    }

    #[test]
    fn reads_files_written_by_older_tooling() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("questions_state.json");
        std::fs::write(
            &path,
            r#"{
  "feedback": {
    "form_id": "1FAIpQL",
    "hash": "38682cff",
    "url": "https://docs.google.com/forms/d/1FAIpQL/edit"
  }
}"#,
        )
        .unwrap();

        let state = load_at(&path).unwrap();
        assert_eq!(state["feedback"], record("1FAIpQL", "38682cff"));
    }

    #[test]
    fn tmp_file_cleaned_up_after_save() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("clean_state.json");
        save_at(&path, &SyncState::new()).unwrap();
        assert!(
            !tmp_path(&path).exists(),
            "tmp file should be removed after atomic rename"
        );
    }

    #[test]
    fn corrupt_file_is_an_error_not_an_empty_state() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad_state.json");
        std::fs::write(&path, "{\"feedback\": {\"form_id\": ").unwrap();

        let err = load_at(&path).unwrap_err();
        assert!(matches!(err, StateError::Corrupt { .. }), "got: {err}");
        assert!(err.to_string().contains("bad_state.json"));
    }

    #[test]
    fn interrupted_save_leaves_previous_state_readable() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("questions_state.json");
        let mut state = SyncState::new();
        state.insert("feedback".to_string(), record("f1", "v1"));
        save_at(&path, &state).unwrap();

        // A crash mid-save leaves a truncated tmp file and no rename.
        std::fs::write(tmp_path(&path), "{\"feedback\": {\"form_i").unwrap();

        assert_eq!(load_at(&path).unwrap(), state);

        // The next save replaces the stale tmp file.
        state.get_mut("feedback").unwrap().hash = "v2".to_string();
        save_at(&path, &state).unwrap();
        assert_eq!(load_at(&path).unwrap()["feedback"].hash, "v2");
        assert!(!tmp_path(&path).exists());
    }

    #[test]
    #[cfg(unix)]
    fn rename_failure_leaves_original_and_cleans_tmp() {
        use std::os::unix::fs::PermissionsExt;

        let root = TempDir::new().unwrap();
        let readonly_dir = root.path().join("readonly");
        std::fs::create_dir_all(&readonly_dir).unwrap();

        let path = readonly_dir.join("questions_state.json");
        std::fs::write(&path, "{}").unwrap();

        let mut perms = std::fs::metadata(&readonly_dir).unwrap().permissions();
        perms.set_mode(0o555);
        std::fs::set_permissions(&readonly_dir, perms).unwrap();

        let tmp_dir = TempDir::new().unwrap();
        let tmp = tmp_dir.path().join("questions_state.json.tmp");

        let result = write_atomic(&path, "{\"new\": 1}", &tmp);

        let mut perms = std::fs::metadata(&readonly_dir).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&readonly_dir, perms).unwrap();

        // Root ignores directory permissions; only check cleanup when it failed.
        if result.is_err() {
            assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
            assert!(!tmp.exists(), ".tmp should be cleaned up");
        }
    }
}
