//! Shared sync entrypoints used by the CLI commands.

use std::path::Path;

use formsync_core::{config, FormSpec, SyncPaths};

use crate::client::FormsClient;
use crate::error::SyncError;
use crate::state_store::{self, SyncState};
use crate::synchronizer::{
    plan, FormAction, FormSynchronizer, PlannedForm, SyncEvent, SyncOptions, SyncReport,
};

/// Everything a command needs before deciding whether to talk to the remote.
#[derive(Debug)]
pub struct Prepared {
    pub specs: Vec<FormSpec>,
    pub state: SyncState,
    pub plan: Vec<PlannedForm>,
}

impl Prepared {
    /// `true` when every form is already up to date.
    pub fn is_noop(&self) -> bool {
        self.plan
            .iter()
            .all(|p| p.action == FormAction::Unchanged)
    }
}

/// Load the config and state for `config_path` and plan the pass.
///
/// No remote calls, no writes.
pub fn prepare(config_path: &Path, paths: &SyncPaths) -> Result<Prepared, SyncError> {
    let specs = config::load_at(config_path)?;
    let state = state_store::load_at(&paths.state_file)?;
    let plan = plan(&specs, &state);
    Ok(Prepared { specs, state, plan })
}

/// Sync prepared specs through `client`, reporting progress to `on_event`.
pub fn execute<C: FormsClient>(
    prepared: Prepared,
    paths: &SyncPaths,
    client: C,
    options: SyncOptions,
    on_event: impl FnMut(SyncEvent<'_>),
) -> Result<SyncReport, SyncError> {
    let mut synchronizer =
        FormSynchronizer::new(client, &paths.state_file, prepared.state).with_options(options);
    synchronizer.sync_with(&prepared.specs, on_event)
}

/// Load, plan and sync in one go.
pub fn run<C: FormsClient>(
    config_path: &Path,
    paths: &SyncPaths,
    client: C,
    options: SyncOptions,
) -> Result<SyncReport, SyncError> {
    let prepared = prepare(config_path, paths)?;
    execute(prepared, paths, client, options, |_| {})
}
