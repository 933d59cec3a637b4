//! Form synchronizer: decide create / update / skip per form and apply it.
//!
//! ## Per-form protocol
//!
//! 1. Fingerprint the spec.
//! 2. Look up the stored record for the logical id.
//! 3. Compile every question (config errors stop here, before any remote call).
//! 4. Absent → create the form, then one batch: description, items, settings.
//! 5. Same fingerprint → skip.
//! 6. Different fingerprint → fetch the form; batch 1 replaces title and
//!    description and deletes every question item from the highest index
//!    down; batch 2 inserts the new items at 0..N-1.
//! 7. Record the new fingerprint and save the state file.
//!
//! Forms are processed strictly in order. The delete-then-insert sequence
//! relies on nothing else mutating the same remote form in between.

use std::path::{Path, PathBuf};

use formsync_core::{FormId, FormSpec};

use crate::client::{edit_url, FormsClient};
use crate::compiler::compile_items;
use crate::error::{FormError, SyncError};
use crate::fingerprint::fingerprint;
use crate::request::Request;
use crate::state_store::{self, SyncRecord, SyncState};

// ---------------------------------------------------------------------------
// Planning
// ---------------------------------------------------------------------------

/// What a sync pass will do with one form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    /// No stored record: the remote form will be created.
    Create,
    /// Stored fingerprint differs: the remote form will be rewritten.
    Update,
    /// Stored fingerprint matches: nothing to do.
    Unchanged,
}

/// Planned action for one form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedForm {
    pub id: FormId,
    pub title: String,
    pub action: FormAction,
    pub fingerprint: String,
    /// Edit URL of the existing remote form, if any.
    pub url: Option<String>,
}

/// Decide, without side effects, what syncing `specs` against `state` does.
pub fn plan(specs: &[FormSpec], state: &SyncState) -> Vec<PlannedForm> {
    specs
        .iter()
        .map(|spec| {
            let fingerprint = fingerprint(spec);
            let record = state.get(&spec.id.0);
            let action = classify(record, &fingerprint);
            PlannedForm {
                id: spec.id.clone(),
                title: spec.title.clone(),
                action,
                fingerprint,
                url: record.map(|r| r.url.clone()),
            }
        })
        .collect()
}

fn classify(record: Option<&SyncRecord>, fingerprint: &str) -> FormAction {
    match record {
        None => FormAction::Create,
        Some(r) if r.hash == fingerprint => FormAction::Unchanged,
        Some(_) => FormAction::Update,
    }
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Outcome of syncing one form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOutcome {
    Created { id: FormId, title: String, url: String },
    Updated { id: FormId, title: String, url: String },
    Unchanged { id: FormId, title: String },
    /// `dry_run`: the form *would* have been created.
    WouldCreate { id: FormId, title: String },
    /// `dry_run`: the form *would* have been updated.
    WouldUpdate { id: FormId, title: String, url: String },
    /// `keep_going`: the form failed and its state entry was left as it was.
    Failed { id: FormId, title: String, error: String },
}

impl FormOutcome {
    pub fn id(&self) -> &FormId {
        match self {
            FormOutcome::Created { id, .. }
            | FormOutcome::Updated { id, .. }
            | FormOutcome::Unchanged { id, .. }
            | FormOutcome::WouldCreate { id, .. }
            | FormOutcome::WouldUpdate { id, .. }
            | FormOutcome::Failed { id, .. } => id,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, FormOutcome::Failed { .. })
    }
}

/// Outcome of a whole sync pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub outcomes: Vec<FormOutcome>,
}

impl SyncReport {
    pub fn failures(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failure()).count()
    }

    pub fn changed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, FormOutcome::Created { .. } | FormOutcome::Updated { .. }))
            .count()
    }
}

/// Progress of a sync pass, as seen by the caller's observer.
#[derive(Debug, Clone, Copy)]
pub enum SyncEvent<'a> {
    /// Remote calls for `spec` are about to start (never sent in dry runs
    /// or for unchanged forms).
    Applying { spec: &'a FormSpec, action: FormAction },
    /// The form is done; with `keep_going` this includes failures.
    Finished(&'a FormOutcome),
}

/// Knobs for a sync pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncOptions {
    /// Report what would change; make no remote calls and write no state.
    pub dry_run: bool,
    /// Record a failing form and continue with the next one instead of
    /// stopping the pass.
    pub keep_going: bool,
}

// ---------------------------------------------------------------------------
// Synchronizer
// ---------------------------------------------------------------------------

/// Applies form specs to a remote service and keeps the state file current.
pub struct FormSynchronizer<C> {
    client: C,
    state_path: PathBuf,
    state: SyncState,
    options: SyncOptions,
}

impl<C: FormsClient> FormSynchronizer<C> {
    /// Synchronizer over an already-loaded `state`, persisted to `state_path`.
    pub fn new(client: C, state_path: impl Into<PathBuf>, state: SyncState) -> Self {
        Self {
            client,
            state_path: state_path.into(),
            state,
            options: SyncOptions::default(),
        }
    }

    /// Synchronizer over the state file at `state_path` (empty if absent).
    pub fn open(client: C, state_path: &Path) -> Result<Self, SyncError> {
        let state = state_store::load_at(state_path)?;
        Ok(Self::new(client, state_path, state))
    }

    pub fn with_options(mut self, options: SyncOptions) -> Self {
        self.options = options;
        self
    }

    pub fn state(&self) -> &SyncState {
        &self.state
    }

    pub fn into_state(self) -> SyncState {
        self.state
    }

    /// Sync every spec, in order.
    pub fn sync(&mut self, specs: &[FormSpec]) -> Result<SyncReport, SyncError> {
        self.sync_with(specs, |_| {})
    }

    /// Sync every spec, in order, reporting progress to `on_event`.
    ///
    /// Without `keep_going` the first failure is returned as
    /// [`SyncError::Form`]; forms before it are already persisted. The
    /// failing form has still seen its [`SyncEvent::Applying`].
    pub fn sync_with(
        &mut self,
        specs: &[FormSpec],
        mut on_event: impl FnMut(SyncEvent<'_>),
    ) -> Result<SyncReport, SyncError> {
        let mut report = SyncReport::default();
        for spec in specs {
            if !self.options.dry_run {
                let action = classify(self.state.get(&spec.id.0), &fingerprint(spec));
                if action != FormAction::Unchanged {
                    on_event(SyncEvent::Applying { spec, action });
                }
            }
            let outcome = match self.sync_one(spec) {
                Ok(outcome) => outcome,
                Err(source) if self.options.keep_going => {
                    tracing::warn!("form '{}' failed: {source}", spec.id);
                    FormOutcome::Failed {
                        id: spec.id.clone(),
                        title: spec.title.clone(),
                        error: source.to_string(),
                    }
                }
                Err(source) => {
                    return Err(SyncError::Form {
                        id: spec.id.clone(),
                        source,
                    })
                }
            };
            on_event(SyncEvent::Finished(&outcome));
            report.outcomes.push(outcome);
        }
        Ok(report)
    }

    /// Sync a single spec.
    pub fn sync_one(&mut self, spec: &FormSpec) -> Result<FormOutcome, FormError> {
        let hash = fingerprint(spec);
        let id = spec.id.clone();
        let title = spec.title.clone();

        let existing = self.state.get(&spec.id.0).cloned();
        if let Some(record) = &existing {
            if record.hash == hash {
                tracing::debug!("unchanged: {id}");
                return Ok(FormOutcome::Unchanged { id, title });
            }
        }

        let items = compile_items(spec)?;

        match existing {
            None if self.options.dry_run => Ok(FormOutcome::WouldCreate { id, title }),
            Some(record) if self.options.dry_run => Ok(FormOutcome::WouldUpdate {
                id,
                title,
                url: record.url,
            }),
            None => {
                let record = self.create(spec, items, hash)?;
                let url = record.url.clone();
                self.commit(&spec.id, record)?;
                Ok(FormOutcome::Created { id, title, url })
            }
            Some(mut record) => {
                self.update(spec, &record.form_id, items)?;
                record.hash = hash;
                let url = record.url.clone();
                self.commit(&spec.id, record)?;
                Ok(FormOutcome::Updated { id, title, url })
            }
        }
    }

    fn create(
        &mut self,
        spec: &FormSpec,
        items: Vec<Request>,
        hash: String,
    ) -> Result<SyncRecord, FormError> {
        let form_id = self.client.create(&spec.title)?;
        tracing::info!("created remote form {form_id} for '{}'", spec.id);

        let mut requests = Vec::with_capacity(items.len() + 2);
        requests.push(Request::set_description(&spec.description));
        requests.extend(items);
        requests.push(Request::disable_quiz());

        tracing::debug!("{}: batch of {} requests", spec.id, requests.len());
        self.client.batch_update(&form_id, &requests)?;

        Ok(SyncRecord {
            url: edit_url(&form_id),
            form_id,
            hash,
        })
    }

    fn update(
        &mut self,
        spec: &FormSpec,
        form_id: &str,
        items: Vec<Request>,
    ) -> Result<(), FormError> {
        let current = self.client.get(form_id)?;
        let doomed = current.question_indices_descending();

        let mut requests = Vec::with_capacity(doomed.len() + 1);
        requests.push(Request::set_title_and_description(
            &spec.title,
            &spec.description,
        ));
        requests.extend(doomed.iter().map(|&index| Request::delete_item(index)));

        tracing::info!(
            "updating remote form {form_id} for '{}': {} question(s) removed, {} added",
            spec.id,
            doomed.len(),
            items.len()
        );
        self.client.batch_update(form_id, &requests)?;

        if !items.is_empty() {
            self.client.batch_update(form_id, &items)?;
        }
        Ok(())
    }

    /// Store `record` and persist the whole state.
    fn commit(&mut self, id: &FormId, record: SyncRecord) -> Result<(), FormError> {
        self.state.insert(id.0.clone(), record);
        state_store::save_at(&self.state_path, &self.state)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
