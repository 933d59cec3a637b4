//! # formsync-sync
//!
//! Fingerprint-gated synchronization of form definitions against a remote
//! forms service.
//!
//! Call [`pipeline::run`] to sync every form of a configuration file, or
//! drive a [`FormSynchronizer`] directly with already-loaded specs.

pub mod client;
pub mod compiler;
pub mod error;
pub mod fingerprint;
pub mod pipeline;
pub mod request;
pub mod state_store;
pub mod synchronizer;

pub use client::{FormsClient, RemoteError, RemoteForm};
pub use error::{FormError, StateError, SyncError};
pub use fingerprint::fingerprint;
pub use state_store::{SyncRecord, SyncState};
pub use synchronizer::{
    plan, FormAction, FormOutcome, FormSynchronizer, PlannedForm, SyncEvent, SyncOptions,
    SyncReport,
};
