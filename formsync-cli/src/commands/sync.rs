//! `formsync sync` — create or update the forms of a config file.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;

use formsync_core::SyncPaths;
use formsync_sync::{
    client::Offline,
    pipeline::{self, Prepared},
    FormAction, FormOutcome, FormsClient, SyncEvent, SyncOptions, SyncReport,
};

use crate::{credentials, google, StateLocation};

/// Arguments for `formsync sync`.
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Path to the forms YAML file.
    pub config: PathBuf,

    /// Show what would be created or updated without contacting the service.
    #[arg(long)]
    pub dry_run: bool,

    /// Continue with the next form when one fails (exit status is still non-zero).
    #[arg(long)]
    pub keep_going: bool,

    #[command(flatten)]
    pub location: StateLocation,

    /// Cached credentials file (default: `<stem>_token.json` next to the config).
    #[arg(long, value_name = "FILE")]
    pub token_file: Option<PathBuf>,
}

impl SyncArgs {
    pub fn run(self) -> Result<()> {
        let mut paths = self.location.resolve(&self.config);
        if let Some(token_file) = self.token_file.clone() {
            paths.token_file = token_file;
        }
        let options = SyncOptions {
            dry_run: self.dry_run,
            keep_going: self.keep_going,
        };

        let prepared = pipeline::prepare(&self.config, &paths)
            .with_context(|| format!("cannot prepare sync for '{}'", self.config.display()))?;

        // Nothing will reach the service: skip authentication entirely.
        let report = if self.dry_run || prepared.is_noop() {
            execute(prepared, &paths, Offline, options)?
        } else {
            let agent = google::agent();
            let token = credentials::access_token(&paths.token_file, &agent)
                .context("cannot authenticate with the forms service")?;
            execute(
                prepared,
                &paths,
                google::GoogleFormsClient::new(agent, token),
                options,
            )?
        };

        print_summary(&report, self.dry_run);
        let failures = report.failures();
        if failures > 0 {
            bail!("{failures} form(s) failed to sync");
        }
        Ok(())
    }
}

fn execute<C: FormsClient>(
    prepared: Prepared,
    paths: &SyncPaths,
    client: C,
    options: SyncOptions,
) -> Result<SyncReport> {
    let report = pipeline::execute(prepared, paths, client, options, print_event)
        .context("sync failed")?;
    Ok(report)
}

fn print_event(event: SyncEvent<'_>) {
    match event {
        SyncEvent::Applying { spec, action } => match action {
            FormAction::Create => println!("{} Creating form: {}", "+".green().bold(), spec.title),
            FormAction::Update => println!("{} Updating form: {}", "~".yellow().bold(), spec.title),
            FormAction::Unchanged => {}
        },
        SyncEvent::Finished(outcome) => print_outcome(outcome),
    }
}

fn print_outcome(outcome: &FormOutcome) {
    match outcome {
        FormOutcome::Created { url, .. } | FormOutcome::Updated { url, .. } => {
            println!("  Form URL: {url}");
        }
        FormOutcome::Unchanged { title, .. } => {
            println!("{} No changes for form: {title}", "·".bright_black());
        }
        FormOutcome::WouldCreate { title, .. } => {
            println!("[dry-run] {} Would create form: {title}", "+".green());
        }
        FormOutcome::WouldUpdate { title, url, .. } => {
            println!("[dry-run] {} Would update form: {title} ({url})", "~".yellow());
        }
        FormOutcome::Failed { id, title, error } => {
            eprintln!("{} Failed form: {title} ('{id}'): {error}", "✗".red().bold());
        }
    }
}

fn print_summary(report: &SyncReport, dry_run: bool) {
    let prefix = if dry_run { "[dry-run] " } else { "" };
    if report.outcomes.is_empty() {
        println!("{prefix}No forms defined in config.");
        return;
    }
    let unchanged = report
        .outcomes
        .iter()
        .filter(|o| matches!(o, FormOutcome::Unchanged { .. }))
        .count();
    let failed = report.failures();
    let changed = report.outcomes.len() - unchanged - failed;
    println!(
        "{prefix}✓ {} form(s): {changed} changed, {unchanged} unchanged, {failed} failed",
        report.outcomes.len(),
    );
}
