//! `formsync status` — which forms would a sync create, update or skip.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use formsync_sync::{pipeline, FormAction, PlannedForm};

use crate::StateLocation;

/// Arguments for `formsync status`.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Path to the forms YAML file.
    pub config: PathBuf,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub location: StateLocation,
}

impl StatusArgs {
    pub fn run(self) -> Result<()> {
        let paths = self.location.resolve(&self.config);
        let prepared = pipeline::prepare(&self.config, &paths)
            .with_context(|| format!("cannot read status for '{}'", self.config.display()))?;

        if self.json {
            print_json(&prepared.plan)?;
            return Ok(());
        }
        print_table(&prepared.plan);
        Ok(())
    }
}

#[derive(Serialize)]
struct StatusReportJson<'a> {
    summary: StatusSummaryJson,
    forms: Vec<FormStatusJson<'a>>,
}

#[derive(Serialize)]
struct StatusSummaryJson {
    forms: usize,
    new: usize,
    changed: usize,
    current: usize,
}

#[derive(Serialize)]
struct FormStatusJson<'a> {
    id: &'a str,
    title: &'a str,
    status: &'static str,
    fingerprint: &'a str,
    url: Option<&'a str>,
}

#[derive(Tabled)]
struct StatusTableRow {
    #[tabled(rename = "form")]
    id: String,
    #[tabled(rename = "title")]
    title: String,
    #[tabled(rename = "status")]
    status: String,
    #[tabled(rename = "url")]
    url: String,
}

fn count(plan: &[PlannedForm], action: FormAction) -> usize {
    plan.iter().filter(|p| p.action == action).count()
}

fn summary(plan: &[PlannedForm]) -> StatusSummaryJson {
    StatusSummaryJson {
        forms: plan.len(),
        new: count(plan, FormAction::Create),
        changed: count(plan, FormAction::Update),
        current: count(plan, FormAction::Unchanged),
    }
}

fn print_json(plan: &[PlannedForm]) -> Result<()> {
    let payload = StatusReportJson {
        summary: summary(plan),
        forms: plan
            .iter()
            .map(|p| FormStatusJson {
                id: &p.id.0,
                title: &p.title,
                status: action_key(p.action),
                fingerprint: &p.fingerprint,
                url: p.url.as_deref(),
            })
            .collect(),
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&payload).context("failed to serialize status JSON")?
    );
    Ok(())
}

fn print_table(plan: &[PlannedForm]) {
    let summary = summary(plan);
    println!(
        "formsync v{} | {} forms | {} new | {} changed | {} current",
        env!("CARGO_PKG_VERSION"),
        summary.forms,
        summary.new,
        summary.changed,
        summary.current,
    );

    if plan.is_empty() {
        println!("No forms defined in config.");
        return;
    }

    let rows: Vec<StatusTableRow> = plan
        .iter()
        .map(|p| StatusTableRow {
            id: p.id.0.clone(),
            title: p.title.clone(),
            status: action_label(p.action),
            url: p.url.clone().unwrap_or_else(|| "-".to_string()),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");

    if summary.new + summary.changed > 0 {
        println!("Run 'formsync sync <config>' to apply.");
    }
}

fn action_key(action: FormAction) -> &'static str {
    match action {
        FormAction::Create => "new",
        FormAction::Update => "changed",
        FormAction::Unchanged => "current",
    }
}

fn action_label(action: FormAction) -> String {
    match action {
        FormAction::Create => "NEW".green().bold().to_string(),
        FormAction::Update => "CHANGED".yellow().bold().to_string(),
        FormAction::Unchanged => "CURRENT".bright_black().to_string(),
    }
}
