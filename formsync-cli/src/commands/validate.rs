//! `formsync validate <config>` — offline config check.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;

use formsync_core::config;
use formsync_sync::compiler::compile_items;

/// Check a config file: structure, question types and options.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to the forms YAML file.
    pub config: PathBuf,
}

impl ValidateArgs {
    pub fn run(self) -> Result<()> {
        let forms = config::load_at(&self.config)
            .with_context(|| format!("invalid config '{}'", self.config.display()))?;

        let mut invalid = 0;
        for form in &forms {
            match compile_items(form) {
                Ok(items) => println!(
                    "{} '{}' — {} question(s)",
                    "✓".green(),
                    form.id,
                    items.len()
                ),
                Err(e) => {
                    invalid += 1;
                    println!("{} '{}' — {e}", "✗".red().bold(), form.id);
                }
            }
        }

        if invalid > 0 {
            bail!("{invalid} of {} form(s) are invalid", forms.len());
        }
        println!("{} form(s) valid", forms.len());
        Ok(())
    }
}
