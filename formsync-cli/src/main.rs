//! formsync — keep Google Forms in sync with a YAML definition file.
//!
//! # Usage
//!
//! ```text
//! formsync sync <config.yml> [--dry-run] [--keep-going] [--state-dir <dir>] [--token-file <file>]
//! formsync status <config.yml> [--json] [--state-dir <dir>]
//! formsync validate <config.yml>
//! ```
//!
//! State and cached credentials live next to the config file as
//! `<stem>_state.json` and `<stem>_token.json`.

mod commands;
mod credentials;
mod google;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use commands::{status::StatusArgs, sync::SyncArgs, validate::ValidateArgs};
use formsync_core::{paths, SyncPaths};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "formsync",
    version,
    about = "Create and update Google Forms from a YAML definition file",
    long_about = None,
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). `RUST_LOG` overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create or update every form in the config file.
    Sync(SyncArgs),

    /// Show which forms are new, changed or current.
    Status(StatusArgs),

    /// Check the config file without contacting the forms service.
    Validate(ValidateArgs),
}

// ---------------------------------------------------------------------------
// Shared location arguments
// ---------------------------------------------------------------------------

/// Where the state file for a config lives.
#[derive(Args, Debug, Clone)]
pub struct StateLocation {
    /// Directory for `<stem>_state.json` (default: next to the config file).
    #[arg(long, value_name = "DIR")]
    pub state_dir: Option<PathBuf>,
}

impl StateLocation {
    pub fn resolve(&self, config: &Path) -> SyncPaths {
        match &self.state_dir {
            Some(dir) => SyncPaths::in_dir(dir, &paths::base_name(config)),
            None => SyncPaths::for_config(config),
        }
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let env = env_logger::Env::default().default_filter_or(default);
    let _ = env_logger::Builder::from_env(env)
        .format_target(false)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.command {
        Commands::Sync(args) => args.run(),
        Commands::Status(args) => args.run(),
        Commands::Validate(args) => args.run(),
    }
}
