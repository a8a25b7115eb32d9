//! CLI command definitions.
//!
//! This module defines the command structure for the Forge CLI along with
//! the pieces every command shares: the resolved home directory, credential
//! lookup and the interactive build driver.

use std::fs;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use thiserror::Error;
use tracing::debug;

use forge_core::{
    render_host_page, BuildOutcome, BuildRequest, CoreResult, Notification, NotificationKind,
    SessionController, Settings, SettingsStore, ViewState,
};
use forge_llm::{generate_code, Credential};

pub mod build;
pub mod config;
pub mod studio;

/// Forge - generate single-file web apps from a prompt
#[derive(Parser)]
#[command(name = "forge")]
#[command(version, about = "Forge - generate single-file web apps from a prompt")]
#[command(long_about = r#"
Forge turns a natural-language description into a self-contained HTML
application, then lets you refine it, step back and forth through versions
and export the result.

WORKFLOWS:
  build   → Generate one application and write it to disk
  studio  → Interactive session with refinement, history and preview
  config  → Manage the stored API key and generation settings

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments
  3 - Configuration error
  4 - Generation failure
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Directory holding settings.json (defaults to the user config dir)
    #[arg(long, global = true, env = "FORGE_HOME")]
    pub home: Option<PathBuf>,

    /// API key for this run; takes precedence over the stored key
    #[arg(long, global = true, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate an application from a single prompt
    Build(build::BuildArgs),

    /// Start an interactive build session
    Studio(studio::StudioArgs),

    /// Manage stored settings
    Config(config::ConfigArgs),
}

/// Failures specific to the command line surface.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Build failed: {0}")]
    BuildFailed(String),

    #[error("Build cancelled")]
    Cancelled,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Values resolved once from the global flags.
pub struct CliContext {
    pub store: SettingsStore,
    api_key: Option<String>,
    pub quiet: bool,
}

impl CliContext {
    pub fn from_cli(cli: &Cli) -> Self {
        Self::new(resolve_home(cli.home.clone()), cli.api_key.clone(), cli.quiet)
    }

    pub fn new(home: PathBuf, api_key: Option<String>, quiet: bool) -> Self {
        Self {
            store: SettingsStore::new(home),
            api_key,
            quiet,
        }
    }

    /// The explicit key wins over the stored one.
    pub fn credential(&self, settings: &Settings) -> Option<Credential> {
        self.api_key
            .clone()
            .and_then(Credential::new)
            .or_else(|| settings.credential())
    }
}

/// `--home` / `FORGE_HOME`, else `<config dir>/forge`, else `./.forge`.
pub fn resolve_home(explicit: Option<PathBuf>) -> PathBuf {
    explicit
        .or_else(|| dirs::config_dir().map(|dir| dir.join("forge")))
        .unwrap_or_else(|| PathBuf::from(".forge"))
}

/// Run one build against `session`, printing progress until the generator
/// answers. Ctrl-C abandons the build and yields `None`.
pub async fn drive_build(
    session: &mut SessionController,
    instruction: &str,
    refine: bool,
    credential: Option<&Credential>,
    quiet: bool,
) -> CoreResult<Option<BuildOutcome>> {
    let interrupted = async {
        if tokio::signal::ctrl_c().await.is_err() {
            // No signal support: never cancel.
            std::future::pending::<()>().await;
        }
    };
    drive_build_until(session, instruction, refine, credential, quiet, interrupted).await
}

/// [`drive_build`] with an arbitrary cancellation trigger.
pub async fn drive_build_until(
    session: &mut SessionController,
    instruction: &str,
    refine: bool,
    credential: Option<&Credential>,
    quiet: bool,
    cancel: impl Future<Output = ()>,
) -> CoreResult<Option<BuildOutcome>> {
    let BuildRequest {
        ticket,
        request,
        mut progress,
    } = session.begin_build(instruction, refine, credential)?;

    let generator = session.generator();
    let timeout = session.timeout();
    debug!(ticket = ticket.id(), generator = generator.name(), "Build started");

    let generation = generate_code(generator.as_ref(), &request, timeout);
    tokio::pin!(generation);
    tokio::pin!(cancel);
    let mut ticker = tokio::time::interval(Duration::from_secs(1));

    let result = loop {
        tokio::select! {
            result = &mut generation => break Some(result),
            _ = &mut cancel => break None,
            _ = ticker.tick() => {
                if let Some(step) = progress.next() {
                    if !quiet {
                        eprintln!("  [{:>3}%] {}", step.percent, step.text);
                    }
                }
            }
        }
    };

    match result {
        Some(outcome) => session.complete_build(ticket, outcome).map(Some),
        None => {
            session.cancel_build(ticket)?;
            Ok(None)
        }
    }
}

/// Write the sandboxed host page for `code` next to the settings and open it.
pub fn open_preview(home: &Path, code: &str, view: &ViewState) -> Result<PathBuf> {
    fs::create_dir_all(home)
        .with_context(|| format!("Failed to create {}", home.display()))?;
    let path = home.join("preview.html");
    fs::write(&path, render_host_page(code, view))
        .with_context(|| format!("Failed to write preview to {}", path.display()))?;
    open::that(&path).with_context(|| format!("Failed to open {}", path.display()))?;
    Ok(path)
}

pub fn print_notifications(notifications: &[Notification]) {
    for n in notifications {
        let icon = match n.kind {
            NotificationKind::Success => "✅",
            NotificationKind::Error => "❌",
            NotificationKind::Info => "ℹ️ ",
        };
        println!("{} {}: {}", icon, n.title, n.message);
    }
}
