//! Build command - Generate one application and write it to disk.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use forge_core::{BuildOutcome, CoreError, SessionController};
use forge_llm::GeminiClient;

use super::{drive_build, open_preview, print_notifications, CliContext, CliError};

#[derive(Args)]
pub struct BuildArgs {
    /// Description of the application to generate
    prompt: String,

    /// Directory to write the HTML file into (defaults to the current directory)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Open a sandboxed preview in the browser once built
    #[arg(long)]
    open: bool,
}

pub async fn execute(args: BuildArgs, ctx: &CliContext) -> Result<()> {
    let settings = ctx.store.load().context("Failed to load settings")?;
    let credential = ctx.credential(&settings).ok_or(CoreError::MissingCredential).context(
        "No API key configured. Run `forge config set-key <KEY>` or set GEMINI_API_KEY",
    )?;

    let config = settings.generation_config();
    info!("Building with model {}", config.model);
    let timeout = config.timeout();
    let mut session = SessionController::new(Arc::new(GeminiClient::new(config)), timeout);

    let outcome = drive_build(&mut session, &args.prompt, false, Some(&credential), ctx.quiet)
        .await?
        .ok_or(CliError::Cancelled)?;

    if let BuildOutcome::Failed { message, .. } = outcome {
        return Err(CliError::BuildFailed(message).into());
    }

    let out_dir = match args.out {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let path = session
        .export_to(&out_dir)
        .ok_or_else(|| anyhow::anyhow!("Failed to export application to {}", out_dir.display()))?;

    print_notifications(&session.take_notifications());
    println!("📄 Written to {}", path.display());

    if args.open {
        if let Some(artifact) = session.current() {
            let preview = open_preview(ctx.store.home(), &artifact.code, session.view())?;
            info!("Preview opened from {}", preview.display());
        }
    }

    Ok(())
}
