//! Studio command - Interactive build session.
//!
//! Plain input is a build instruction: the first one generates a fresh
//! application and later ones refine the current version. Lines starting
//! with `:` are session commands.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{info, warn};

use forge_core::{CoreError, Device, LogKind, SessionController, SessionState, Tab};
use forge_llm::{Credential, GeminiClient};

use crate::clipboard::SystemClipboard;

use super::{drive_build, open_preview, print_notifications, CliContext};

const HELP: &str = r#"
  <text>          build, or refine the current version
  :undo / :redo   step through versions
  :goto N         jump to version N (1-based)
  :history        list versions
  :logs           show the build log
  :code           print the current source
  :preview        open a sandboxed preview in the browser
  :device NAME    preview as mobile or desktop
  :rotate         toggle portrait/landscape (mobile only)
  :export [DIR]   write the current version to an .html file
  :copy           copy the current source to the clipboard
  :dismiss        clear the error banner and error log lines
  :reset          start over (asks for confirmation)
  :help           this text
  :quit           leave the studio (Ctrl-D also works)
  Ctrl-C while building cancels the build; once a build has run,
  Ctrl-C at the prompt no longer exits, use :quit.
"#;

#[derive(Args)]
pub struct StudioArgs {
    /// Initial instruction to build right away
    prompt: Option<String>,
}

/// One line of studio input.
#[derive(Debug, Clone, PartialEq, Eq)]
enum StudioCommand {
    Build(String),
    Undo,
    Redo,
    GoTo(usize),
    History,
    Logs,
    Code,
    Preview,
    Device(Device),
    Rotate,
    Export(Option<PathBuf>),
    Copy,
    Dismiss,
    Reset,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

impl StudioCommand {
    fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Self::Empty;
        }
        let Some(rest) = line.strip_prefix(':') else {
            return Self::Build(line.to_string());
        };

        let mut parts = rest.splitn(2, char::is_whitespace);
        let name = parts.next().unwrap_or_default().to_lowercase();
        let arg = parts.next().map(str::trim).filter(|a| !a.is_empty());

        match (name.as_str(), arg) {
            ("undo" | "u", None) => Self::Undo,
            ("redo" | "r", None) => Self::Redo,
            ("goto" | "g", Some(n)) => match n.parse::<usize>() {
                Ok(n) if n > 0 => Self::GoTo(n - 1),
                _ => Self::Unknown(line.to_string()),
            },
            ("history" | "h", None) => Self::History,
            ("logs" | "log", None) => Self::Logs,
            ("code", None) => Self::Code,
            ("preview" | "p", None) => Self::Preview,
            ("device", Some(d)) => match d.parse::<Device>() {
                Ok(device) => Self::Device(device),
                Err(_) => Self::Unknown(line.to_string()),
            },
            ("rotate", None) => Self::Rotate,
            ("export", dir) => Self::Export(dir.map(PathBuf::from)),
            ("copy", None) => Self::Copy,
            ("dismiss", None) => Self::Dismiss,
            ("reset", None) => Self::Reset,
            ("help" | "?", None) => Self::Help,
            ("quit" | "q" | "exit", None) => Self::Quit,
            _ => Self::Unknown(line.to_string()),
        }
    }
}

pub async fn execute(args: StudioArgs, ctx: &CliContext) -> Result<()> {
    let settings = ctx.store.load().context("Failed to load settings")?;
    let Some(credential) = ctx.credential(&settings) else {
        return Err(anyhow::Error::new(CoreError::MissingCredential).context(
            "No API key configured. Run `forge config set-key <KEY>` or set GEMINI_API_KEY",
        ));
    };

    let config = settings.generation_config();
    info!("Studio using model {}", config.model);
    let timeout = config.timeout();
    let mut session = SessionController::new(Arc::new(GeminiClient::new(config)), timeout);

    println!("🔨 Forge studio. Describe an app to build, or :help for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    if let Some(prompt) = args.prompt {
        run_build(&mut session, &prompt, &credential, ctx).await?;
        print_notifications(&session.take_notifications());
    }

    loop {
        print!("forge [{} {}]> ", session.version_label(), state_label(session.state()));
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match StudioCommand::parse(&line) {
            StudioCommand::Empty => {}
            StudioCommand::Build(instruction) => {
                run_build(&mut session, &instruction, &credential, ctx).await?;
            }
            StudioCommand::Undo => report(session.undo().map(|_| ())),
            StudioCommand::Redo => report(session.redo().map(|_| ())),
            StudioCommand::GoTo(index) => report(session.go_to(index)),
            StudioCommand::History => print_history(&session),
            StudioCommand::Logs => {
                session.view_mut().tab = Tab::Logs;
                print_logs(&session);
            }
            StudioCommand::Code => {
                session.view_mut().tab = Tab::Code;
                match session.current() {
                    Some(artifact) => println!("{}", artifact.code),
                    None => println!("Nothing built yet."),
                }
            }
            StudioCommand::Preview => {
                session.view_mut().tab = Tab::Preview;
                match session.current() {
                    Some(artifact) => {
                        match open_preview(ctx.store.home(), &artifact.code, session.view()) {
                            Ok(path) => println!("🌐 Preview: {}", path.display()),
                            Err(e) => warn!("{:#}", e),
                        }
                    }
                    None => println!("Nothing built yet."),
                }
            }
            StudioCommand::Device(device) => {
                session.view_mut().device = device;
                println!("Preview device: {:?}", device);
            }
            StudioCommand::Rotate => {
                let view = session.view_mut();
                if view.device == Device::Mobile {
                    view.rotate();
                    println!("Orientation: {:?}", view.orientation);
                } else {
                    println!("Rotation only applies to the mobile preview.");
                }
            }
            StudioCommand::Export(dir) => {
                let dir = match dir {
                    Some(dir) => dir,
                    None => std::env::current_dir()?,
                };
                if let Some(path) = session.export_to(&dir) {
                    println!("📄 Written to {}", path.display());
                }
            }
            StudioCommand::Copy => {
                session.copy_code(&mut SystemClipboard);
            }
            StudioCommand::Dismiss => session.dismiss_errors(),
            StudioCommand::Reset => {
                if session.ledger().is_empty() && session.state() == SessionState::Idle {
                    println!("Nothing to reset.");
                } else if confirm(&mut lines).await? {
                    report(session.reset());
                }
            }
            StudioCommand::Help => println!("{}", HELP),
            StudioCommand::Quit => break,
            StudioCommand::Unknown(input) => {
                println!("Unknown command: {} (try :help)", input);
            }
        }

        print_notifications(&session.take_notifications());
        if session.log().has_errors() {
            println!("⚠️  BUILD ERROR: check :logs for details, :dismiss to hide");
        }
    }

    Ok(())
}

async fn run_build(
    session: &mut SessionController,
    instruction: &str,
    credential: &Credential,
    ctx: &CliContext,
) -> Result<()> {
    let refine = session.current().is_some();
    match drive_build(session, instruction, refine, Some(credential), ctx.quiet).await {
        Ok(_) => Ok(()),
        Err(e @ (CoreError::Validation(_) | CoreError::InvalidState { .. })) => {
            println!("⚠️  {}", e);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

async fn confirm(lines: &mut Lines<BufReader<Stdin>>) -> Result<bool> {
    print!("Going back will clear your current generated code and history. Continue? [y/N] ");
    std::io::stdout().flush()?;
    let answer = lines.next_line().await?.unwrap_or_default();
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn report(result: Result<(), CoreError>) {
    if let Err(e) = result {
        println!("⚠️  {}", e);
    }
}

fn state_label(state: SessionState) -> &'static str {
    match state {
        SessionState::Idle => "IDLE",
        SessionState::Building => "BUILDING",
        SessionState::Ready => "READY",
        SessionState::Failed => "FAILED",
    }
}

fn print_history(session: &SessionController) {
    let cursor = session.ledger().cursor();
    if session.ledger().is_empty() {
        println!("No versions yet.");
        return;
    }
    for (i, artifact) in session.ledger().entries().iter().enumerate() {
        let marker = if Some(i) == cursor { "▶" } else { " " };
        println!(
            "{} v{}  {}  {}",
            marker,
            i + 1,
            artifact.created_at.format("%H:%M:%S"),
            artifact.prompt
        );
    }
}

fn print_logs(session: &SessionController) {
    for entry in session.log().entries() {
        let tag = match entry.kind {
            LogKind::Info => "INFO",
            LogKind::Success => " OK ",
            LogKind::Error => "FAIL",
        };
        println!("[{}] {} {}", entry.time_label(), tag, entry.text);
    }
}
