//! Build-session controller.
//!
//! Owns the version ledger and drives the code generator. All mutation goes
//! through `&mut self`, so a session is only ever touched from one task at
//! a time; the `Building` state additionally guarantees a single
//! outstanding generation call.
//!
//! ```text
//!            begin_build
//!  Idle ───────────────────▶ Building ──ok──▶ Ready ◀──┐ undo / redo / go_to
//!   ▲                         │  ▲  └──err──▶ Failed   │
//!   │ reset                   │  └──────begin_build────┘
//!   └─────────────────────────┴── cancel_build (Ready if history, else Idle)
//! ```

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use forge_llm::{generate_code, CodeGenerator, Credential, GenerationError, GenerationRequest, GenerationResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{CoreError, CoreResult};
use crate::export::{copy_text, export_html, ClipboardSink};
use crate::ledger::{Artifact, Ledger};
use crate::log::BuildLog;
use crate::notification::Notification;
use crate::progress::ProgressSteps;
use crate::view::ViewState;

/// Lifecycle state of a build session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    /// No build yet
    #[default]
    Idle,
    /// One generation call outstanding
    Building,
    /// History has a current version, nothing outstanding
    Ready,
    /// Last call errored; history unchanged
    Failed,
}

/// Identifies one outstanding build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BuildTicket(u64);

impl BuildTicket {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Everything a host needs to run a build started by [`SessionController::begin_build`].
#[derive(Debug)]
pub struct BuildRequest {
    pub ticket: BuildTicket,
    pub request: GenerationRequest,
    /// Display steps for this build; consumed once.
    pub progress: ProgressSteps,
}

/// Result of a completed build.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildOutcome {
    /// A new version was appended and is now current.
    Succeeded { version: usize },
    /// History unchanged; `message` is what the session recorded.
    Failed {
        error: GenerationError,
        message: String,
    },
}

impl BuildOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }
}

#[derive(Debug)]
struct PendingBuild {
    ticket: BuildTicket,
    instruction: String,
    refinement: bool,
}

/// Render a generation error the way it is shown to the user.
///
/// `message`, then ` (Code: N)`, then `: <details JSON>` when the provider
/// sent a structured body.
pub fn format_build_error(error: &GenerationError) -> String {
    let mut message = format!("{} (Code: {})", error, error.code());
    if let Some(details) = error.details() {
        message.push_str(&format!(": {}", details));
    }
    message
}

/// Session state machine over a [`Ledger`].
pub struct SessionController {
    generator: Arc<dyn CodeGenerator>,
    timeout: Duration,
    ledger: Ledger,
    state: SessionState,
    last_error: Option<String>,
    log: BuildLog,
    view: ViewState,
    notifications: VecDeque<Notification>,
    pending: Option<PendingBuild>,
    next_ticket: u64,
}

impl SessionController {
    pub fn new(generator: Arc<dyn CodeGenerator>, timeout: Duration) -> Self {
        Self {
            generator,
            timeout,
            ledger: Ledger::new(),
            state: SessionState::default(),
            last_error: None,
            log: BuildLog::new(),
            view: ViewState::default(),
            notifications: VecDeque::new(),
            pending: None,
            next_ticket: 1,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_building(&self) -> bool {
        self.state == SessionState::Building
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn current(&self) -> Option<&Artifact> {
        self.ledger.current()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn log(&self) -> &BuildLog {
        &self.log
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ViewState {
        &mut self.view
    }

    pub fn version_label(&self) -> String {
        self.ledger.version_label()
    }

    pub fn generator(&self) -> Arc<dyn CodeGenerator> {
        Arc::clone(&self.generator)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Drain queued notifications, oldest first.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain(..).collect()
    }

    /// Start a build.
    ///
    /// With `refine` set and a current version, the request carries that
    /// version's code. Refused without any state change when a build is
    /// already outstanding, the instruction is blank, or no credential is
    /// configured.
    pub fn begin_build(
        &mut self,
        instruction: &str,
        refine: bool,
        credential: Option<&Credential>,
    ) -> CoreResult<BuildRequest> {
        if self.state == SessionState::Building {
            return Err(CoreError::invalid_state(self.state, "begin_build"));
        }
        let instruction = instruction.trim();
        if instruction.is_empty() {
            return Err(CoreError::Validation("Prompt cannot be empty.".to_string()));
        }
        let credential = credential.ok_or(CoreError::MissingCredential)?;

        let prior_code = if refine {
            self.ledger.current().map(|a| a.code.clone())
        } else {
            None
        };
        let refinement = prior_code.is_some();

        self.view
            .on_build_started(!refinement && self.ledger.is_empty());
        self.log.clear();
        if refinement {
            self.log.info(format!("Refining: \"{}\"...", instruction));
        } else {
            self.log.info(format!("Initializing build: \"{}\"...", instruction));
        }
        self.log.info("Connecting to generation service...");

        let ticket = BuildTicket(self.next_ticket);
        self.next_ticket += 1;

        self.last_error = None;
        self.state = SessionState::Building;
        self.pending = Some(PendingBuild {
            ticket,
            instruction: instruction.to_string(),
            refinement,
        });

        info!(ticket = ticket.id(), refinement, "Build started");

        let mut request = GenerationRequest::new(instruction).credential(credential.clone());
        request.prior_code = prior_code;

        Ok(BuildRequest {
            ticket,
            request,
            progress: ProgressSteps::new(),
        })
    }

    /// Record the result of the outstanding build.
    pub fn complete_build(
        &mut self,
        ticket: BuildTicket,
        outcome: GenerationResult<String>,
    ) -> CoreResult<BuildOutcome> {
        let pending = self.take_pending(ticket)?;

        match outcome {
            Ok(code) => {
                self.ledger.append(Artifact::new(code, pending.instruction));
                self.state = SessionState::Ready;
                self.log.success("Code synthesized successfully.");
                self.log.info("Injecting into secure sandbox...");
                self.view.on_build_succeeded();

                let message = if pending.refinement {
                    "Application updated successfully."
                } else {
                    "New application generated."
                };
                self.notifications
                    .push_back(Notification::success("Build Complete", message));

                let version = self.ledger.len();
                info!(ticket = ticket.id(), version, "Build succeeded");
                Ok(BuildOutcome::Succeeded { version })
            }
            Err(error) => {
                let message = format_build_error(&error);
                warn!(ticket = ticket.id(), kind = error.kind(), "Build failed: {}", message);

                self.log.error(format!("Build Process Failed: {}", message));
                self.last_error = Some(message.clone());
                self.state = SessionState::Failed;
                self.notifications
                    .push_back(Notification::error("Build Failed", message.clone()));

                Ok(BuildOutcome::Failed { error, message })
            }
        }
    }

    /// Begin a build, run it under the configured deadline, and record it.
    pub async fn submit(
        &mut self,
        instruction: &str,
        refine: bool,
        credential: Option<&Credential>,
    ) -> CoreResult<BuildOutcome> {
        let build = self.begin_build(instruction, refine, credential)?;
        let generator = self.generator();
        let outcome = generate_code(generator.as_ref(), &build.request, self.timeout).await;
        self.complete_build(build.ticket, outcome)
    }

    /// Abandon the outstanding build. A late completion for it is refused.
    pub fn cancel_build(&mut self, ticket: BuildTicket) -> CoreResult<()> {
        self.take_pending(ticket)?;
        self.state = if self.ledger.is_empty() {
            SessionState::Idle
        } else {
            SessionState::Ready
        };
        self.log.info("Build cancelled.");
        self.notifications
            .push_back(Notification::info("Cancelled", "Build cancelled."));
        info!(ticket = ticket.id(), "Build cancelled");
        Ok(())
    }

    /// Step back one version. `Ok(false)` at the oldest version.
    pub fn undo(&mut self) -> CoreResult<bool> {
        self.require_ready("undo")?;
        if !self.ledger.undo() {
            return Ok(false);
        }
        self.view.on_version_changed();
        self.log.info("Time travel: Reverted to previous version.");
        self.notifications
            .push_back(Notification::info("Time Travel", "Reverted to previous version."));
        Ok(true)
    }

    /// Step forward one version. `Ok(false)` at the newest version.
    pub fn redo(&mut self) -> CoreResult<bool> {
        self.require_ready("redo")?;
        if !self.ledger.redo() {
            return Ok(false);
        }
        self.view.on_version_changed();
        self.log.info("Time travel: Returned to newer version.");
        self.notifications
            .push_back(Notification::info("Time Travel", "Restored newer version."));
        Ok(true)
    }

    /// Jump to a version by zero-based index.
    pub fn go_to(&mut self, index: usize) -> CoreResult<()> {
        self.require_ready("go_to")?;
        if self.ledger.cursor() == Some(index) {
            return Ok(());
        }
        self.ledger.move_to(index)?;
        self.view.on_version_changed();
        self.log
            .info(format!("Time travel: Jumped to version {}.", index + 1));
        Ok(())
    }

    /// Discard history and log and return to `Idle`. Refused while building.
    pub fn reset(&mut self) -> CoreResult<()> {
        if self.state == SessionState::Building {
            return Err(CoreError::invalid_state(self.state, "reset"));
        }
        self.ledger.clear();
        self.log.clear();
        self.last_error = None;
        self.view = ViewState::default();
        self.notifications.clear();
        self.state = SessionState::Idle;
        debug!("Session reset");
        Ok(())
    }

    /// Remove error entries from the log (the error banner's dismiss).
    pub fn dismiss_errors(&mut self) {
        self.log.clear_errors();
    }

    /// Write the current version to `dir`. Best-effort: failures are
    /// logged and notified, never returned.
    pub fn export_to(&mut self, dir: impl AsRef<Path>) -> Option<PathBuf> {
        let artifact = self.ledger.current()?.clone();
        match export_html(&artifact, dir) {
            Ok(path) => {
                self.log.success("Application exported to disk.");
                self.notifications
                    .push_back(Notification::success("Exported", "HTML file saved."));
                Some(path)
            }
            Err(e) => {
                warn!("Export failed: {}", e);
                self.log.error(format!("Export failed: {}", e));
                self.notifications
                    .push_back(Notification::error("Error", "Failed to export file."));
                None
            }
        }
    }

    /// Copy the current version's code. Best-effort, like [`Self::export_to`].
    pub fn copy_code(&mut self, clipboard: &mut dyn ClipboardSink) -> bool {
        let Some(artifact) = self.ledger.current() else {
            return false;
        };
        match copy_text(clipboard, &artifact.code) {
            Ok(()) => {
                self.log.success("Source code copied to clipboard.");
                self.notifications
                    .push_back(Notification::success("Copied", "Source code copied to clipboard."));
                true
            }
            Err(e) => {
                warn!("Clipboard copy failed: {}", e);
                self.log.error("Failed to copy to clipboard.");
                self.notifications
                    .push_back(Notification::error("Error", "Failed to copy code."));
                false
            }
        }
    }

    fn require_ready(&self, operation: &str) -> CoreResult<()> {
        if self.state == SessionState::Ready {
            Ok(())
        } else {
            Err(CoreError::invalid_state(self.state, operation))
        }
    }

    fn take_pending(&mut self, ticket: BuildTicket) -> CoreResult<PendingBuild> {
        match self.pending.take() {
            Some(p) if p.ticket == ticket => Ok(p),
            other => {
                self.pending = other;
                Err(CoreError::StaleBuild(ticket.id()))
            }
        }
    }
}
