//! # forge_core
//!
//! Build-session engine for Forge.
//!
//! A session turns natural-language instructions into a history of
//! generated HTML documents. Each successful build appends a version;
//! undo/redo move through versions; building from an older version
//! discards the newer ones.
//!
//! # Architecture
//!
//! - **Ledger**: cursor-addressed version history with branch-on-write
//! - **Session**: the `Idle → Building → Ready/Failed` state machine that
//!   drives a [`forge_llm::CodeGenerator`]
//! - **Log / Notifications / Progress**: what the presentation layer shows
//! - **View**: tab and device-emulation state reconciled with builds
//! - **Export / Preview**: file export, clipboard, sandboxed preview page
//! - **Settings**: the locally stored credential and model overrides
//!
//! # Example
//!
//! ```rust,ignore
//! let generator = Arc::new(GeminiClient::new(config.clone()));
//! let mut session = SessionController::new(generator, config.timeout());
//!
//! session.submit("a counter app", false, credential.as_ref()).await?;
//! session.submit("add a reset button", true, credential.as_ref()).await?;
//! session.undo()?;
//! ```

pub mod error;
pub mod export;
pub mod ledger;
pub mod log;
pub mod notification;
pub mod preview;
pub mod progress;
pub mod session;
pub mod settings;
pub mod view;

pub use error::{ClipboardError, CoreError, CoreResult};
pub use export::{copy_text, export_html, ClipboardSink, MemoryClipboard, EXPORT_MIME};
pub use ledger::{Artifact, Ledger};
pub use log::{BuildLog, LogEntry, LogKind};
pub use notification::{Notification, NotificationKind};
pub use preview::{render_host_page, SANDBOX_PERMISSIONS};
pub use progress::{ProgressEvent, ProgressSteps};
pub use session::{
    format_build_error, BuildOutcome, BuildRequest, BuildTicket, SessionController, SessionState,
};
pub use settings::{Settings, SettingsStore};
pub use view::{Device, Orientation, Tab, ViewState};
