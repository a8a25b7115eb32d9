//! # forge_llm
//!
//! Turns a natural-language description into a single self-contained
//! HTML document using a hosted language model.
//!
//! # Components
//!
//! - **Prompt**: builds the instruction payload for fresh builds and refinements
//! - **Generator**: the [`CodeGenerator`] seam plus [`generate_code`], which
//!   applies preconditions, the deadline and output cleaning
//! - **Gemini**: the production HTTP backend
//! - **Mock**: scripted backend for tests
//!
//! # Example
//!
//! ```rust,no_run
//! use forge_llm::{generate_code, Credential, GeminiClient, GenerationConfig, GenerationRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = GenerationConfig::default();
//!     let client = GeminiClient::new(config.clone());
//!
//!     let mut request = GenerationRequest::new("a pomodoro timer");
//!     request.credential = Credential::new(std::env::var("GEMINI_API_KEY")?);
//!
//!     let html = generate_code(&client, &request, config.timeout()).await?;
//!     println!("{}", html);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod credential;
pub mod error;
pub mod gemini;
pub mod generator;
pub mod mock;
pub mod prompt;
pub mod response;

pub use config::{GenerationConfig, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};
pub use credential::Credential;
pub use error::{GenerationError, GenerationResult};
pub use gemini::GeminiClient;
pub use generator::{generate_code, CodeGenerator, GenerationRequest};
pub use mock::{CapturedRequest, MockGenerator, MockResponse};
pub use prompt::format_prompt;
pub use response::{clean_html, strip_fences};
