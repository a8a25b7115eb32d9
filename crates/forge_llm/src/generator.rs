//! Code generator trait and the single entry point used to call it.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::credential::Credential;
use crate::error::{GenerationError, GenerationResult};
use crate::prompt::format_prompt;
use crate::response::clean_html;

/// Everything needed for one generation call.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// User instruction, as typed
    pub instruction: String,
    /// Current document when refining
    pub prior_code: Option<String>,
    /// Credential threaded in by the caller
    pub credential: Option<Credential>,
}

impl GenerationRequest {
    pub fn new(instruction: impl Into<String>) -> Self {
        Self {
            instruction: instruction.into(),
            prior_code: None,
            credential: None,
        }
    }

    pub fn prior_code(mut self, code: impl Into<String>) -> Self {
        self.prior_code = Some(code.into());
        self
    }

    pub fn credential(mut self, credential: Credential) -> Self {
        self.credential = Some(credential);
        self
    }

    pub fn is_refinement(&self) -> bool {
        self.prior_code.is_some()
    }

    /// Full prompt text for this request.
    pub fn prompt(&self) -> String {
        format_prompt(self.instruction.trim(), self.prior_code.as_deref())
    }

    /// Check preconditions. Nothing touches the network before this passes.
    pub fn validate(&self) -> GenerationResult<&Credential> {
        let credential = self
            .credential
            .as_ref()
            .ok_or_else(GenerationError::missing_credential)?;
        if self.instruction.trim().is_empty() {
            return Err(GenerationError::empty_instruction());
        }
        credential.check_shape()?;
        Ok(credential)
    }
}

/// A backend able to turn a prompt into raw model text.
///
/// Implementations perform exactly one attempt; they do not retry and
/// do not post-process. Callers should go through [`generate_code`].
#[async_trait]
pub trait CodeGenerator: Send + Sync {
    /// Human-readable backend name, used in logs.
    fn name(&self) -> &str;

    /// Send the request and return the raw text of the first candidate.
    async fn generate(&self, request: &GenerationRequest) -> GenerationResult<String>;
}

/// Validate, call the generator under a deadline, and clean the output.
pub async fn generate_code(
    generator: &dyn CodeGenerator,
    request: &GenerationRequest,
    timeout: Duration,
) -> GenerationResult<String> {
    request.validate()?;

    info!(
        backend = generator.name(),
        refinement = request.is_refinement(),
        "Sending generation request"
    );

    let raw = match tokio::time::timeout(timeout, generator.generate(request)).await {
        Ok(result) => result?,
        Err(_) => {
            warn!(backend = generator.name(), ?timeout, "Generation request timed out");
            return Err(GenerationError::timeout(timeout));
        }
    };

    let code = clean_html(&raw)?;
    debug!(bytes = code.len(), "Generation completed");
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockGenerator;

    const DOC: &str = "<html><head></head><body>ok</body></html>";

    fn key() -> Credential {
        Credential::new("AIzaSyTestKey0000").unwrap()
    }

    #[test]
    fn test_validation_order() {
        let err = GenerationRequest::new("").validate().unwrap_err();
        assert!(matches!(err, GenerationError::Configuration { code: 400, .. }));

        let err = GenerationRequest::new("   ")
            .credential(key())
            .validate()
            .unwrap_err();
        assert!(matches!(err, GenerationError::Validation(_)));

        let bad = Credential::new("not-a-key").unwrap();
        let err = GenerationRequest::new("app")
            .credential(bad)
            .validate()
            .unwrap_err();
        assert!(matches!(err, GenerationError::Configuration { code: 401, .. }));
    }

    #[tokio::test]
    async fn test_preconditions_skip_generator() {
        let generator = MockGenerator::new().respond(DOC);
        let request = GenerationRequest::new("  ").credential(key());

        let err = generate_code(&generator, &request, Duration::from_secs(30))
            .await
            .unwrap_err();

        assert!(matches!(err, GenerationError::Validation(_)));
        assert_eq!(generator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_fenced_output_accepted() {
        let generator = MockGenerator::new().respond(format!("```html\n{}\n```", DOC));
        let request = GenerationRequest::new("a counter app").credential(key());

        let code = generate_code(&generator, &request, Duration::from_secs(30))
            .await
            .unwrap();

        assert_eq!(code, DOC);
        assert_eq!(generator.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_maps_to_timeout() {
        let generator = MockGenerator::new().never_resolve();
        let request = GenerationRequest::new("a counter app").credential(key());

        let err = generate_code(&generator, &request, Duration::from_secs(30))
            .await
            .unwrap_err();

        assert_eq!(err, GenerationError::Timeout { seconds: 30 });
    }

    #[tokio::test(start_paused = true)]
    async fn test_sub_second_deadline_reported_as_one_second() {
        let generator = MockGenerator::new().never_resolve();
        let request = GenerationRequest::new("a counter app").credential(key());

        let err = generate_code(&generator, &request, Duration::from_millis(500))
            .await
            .unwrap_err();

        assert_eq!(err, GenerationError::Timeout { seconds: 1 });
    }

    #[tokio::test]
    async fn test_generator_errors_propagate_unchanged() {
        let generator = MockGenerator::new().fail(GenerationError::Http {
            status: 403,
            message: "forbidden".to_string(),
            details: None,
        });
        let request = GenerationRequest::new("x").credential(key());

        let err = generate_code(&generator, &request, Duration::from_secs(30))
            .await
            .unwrap_err();

        assert_eq!(err.code(), 403);
        assert_eq!(generator.call_count(), 1);
    }
}
