//! Scripted code generator for tests.
//!
//! Returns predefined responses in order and records every request, so
//! callers can be exercised without reaching the network.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::{GenerationError, GenerationResult};
use crate::generator::{CodeGenerator, GenerationRequest};

/// A scripted outcome for one call.
#[derive(Debug, Clone)]
pub enum MockResponse {
    Text(String),
    Error(GenerationError),
    /// The call never completes.
    Pending,
}

/// Captured call information for verification.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub instruction: String,
    pub prior_code: Option<String>,
    pub prompt: String,
}

/// Mock generator. Clones share their script and captured calls.
#[derive(Clone, Default)]
pub struct MockGenerator {
    responses: Arc<RwLock<VecDeque<MockResponse>>>,
    /// Served once the script runs out.
    fallback: Arc<RwLock<Option<MockResponse>>>,
    captured: Arc<RwLock<Vec<CapturedRequest>>>,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful raw response.
    pub fn respond(self, text: impl Into<String>) -> Self {
        self.responses
            .write()
            .push_back(MockResponse::Text(text.into()));
        self
    }

    /// Queue a failure.
    pub fn fail(self, error: GenerationError) -> Self {
        self.responses.write().push_back(MockResponse::Error(error));
        self
    }

    /// Every call hangs forever.
    pub fn never_resolve(self) -> Self {
        *self.fallback.write() = Some(MockResponse::Pending);
        self
    }

    /// Response used after the queued ones are consumed.
    pub fn otherwise(self, response: MockResponse) -> Self {
        *self.fallback.write() = Some(response);
        self
    }

    pub fn call_count(&self) -> usize {
        self.captured.read().len()
    }

    pub fn captured(&self) -> Vec<CapturedRequest> {
        self.captured.read().clone()
    }

    pub fn last_request(&self) -> Option<CapturedRequest> {
        self.captured.read().last().cloned()
    }

    fn next_response(&self) -> MockResponse {
        if let Some(next) = self.responses.write().pop_front() {
            return next;
        }
        self.fallback.read().clone().unwrap_or_else(|| {
            MockResponse::Error(GenerationError::Service(
                "mock generator has no scripted response".to_string(),
            ))
        })
    }
}

#[async_trait]
impl CodeGenerator for MockGenerator {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, request: &GenerationRequest) -> GenerationResult<String> {
        self.captured.write().push(CapturedRequest {
            instruction: request.instruction.clone(),
            prior_code: request.prior_code.clone(),
            prompt: request.prompt(),
        });

        match self.next_response() {
            MockResponse::Text(text) => Ok(text),
            MockResponse::Error(err) => Err(err),
            MockResponse::Pending => std::future::pending().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_sequence() {
        let mock = MockGenerator::new().respond("one").fail(GenerationError::Service("two".into()));
        let request = GenerationRequest::new("x");

        assert_eq!(mock.generate(&request).await.unwrap(), "one");
        assert!(mock.generate(&request).await.is_err());
        // script exhausted, no fallback
        assert!(mock.generate(&request).await.is_err());
        assert_eq!(mock.call_count(), 3);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let mock = MockGenerator::new().otherwise(MockResponse::Text("same".into()));
        let clone = mock.clone();

        clone
            .generate(&GenerationRequest::new("a").prior_code("<html></html>"))
            .await
            .unwrap();

        let last = mock.last_request().unwrap();
        assert_eq!(last.instruction, "a");
        assert_eq!(last.prior_code.as_deref(), Some("<html></html>"));
        assert!(last.prompt.contains("EXISTING CODE"));
    }
}
