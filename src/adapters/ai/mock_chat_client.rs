//! Mock Chat Client for testing.
//!
//! Provides a configurable implementation of the ChatClient port so tests
//! can drive the conversation without calling a real model.
//!
//! # Features
//!
//! - Pre-configured responses, consumed in order
//! - Per-response simulated latency
//! - Error injection for recovery testing
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let client = MockChatClient::new()
//!     .with_response("What troubles you?")
//!     .with_error(GenerationError::unavailable("down"));
//!
//! let reply = client.generate(request).await?;
//! assert_eq!(reply, "What troubles you?");
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{ChatClient, GenerationError, GenerationRequest};

/// Reply used once the configured queue is exhausted.
pub const DEFAULT_MOCK_REPLY: &str = "Mock response";

/// A configured mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return text after an optional delay.
    Success { content: String, delay: Duration },
    /// Fail after an optional delay.
    Error {
        error: GenerationError,
        delay: Duration,
    },
}

/// Mock chat client for testing.
#[derive(Debug, Clone, Default)]
pub struct MockChatClient {
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    calls: Arc<Mutex<Vec<GenerationRequest>>>,
}

impl MockChatClient {
    /// Creates a mock with an empty response queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful response.
    pub fn with_response(self, content: impl Into<String>) -> Self {
        self.with_delayed_response(content, Duration::ZERO)
    }

    /// Queues a successful response that arrives after `delay`.
    pub fn with_delayed_response(self, content: impl Into<String>, delay: Duration) -> Self {
        lock(&self.responses).push_back(MockResponse::Success {
            content: content.into(),
            delay,
        });
        self
    }

    /// Queues a failure.
    pub fn with_error(self, error: GenerationError) -> Self {
        self.with_delayed_error(error, Duration::ZERO)
    }

    /// Queues a failure that arrives after `delay`.
    pub fn with_delayed_error(self, error: GenerationError, delay: Duration) -> Self {
        lock(&self.responses).push_back(MockResponse::Error { error, delay });
        self
    }

    /// Returns the number of calls made to this client.
    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Returns all recorded requests.
    pub fn get_calls(&self) -> Vec<GenerationRequest> {
        lock(&self.calls).clone()
    }

    fn next_response(&self) -> MockResponse {
        lock(&self.responses)
            .pop_front()
            .unwrap_or_else(|| MockResponse::Success {
                content: DEFAULT_MOCK_REPLY.to_string(),
                delay: Duration::ZERO,
            })
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl ChatClient for MockChatClient {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        lock(&self.calls).push(request);

        // Taken before sleeping so queue order matches call order.
        let response = self.next_response();

        match response {
            MockResponse::Success { content, delay } => {
                if !delay.is_zero() {
                    sleep(delay).await;
                }
                if content.trim().is_empty() {
                    return Err(GenerationError::EmptyResponse);
                }
                Ok(content)
            }
            MockResponse::Error { error, delay } => {
                if !delay.is_zero() {
                    sleep(delay).await;
                }
                Err(error)
            }
        }
    }
}
