use crate::constants::defaults;
use crate::llm::traits::*;
use std::sync::Arc;
use std::time::Duration;

/// How long to wait between attempts. Swapped out in tests so the retry loop
/// runs without touching the clock.
#[async_trait::async_trait]
pub trait Delay: Send + Sync {
    async fn wait(&self, duration: Duration);
}

pub struct TokioDelay;

#[async_trait::async_trait]
impl Delay for TokioDelay {
    async fn wait(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// Delay before retry number `retry` (1-based): base, 2*base, 4*base, ...
    pub fn backoff(&self, retry: u32) -> Duration {
        let shift = retry.saturating_sub(1).min(16);
        self.base_delay.saturating_mul(1u32 << shift)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: defaults::RETRY_MAX_ATTEMPTS,
            base_delay: Duration::from_millis(defaults::RETRY_BASE_DELAY_MS),
        }
    }
}

/// Wraps a transport with bounded retry on transient overload.
pub struct GenerationClient {
    transport: Arc<dyn GenerationTransport>,
    policy: RetryPolicy,
    delay: Arc<dyn Delay>,
}

impl GenerationClient {
    pub fn new(transport: Arc<dyn GenerationTransport>) -> Self {
        Self {
            transport,
            policy: RetryPolicy::default(),
            delay: Arc::new(TokioDelay),
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_delay(mut self, delay: Arc<dyn Delay>) -> Self {
        self.delay = delay;
        self
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub async fn generate(
        &self,
        prompt: &str,
        api_key: &str,
        model: &str,
        max_output_tokens: u32,
    ) -> GenerationResult {
        let request = GenerationRequest::new(prompt, model, max_output_tokens);
        self.generate_request(&request, api_key).await
    }

    pub async fn generate_request(&self, request: &GenerationRequest, api_key: &str) -> GenerationResult {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            let result = self.transport.send(request, api_key).await;
            match result.failure_kind() {
                Some(FailureKind::TransientServiceError) if attempt < max_attempts => {
                    let backoff = self.policy.backoff(attempt);
                    tracing::warn!(
                        attempt,
                        max_attempts,
                        delay_ms = backoff.as_millis() as u64,
                        "generation service overloaded, retrying"
                    );
                    self.delay.wait(backoff).await;
                    attempt += 1;
                }
                Some(kind) => {
                    tracing::debug!(%kind, attempt, "generation failed");
                    return result;
                }
                None => return result,
            }
        }
    }
}
