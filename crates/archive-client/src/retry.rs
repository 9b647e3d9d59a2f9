//! Backoff for the catalog listing.
//!
//! The listing is idempotent and fetched once per mount, so connection
//! failures and timeouts are retried a few times with doubling delays. Any
//! HTTP response ends the loop, whatever its status. Access checks never
//! come through here.

use std::future::Future;
use std::time::Duration;

/// How often and how patiently a transport failure is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RetryPolicy {
    /// Attempts after the first one.
    pub(crate) retries: u32,
    /// Delay before the first retry; doubled for each further one.
    pub(crate) base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 3,
            base_delay: Duration::from_millis(200),
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `retry` (zero-based).
    pub(crate) fn delay_before(&self, retry: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(retry))
    }

    /// Run `attempt` until it yields a response or the retries run out.
    pub(crate) async fn send<F, Fut>(
        &self,
        endpoint: &str,
        mut attempt: F,
    ) -> Result<reqwest::Response, reqwest::Error>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<reqwest::Response, reqwest::Error>>,
    {
        let mut retry = 0;
        loop {
            match attempt().await {
                Ok(resp) => return Ok(resp),
                Err(err) if retry < self.retries => {
                    let delay = self.delay_before(retry);
                    retry += 1;
                    tracing::warn!(
                        endpoint,
                        retry,
                        max_retries = self.retries,
                        ?delay,
                        error = %err,
                        "archive request failed in transport, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn delays_double_from_base() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_before(0), Duration::from_millis(200));
        assert_eq!(policy.delay_before(1), Duration::from_millis(400));
        assert_eq!(policy.delay_before(2), Duration::from_millis(800));
        // The multiplier saturates instead of overflowing.
        assert_eq!(policy.delay_before(40), policy.delay_before(64));
    }

    #[tokio::test]
    async fn gives_up_after_configured_retries() {
        let policy = RetryPolicy {
            retries: 2,
            base_delay: Duration::ZERO,
        };
        let attempts = AtomicU32::new(0);
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(50))
            .build()
            .unwrap();

        let result = policy
            .send("GET /closed", || {
                attempts.fetch_add(1, Ordering::SeqCst);
                // Nothing listens on port 1.
                http.get("http://127.0.0.1:1/").send()
            })
            .await;

        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }
}
