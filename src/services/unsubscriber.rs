//! Unsubscription execution.
//!
//! Performs the actual side-effecting unsubscribe request. The trait seam
//! exists so the batch orchestrator can be driven by a stub in tests; the
//! production implementation issues a single HTTP GET per candidate.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;

/// Browser User-Agent sent with unsubscribe requests. Many list-management
/// endpoints reject obvious bot traffic.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Attempts unsubscribe actions against candidate URLs.
#[async_trait]
pub trait Unsubscriber: Send + Sync {
    /// Attempts a single unsubscribe action against `url`.
    ///
    /// Returns `true` only when the endpoint treated the request as a
    /// completed unsubscribe. Never fails: transport errors are logged and
    /// reported as `false`. No retry happens here — the caller moves on to
    /// the next candidate link instead of retrying the same one.
    async fn attempt(&self, url: &str) -> bool;
}

/// HTTP GET unsubscriber.
///
/// Success is strictly an HTTP 200 response after redirects; any other
/// status, timeout, DNS failure, or connection error counts as failure.
pub struct HttpUnsubscriber {
    client: reqwest::Client,
}

impl HttpUnsubscriber {
    /// Creates an unsubscriber with the given per-request timeout.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(BROWSER_USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Unsubscriber for HttpUnsubscriber {
    async fn attempt(&self, url: &str) -> bool {
        tracing::info!(%url, "attempting unsubscribe");

        match self.client.get(url).send().await {
            Ok(response) if response.status() == StatusCode::OK => {
                tracing::info!(%url, "unsubscribe request accepted");
                true
            }
            Ok(response) => {
                tracing::warn!(%url, status = %response.status(), "unsubscribe request rejected");
                false
            }
            Err(err) => {
                tracing::warn!(%url, error = %err, "unsubscribe request failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_with_default_timeout() {
        assert!(HttpUnsubscriber::new(DEFAULT_REQUEST_TIMEOUT).is_ok());
    }

    #[tokio::test]
    async fn invalid_url_reports_failure_without_panicking() {
        let unsubscriber = HttpUnsubscriber::new(DEFAULT_REQUEST_TIMEOUT).unwrap();
        assert!(!unsubscriber.attempt("not a url").await);
    }
}
