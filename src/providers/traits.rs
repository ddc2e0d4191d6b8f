//! Mailbox provider trait definition.
//!
//! [`Mailbox`] abstracts the remote mailbox operations the batch pipeline
//! needs: free-text search, full message retrieval, and label management.
//! The Gmail REST implementation lives in [`super::gmail`]; tests drive the
//! orchestrator with in-memory stubs.

use async_trait::async_trait;

use crate::domain::Message;

/// Result type alias for mailbox operations.
pub type Result<T> = std::result::Result<T, MailboxError>;

/// Errors that can occur during mailbox operations.
#[derive(Debug, thiserror::Error)]
pub enum MailboxError {
    /// Authentication failed or credentials expired.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Network or connection error.
    #[error("connection error: {0}")]
    Connection(String),

    /// Rate limit exceeded.
    #[error("rate limit exceeded, retry after {retry_after_secs:?} seconds")]
    RateLimited {
        /// Seconds to wait before retrying, if known.
        retry_after_secs: Option<u64>,
    },

    /// Requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Invalid request or parameters.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl MailboxError {
    /// Whether this error invalidates the rest of a batch run.
    ///
    /// Authentication-class errors are systemic: retrying the next message
    /// with the same credentials cannot succeed.
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication(_))
    }
}

/// A label defined in the remote mailbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailboxLabel {
    /// Provider-assigned label identifier.
    pub id: String,
    /// Display name of the label.
    pub name: String,
}

/// Trait for remote mailbox implementations.
///
/// All methods are async and return [`Result`]. Implementations are
/// expected to be cheap to call repeatedly; the orchestrator provides its
/// own rate limiting between messages.
#[async_trait]
pub trait Mailbox: Send + Sync {
    /// Authenticates with the mailbox provider, refreshing tokens if
    /// needed.
    ///
    /// # Errors
    ///
    /// Returns [`MailboxError::Authentication`] if credentials are invalid
    /// or expired without a refresh path.
    async fn authenticate(&mut self) -> Result<()>;

    /// Searches the mailbox and returns up to `max_results` message
    /// identifiers, in provider result order.
    ///
    /// `query` uses the provider's free-text/boolean search syntax. An
    /// empty result set is `Ok(vec![])`, not an error.
    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<String>>;

    /// Fetches one message with its full header list and MIME tree.
    async fn get_message(&self, id: &str) -> Result<Message>;

    /// Lists all labels defined in the mailbox.
    async fn list_labels(&self) -> Result<Vec<MailboxLabel>>;

    /// Creates a user label and returns it.
    async fn create_label(&self, name: &str) -> Result<MailboxLabel>;

    /// Adds and removes labels on one message.
    async fn modify_labels(&self, message_id: &str, add: &[String], remove: &[String])
        -> Result<()>;
}
