//! Pipeline services.
//!
//! The stages of the unsubscription pipeline, leaf to root:
//!
//! - [`extractor`]: body content and sender metadata out of a message
//! - [`LinkLocator`]: unsubscribe candidates out of body content
//! - [`Unsubscriber`]: the side-effecting unsubscribe attempt
//! - [`BatchRunner`]: the orchestrator driving a full run for one user
//!
//! The first two stages are pure and total; the executor never fails
//! (failure is a `false` return); the orchestrator contains all per-message
//! failures and only propagates systemic ones.

mod batch;
pub mod extractor;
mod locator;
mod unsubscriber;

pub use batch::{
    BatchConfig, BatchError, BatchRunner, BatchSummary, DEFAULT_PROCESSED_LABEL,
    DEFAULT_SEARCH_QUERY,
};
pub use extractor::extract;
pub use locator::LinkLocator;
pub use unsubscriber::{HttpUnsubscriber, Unsubscriber, DEFAULT_REQUEST_TIMEOUT};
