//! mailsweep - bulk subscription-email discovery and automated
//! unsubscription for Gmail
//!
//! This crate provides the email-processing pipeline: mailbox search,
//! content and sender-metadata extraction from nested MIME structures,
//! unsubscribe-link location, rate-limited unsubscription attempts, and
//! per-user/per-domain result aggregation with durable incremental
//! progress.

pub mod config;
pub mod domain;
pub mod providers;
pub mod services;
pub mod storage;

pub use services::{BatchConfig, BatchError, BatchRunner, BatchSummary};
