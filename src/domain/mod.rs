//! Domain layer types for the mailsweep engine.
//!
//! This module contains the core types used throughout the pipeline: user
//! identities, the Gmail message payload tree, parsed sender metadata,
//! per-user statistics, and activity records.

mod activity;
mod message;
mod outcome;
mod sender;
mod stats;
mod types;

pub use activity::{Activity, ActivityKind, ACTIVITY_WINDOW};
pub use message::{Header, Message, MessagePart, PartBody};
pub use outcome::UnsubscribeOutcome;
pub use sender::{ExtractedContent, SenderMetadata};
pub use stats::{
    DomainSnapshot, DomainStat, StatsSnapshot, UserStats, MINUTES_SAVED_PER_UNSUBSCRIBE,
};
pub use types::UserId;
