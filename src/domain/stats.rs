//! Per-user unsubscription statistics.
//!
//! [`UserStats`] is the durable aggregate mutated additively by batch runs.
//! The mutators are total functions: they never fail, and callers invoke
//! [`UserStats::record_unsubscribe`] at most once per genuinely new
//! unsubscribe event (counts are not idempotent, the per-domain email set
//! is).

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use super::SenderMetadata;

/// Minutes of future mailbox triage credited per successful unsubscription.
pub const MINUTES_SAVED_PER_UNSUBSCRIBE: u32 = 2;

/// Accumulated per-domain unsubscribe data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainStat {
    /// Number of successful unsubscribe events attributed to this domain.
    pub count: u32,
    /// Display name of the first sender seen for this domain.
    pub sender_name: String,
    /// Distinct sender addresses seen for this domain.
    ///
    /// A `BTreeSet` so repeated senders collapse and iteration order is
    /// stable; external surfaces only ever see the sorted list form via
    /// [`DomainSnapshot`].
    pub emails: BTreeSet<String>,
}

/// Durable statistics for one user identity.
///
/// Created on first authentication, mutated additively by every batch run,
/// never reset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    /// Messages whose payload was retrieved and fed through the pipeline.
    pub total_scanned: u32,
    /// Successful unsubscribe events.
    pub total_unsubscribed: u32,
    /// Always `total_unsubscribed * MINUTES_SAVED_PER_UNSUBSCRIBE`.
    pub time_saved_minutes: u32,
    /// Per-domain groupings of successful unsubscribes.
    pub domains_unsubscribed: HashMap<String, DomainStat>,
}

impl UserStats {
    /// Records one scanned message.
    pub fn record_scan(&mut self) {
        self.total_scanned = self.total_scanned.saturating_add(1);
    }

    /// Records one successful unsubscribe event attributed to the sender in
    /// `metadata`.
    ///
    /// Increments `total_unsubscribed` and the domain count on every call;
    /// the domain's email set deduplicates repeated sender addresses. Must
    /// follow the `record_scan` for the same message so
    /// `total_unsubscribed <= total_scanned` holds.
    pub fn record_unsubscribe(&mut self, metadata: &SenderMetadata) {
        self.total_unsubscribed = self.total_unsubscribed.saturating_add(1);
        self.time_saved_minutes = self.total_unsubscribed * MINUTES_SAVED_PER_UNSUBSCRIBE;

        if metadata.domain.is_empty() {
            return;
        }

        let stat = self
            .domains_unsubscribed
            .entry(metadata.domain.clone())
            .or_insert_with(|| DomainStat {
                count: 0,
                sender_name: if metadata.sender_name.is_empty() {
                    metadata.domain.clone()
                } else {
                    metadata.sender_name.clone()
                },
                emails: BTreeSet::new(),
            });

        stat.count = stat.count.saturating_add(1);
        if !metadata.sender_email.is_empty() {
            stat.emails.insert(metadata.sender_email.clone());
        }
    }
}

/// Wire form of [`DomainStat`] with the email set materialized as a sorted
/// list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainSnapshot {
    /// Successful unsubscribe events for this domain.
    pub count: u32,
    /// Display name for the domain.
    pub sender_name: String,
    /// Distinct sender addresses, sorted.
    pub emails: Vec<String>,
}

/// Wire form of [`UserStats`].
///
/// Domains are keyed through a `BTreeMap` so serialized output is stable,
/// and email sets are rendered as sorted lists; the set type never crosses
/// an external boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// Messages scanned across all runs.
    pub total_scanned: u32,
    /// Successful unsubscribes across all runs.
    pub total_unsubscribed: u32,
    /// Estimated minutes saved.
    pub time_saved_minutes: u32,
    /// Per-domain groupings.
    pub domains_unsubscribed: BTreeMap<String, DomainSnapshot>,
}

impl From<&UserStats> for StatsSnapshot {
    fn from(stats: &UserStats) -> Self {
        Self {
            total_scanned: stats.total_scanned,
            total_unsubscribed: stats.total_unsubscribed,
            time_saved_minutes: stats.time_saved_minutes,
            domains_unsubscribed: stats
                .domains_unsubscribed
                .iter()
                .map(|(domain, stat)| {
                    (
                        domain.clone(),
                        DomainSnapshot {
                            count: stat.count,
                            sender_name: stat.sender_name.clone(),
                            emails: stat.emails.iter().cloned().collect(),
                        },
                    )
                })
                .collect(),
        }
    }
}
