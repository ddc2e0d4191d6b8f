//! Batch unsubscription orchestration.
//!
//! Drives the end-to-end run for one user: search the mailbox, feed each
//! message through extract -> locate -> execute, update stats and labels,
//! emit activity records, and persist incrementally. Per-message failures
//! are contained — one bad message never aborts the batch. Only two
//! conditions are fatal: failure to initialize (authenticate/search) and a
//! systemic authentication error encountered mid-loop.
//!
//! Messages are processed strictly sequentially, in search-result order,
//! with a fixed delay between messages as a courtesy rate limit toward the
//! third-party unsubscribe endpoints. `run` takes `&mut self`, so a single
//! runner cannot interleave two batches; deploy one runner per user when
//! concurrent triggering is possible.

use std::time::Duration;

use thiserror::Error;
use tokio::time::sleep;
use uuid::Uuid;

use crate::domain::{Activity, UnsubscribeOutcome, UserId, UserStats};
use crate::providers::{Mailbox, MailboxError};
use crate::storage::{ActivityStore, StatsStore};

use super::extractor;
use super::locator::LinkLocator;
use super::unsubscriber::Unsubscriber;

/// Default mailbox search for subscription email.
pub const DEFAULT_SEARCH_QUERY: &str =
    "\"unsubscribe\" OR \"email preferences\" OR \"opt-out\" OR \"subscription preferences\"";

/// Default label applied to processed messages.
pub const DEFAULT_PROCESSED_LABEL: &str = "UNSUBSCRIBED";

/// Tuning knobs for a batch run.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Fixed delay applied after each processed message.
    pub message_delay: Duration,
    /// Name of the mailbox label marking processed messages.
    pub processed_label: String,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            message_delay: Duration::from_secs(2),
            processed_label: DEFAULT_PROCESSED_LABEL.to_string(),
        }
    }
}

/// Errors that abort a batch run.
#[derive(Debug, Error)]
pub enum BatchError {
    /// Credentials are invalid or expired; the caller should prompt
    /// re-authentication.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// A non-auth mailbox failure during initialization (search included).
    #[error("mailbox error: {0}")]
    Mailbox(MailboxError),
}

impl BatchError {
    fn from_mailbox(err: MailboxError) -> Self {
        if err.is_authentication() {
            Self::Authentication(err.to_string())
        } else {
            Self::Mailbox(err)
        }
    }
}

/// Counts for one completed batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Messages scanned during this run (payload retrieved and piped).
    pub scanned: u32,
    /// Successful unsubscribes during this run.
    pub unsubscribed: u32,
    /// Messages that failed during this run (fetch errors included).
    pub failed: u32,
    /// Cumulative minutes saved across all of the user's runs.
    pub time_saved_minutes: u32,
}

/// Orchestrates batch unsubscription runs.
pub struct BatchRunner<M, U, S, A> {
    mailbox: M,
    unsubscriber: U,
    stats_store: S,
    activity_store: A,
    locator: LinkLocator,
    config: BatchConfig,
}

impl<M, U, S, A> BatchRunner<M, U, S, A>
where
    M: Mailbox,
    U: Unsubscriber,
    S: StatsStore,
    A: ActivityStore,
{
    /// Creates a runner over the given collaborators.
    pub fn new(mailbox: M, unsubscriber: U, stats_store: S, activity_store: A) -> Self {
        Self {
            mailbox,
            unsubscriber,
            stats_store,
            activity_store,
            locator: LinkLocator::new(),
            config: BatchConfig::default(),
        }
    }

    /// Replaces the run configuration.
    pub fn with_config(mut self, config: BatchConfig) -> Self {
        self.config = config;
        self
    }

    /// Executes one batch run for `user`.
    ///
    /// Safe to re-invoke: stats accumulate additively and activities are
    /// append-only, so a crashed or repeated run cannot corrupt previously
    /// recorded state — at most the in-flight message is lost.
    ///
    /// `total_scanned` counts messages whose payload was actually
    /// retrieved; a fetch failure produces an error activity but no scan
    /// increment.
    ///
    /// # Errors
    ///
    /// [`BatchError::Authentication`] when credentials fail before the run
    /// or a systemic auth error interrupts it mid-loop;
    /// [`BatchError::Mailbox`] for non-auth failures during
    /// initialization. Everything else is contained per message.
    pub async fn run(
        &mut self,
        user: &UserId,
        query: &str,
        max_results: u32,
    ) -> Result<BatchSummary, BatchError> {
        let run_id = Uuid::new_v4();
        tracing::info!(user = %user, %run_id, %query, max_results, "starting batch run");

        self.mailbox
            .authenticate()
            .await
            .map_err(BatchError::from_mailbox)?;

        // Store reads are best-effort: a broken stats row degrades to the
        // empty aggregate rather than blocking the run.
        let mut stats = match self.stats_store.load(user).await {
            Ok(stats) => stats,
            Err(err) => {
                tracing::warn!(user = %user, error = %err, "failed to load stats, starting empty");
                UserStats::default()
            }
        };

        self.log(user, Activity::info("🔍 Searching for subscription emails..."))
            .await;

        let ids = self
            .mailbox
            .search(query, max_results)
            .await
            .map_err(BatchError::from_mailbox)?;

        if ids.is_empty() {
            self.log(
                user,
                Activity::warning("⚠️ No subscription emails found matching the search criteria"),
            )
            .await;
            tracing::info!(user = %user, %run_id, "batch run found no messages");
            return Ok(BatchSummary {
                time_saved_minutes: stats.time_saved_minutes,
                ..Default::default()
            });
        }

        self.log(
            user,
            Activity::info(format!(
                "📧 Found {} subscription emails - starting unsubscription process",
                ids.len()
            )),
        )
        .await;

        let label_id = self.ensure_processed_label().await;

        let total = ids.len();
        let mut summary = BatchSummary::default();

        for (index, message_id) in ids.iter().enumerate() {
            if index == 0 {
                self.log(
                    user,
                    Activity::info(format!("🔄 Starting to process {} emails...", total)),
                )
                .await;
            } else if (index + 1) % 10 == 0 || index == total - 1 {
                let percent = ((index + 1) * 100) / total;
                self.log(
                    user,
                    Activity::info(format!(
                        "📊 Progress: {}/{} emails processed ({}% complete)",
                        index + 1,
                        total,
                        percent
                    )),
                )
                .await;
            }

            match self.process_message(message_id).await {
                Ok(outcome) => {
                    stats.record_scan();
                    summary.scanned += 1;

                    match outcome {
                        UnsubscribeOutcome::Unsubscribed(metadata) => {
                            summary.unsubscribed += 1;
                            stats.record_unsubscribe(&metadata);
                            self.label_message(message_id, label_id.as_deref()).await;
                            self.log(
                                user,
                                Activity::success(format!(
                                    "✅ Successfully unsubscribed from {}",
                                    metadata.display()
                                )),
                            )
                            .await;
                        }
                        UnsubscribeOutcome::NoContentFound(metadata) => {
                            summary.failed += 1;
                            self.log(
                                user,
                                Activity::warning(format!(
                                    "⚠️ No readable content in email from {}",
                                    metadata.display()
                                )),
                            )
                            .await;
                        }
                        UnsubscribeOutcome::NoLinksFound(metadata) => {
                            summary.failed += 1;
                            self.log(
                                user,
                                Activity::warning(format!(
                                    "⚠️ No unsubscribe links found in email from {}",
                                    metadata.display()
                                )),
                            )
                            .await;
                        }
                        UnsubscribeOutcome::ExecutionFailed(metadata) => {
                            summary.failed += 1;
                            self.log(
                                user,
                                Activity::error(format!(
                                    "❌ Failed to unsubscribe from {} - no working unsubscribe link found",
                                    metadata.display()
                                )),
                            )
                            .await;
                        }
                    }
                }
                Err(err) if err.is_authentication() => {
                    // Systemic: the rest of the loop cannot succeed with
                    // these credentials. Persist what we have and abort.
                    tracing::error!(user = %user, %run_id, error = %err, "authentication lost mid-run");
                    self.log(
                        user,
                        Activity::error(
                            "❌ Mailbox authentication expired - please reconnect your account",
                        ),
                    )
                    .await;
                    self.persist_stats(user, &stats).await;
                    return Err(BatchError::Authentication(err.to_string()));
                }
                Err(err) => {
                    summary.failed += 1;
                    tracing::error!(user = %user, message = %message_id, error = %err, "error processing email");
                    self.log(
                        user,
                        Activity::error(format!("❌ Error processing email {}: {}", message_id, err))
                            .with_metadata(serde_json::json!({ "message_id": message_id })),
                    )
                    .await;
                }
            }

            self.persist_stats(user, &stats).await;
            sleep(self.config.message_delay).await;
        }

        summary.time_saved_minutes = stats.time_saved_minutes;

        let mut message = format!(
            "🎉 Unsubscription process completed! Scanned {} emails, successfully unsubscribed from {} services",
            summary.scanned, summary.unsubscribed
        );
        if summary.failed > 0 {
            message.push_str(&format!(" ({} failed)", summary.failed));
        }
        message.push_str(&format!(
            ", saving you {} minutes of future email management time.",
            summary.time_saved_minutes
        ));
        self.log(user, Activity::success(message)).await;

        tracing::info!(
            user = %user,
            %run_id,
            scanned = summary.scanned,
            unsubscribed = summary.unsubscribed,
            failed = summary.failed,
            "batch run completed"
        );

        Ok(summary)
    }

    /// Feeds one message through the pipeline.
    ///
    /// Mailbox fetch failures surface as the error arm so the caller can
    /// classify them; every pipeline stage after the fetch is total.
    async fn process_message(&self, id: &str) -> Result<UnsubscribeOutcome, MailboxError> {
        let message = self.mailbox.get_message(id).await?;
        let content = extractor::extract(&message);
        let metadata = content.metadata;

        if content.body.is_empty() {
            return Ok(UnsubscribeOutcome::NoContentFound(metadata));
        }

        let candidates = self.locator.locate(&content.body);
        if candidates.is_empty() {
            return Ok(UnsubscribeOutcome::NoLinksFound(metadata));
        }

        for url in &candidates {
            if self.unsubscriber.attempt(url).await {
                return Ok(UnsubscribeOutcome::Unsubscribed(metadata));
            }
        }

        Ok(UnsubscribeOutcome::ExecutionFailed(metadata))
    }

    /// Finds or creates the processed-messages label.
    ///
    /// Label management is best-effort: on any failure the run proceeds
    /// without labeling.
    async fn ensure_processed_label(&self) -> Option<String> {
        let name = self.config.processed_label.clone();

        match self.mailbox.list_labels().await {
            Ok(labels) => {
                if let Some(label) = labels.into_iter().find(|l| l.name == name) {
                    return Some(label.id);
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to list labels, proceeding without labeling");
                return None;
            }
        }

        match self.mailbox.create_label(&name).await {
            Ok(label) => Some(label.id),
            Err(err) => {
                tracing::warn!(error = %err, label = %name, "failed to create label, proceeding without labeling");
                None
            }
        }
    }

    /// Archives a processed message out of the inbox, best-effort.
    async fn label_message(&self, message_id: &str, label_id: Option<&str>) {
        let Some(label_id) = label_id else {
            return;
        };

        if let Err(err) = self
            .mailbox
            .modify_labels(message_id, &[label_id.to_string()], &["INBOX".to_string()])
            .await
        {
            tracing::warn!(message = %message_id, error = %err, "failed to label processed email");
        }
    }

    /// Appends an activity record, best-effort.
    async fn log(&self, user: &UserId, activity: Activity) {
        if let Err(err) = self.activity_store.append(user, &activity).await {
            tracing::warn!(user = %user, error = %err, "failed to append activity");
        }
    }

    /// Persists stats, best-effort. Called after every message so a crash
    /// loses at most the in-flight message.
    async fn persist_stats(&self, user: &UserId, stats: &UserStats) {
        if let Err(err) = self.stats_store.save(user, stats).await {
            tracing::warn!(user = %user, error = %err, "failed to persist stats");
        }
    }
}
