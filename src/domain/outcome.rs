//! Per-message pipeline outcomes.

use super::SenderMetadata;

/// Result of feeding one message through the extract/locate/execute
/// pipeline.
///
/// Each variant carries the sender metadata gathered during extraction so
/// activity messages can name the sender even on failure paths. Mailbox
/// fetch errors are not an outcome: they travel as the error arm of the
/// per-message result so the orchestrator can classify them.
#[derive(Debug, Clone, PartialEq)]
pub enum UnsubscribeOutcome {
    /// A candidate link returned HTTP 200; the sender is unsubscribed.
    Unsubscribed(SenderMetadata),
    /// Content was extracted but no unsubscribe affordance was found.
    NoLinksFound(SenderMetadata),
    /// The message had no usable HTML or plain-text body.
    NoContentFound(SenderMetadata),
    /// Candidate links existed but none returned HTTP 200.
    ExecutionFailed(SenderMetadata),
}

impl UnsubscribeOutcome {
    /// Sender metadata carried by every variant.
    pub fn metadata(&self) -> &SenderMetadata {
        match self {
            Self::Unsubscribed(m)
            | Self::NoLinksFound(m)
            | Self::NoContentFound(m)
            | Self::ExecutionFailed(m) => m,
        }
    }

    /// Whether this outcome counts as a successful unsubscribe.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Unsubscribed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_is_reachable_from_every_variant() {
        let metadata = SenderMetadata {
            sender_email: "x@a.com".to_string(),
            ..Default::default()
        };

        for outcome in [
            UnsubscribeOutcome::Unsubscribed(metadata.clone()),
            UnsubscribeOutcome::NoLinksFound(metadata.clone()),
            UnsubscribeOutcome::NoContentFound(metadata.clone()),
            UnsubscribeOutcome::ExecutionFailed(metadata.clone()),
        ] {
            assert_eq!(outcome.metadata().sender_email, "x@a.com");
        }
    }

    #[test]
    fn only_unsubscribed_is_success() {
        let metadata = SenderMetadata::default();
        assert!(UnsubscribeOutcome::Unsubscribed(metadata.clone()).is_success());
        assert!(!UnsubscribeOutcome::ExecutionFailed(metadata).is_success());
    }
}
