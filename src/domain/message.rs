//! Gmail message payload types.
//!
//! These mirror the JSON shape returned by `users.messages.get` with
//! `format=full`: a header list plus a MIME tree of parts. A part that
//! carries `parts` is a multipart container; a part without is a leaf whose
//! `body.data` holds URL-safe base64 content.

use serde::{Deserialize, Serialize};

/// One mailbox item as returned by the Gmail API.
///
/// Messages are fetched once per batch run and never mutated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Message identifier assigned by the provider.
    #[serde(default)]
    pub id: String,
    /// Thread this message belongs to.
    #[serde(default)]
    pub thread_id: Option<String>,
    /// Labels currently applied to the message.
    #[serde(default)]
    pub label_ids: Option<Vec<String>>,
    /// Short preview of the message content.
    #[serde(default)]
    pub snippet: Option<String>,
    /// Root of the MIME tree, including the header list.
    #[serde(default)]
    pub payload: Option<MessagePart>,
    /// Delivery timestamp in epoch milliseconds, as a string.
    #[serde(default)]
    pub internal_date: Option<String>,
}

/// A node in the MIME tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePart {
    /// Content type of this part (e.g. `text/html`, `multipart/alternative`).
    #[serde(default)]
    pub mime_type: Option<String>,
    /// Attachment filename, empty for inline parts.
    #[serde(default)]
    pub filename: Option<String>,
    /// Headers attached to this part. Only the root part carries the
    /// message headers (From, Subject, Date).
    #[serde(default)]
    pub headers: Option<Vec<Header>>,
    /// Body payload for leaf parts.
    #[serde(default)]
    pub body: Option<PartBody>,
    /// Child parts for multipart containers.
    #[serde(default)]
    pub parts: Option<Vec<MessagePart>>,
}

impl MessagePart {
    /// Whether this node is a multipart container.
    pub fn is_multipart(&self) -> bool {
        self.parts.as_ref().is_some_and(|p| !p.is_empty())
    }
}

/// A single message header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Header {
    /// Header name (case preserved as sent by the API).
    pub name: String,
    /// Header value.
    pub value: String,
}

/// Body payload of a leaf part.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartBody {
    /// URL-safe base64 content, absent for attachment stubs.
    #[serde(default)]
    pub data: Option<String>,
    /// Decoded size in bytes.
    #[serde(default)]
    pub size: Option<u32>,
    /// Reference to out-of-line attachment content.
    #[serde(default)]
    pub attachment_id: Option<String>,
}
