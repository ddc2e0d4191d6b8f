//! Mail content extraction.
//!
//! Pulls a usable body and structured sender metadata out of a Gmail
//! message payload. Extraction is a pure, total transformation: any decode
//! failure degrades to empty content plus best-effort metadata, never an
//! error.

use base64::prelude::*;

use crate::domain::{ExtractedContent, Message, MessagePart, SenderMetadata};

/// Extracts body content and sender metadata from a message.
///
/// The MIME tree is walked depth-first in listed order; the first
/// `text/html` leaf with a decodable payload wins. If no HTML leaf exists
/// anywhere in the tree, the same traversal is repeated for the first
/// `text/plain` leaf. A message without parts is treated as a single leaf.
/// The body is the empty string when neither pass finds content.
pub fn extract(message: &Message) -> ExtractedContent {
    let metadata = message
        .payload
        .as_ref()
        .and_then(|p| p.headers.as_deref())
        .map(SenderMetadata::from_headers)
        .unwrap_or_default();

    let body = message
        .payload
        .as_ref()
        .and_then(|payload| {
            first_leaf_of_type(payload, "text/html")
                .or_else(|| first_leaf_of_type(payload, "text/plain"))
        })
        .unwrap_or_default();

    ExtractedContent { body, metadata }
}

/// Finds the first leaf of the given content type in depth-first listed
/// order and returns its decoded text.
///
/// The walk is an explicit work stack rather than recursion so adversarial
/// nesting depth cannot overflow the call stack. Children are pushed in
/// reverse so the first-listed child is visited first. A leaf whose payload
/// fails to decode is skipped and the walk continues.
fn first_leaf_of_type(root: &MessagePart, mime_type: &str) -> Option<String> {
    let mut stack = vec![root];

    while let Some(part) = stack.pop() {
        if part.is_multipart() {
            if let Some(children) = &part.parts {
                for child in children.iter().rev() {
                    stack.push(child);
                }
            }
            continue;
        }

        if part.mime_type.as_deref() == Some(mime_type) {
            if let Some(text) = decode_leaf(part) {
                return Some(text);
            }
        }
    }

    None
}

/// Decodes a leaf part's URL-safe base64 payload into UTF-8 text.
///
/// Returns `None` when the payload is absent or malformed; the leaf is then
/// treated as having no usable content.
fn decode_leaf(part: &MessagePart) -> Option<String> {
    let data = part.body.as_ref()?.data.as_ref()?;

    match BASE64_URL_SAFE_NO_PAD.decode(data) {
        Ok(bytes) => match String::from_utf8(bytes) {
            Ok(text) => Some(text),
            Err(err) => {
                tracing::debug!(error = %err, "leaf payload is not valid UTF-8, skipping");
                None
            }
        },
        Err(err) => {
            tracing::debug!(error = %err, "leaf payload is not valid base64, skipping");
            None
        }
    }
}
