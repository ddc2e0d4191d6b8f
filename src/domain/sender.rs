//! Sender metadata parsed from message headers.

use serde::{Deserialize, Serialize};

use super::Header;

/// Structured sender information for one message.
///
/// Every field degrades to an empty string when the corresponding header is
/// absent or unparseable; callers never see a missing key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenderMetadata {
    /// The raw From header value.
    pub sender_raw: String,
    /// Display name, with fallbacks (see [`SenderMetadata::from_headers`]).
    pub sender_name: String,
    /// Bare email address of the sender.
    pub sender_email: String,
    /// Lowercased domain of the sender address.
    pub domain: String,
    /// Subject header value.
    pub subject: String,
    /// Date header value, verbatim.
    pub date: String,
}

/// Ephemeral result of content extraction for one message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedContent {
    /// First HTML body found, falling back to the first plain-text body;
    /// empty when the message has neither.
    pub body: String,
    /// Best-effort sender metadata, always present.
    pub metadata: SenderMetadata,
}

impl SenderMetadata {
    /// Parses sender metadata from a message header list.
    ///
    /// The From header is accepted in the `"Name" <email>` and bare `email`
    /// forms. When the display name is absent it falls back to the local
    /// part of the address, and failing that to the capitalized first label
    /// of the domain (`amazon.com` -> `Amazon`).
    pub fn from_headers(headers: &[Header]) -> Self {
        let mut metadata = Self::default();

        for header in headers {
            match header.name.to_ascii_lowercase().as_str() {
                "from" => metadata.parse_from(&header.value),
                "subject" => metadata.subject = header.value.clone(),
                "date" => metadata.date = header.value.clone(),
                _ => {}
            }
        }

        if metadata.sender_name.is_empty() && !metadata.domain.is_empty() {
            metadata.sender_name = capitalize_label(&metadata.domain);
        }

        metadata
    }

    fn parse_from(&mut self, value: &str) {
        let value = value.trim();
        self.sender_raw = value.to_string();

        if let (Some(start), Some(end)) = (value.find('<'), value.rfind('>')) {
            if start < end {
                let email = value[start + 1..end].trim().to_string();
                let name = value[..start].trim().trim_matches('"').trim().to_string();
                self.sender_email = email;
                self.sender_name = name;
            }
        }

        if self.sender_email.is_empty() {
            self.sender_email = value.trim_matches('"').trim().to_string();
        }

        if let Some((local, domain)) = self.sender_email.split_once('@') {
            self.domain = domain.to_lowercase();
            if self.sender_name.is_empty() {
                self.sender_name = local.to_string();
            }
        }
    }

    /// Display form used in activity messages: `Name (email)`, collapsing to
    /// just the name when the address is missing or identical.
    pub fn display(&self) -> String {
        let name = if self.sender_name.is_empty() {
            "Unknown sender"
        } else {
            &self.sender_name
        };
        if self.sender_email.is_empty() || self.sender_email == name {
            name.to_string()
        } else {
            format!("{} ({})", name, self.sender_email)
        }
    }
}

/// Capitalizes the first label of a domain name.
fn capitalize_label(domain: &str) -> String {
    let label = domain.split('.').next().unwrap_or(domain);
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
