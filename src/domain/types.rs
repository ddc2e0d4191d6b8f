//! Core identifier types for domain entities.
//!
//! Newtype wrappers provide type safety for identifiers, preventing
//! accidental mixing of user identities and raw strings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of an authenticated mailbox owner.
///
/// Gmail identifies users by their primary email address, so the inner
/// string is an email address in practice, but nothing here depends on it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_display() {
        let id = UserId("alice@example.com".to_string());
        assert_eq!(id.to_string(), "alice@example.com");
    }

    #[test]
    fn user_id_equality() {
        let id1 = UserId::from("alice@example.com");
        let id2 = UserId::from("alice@example.com".to_string());
        assert_eq!(id1, id2);
    }

    #[test]
    fn user_id_hash() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(UserId::from("alice@example.com"));
        assert!(set.contains(&UserId::from("alice@example.com")));
    }
}
