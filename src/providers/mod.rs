//! Remote mailbox providers.
//!
//! Defines the [`Mailbox`] trait the batch pipeline consumes and the Gmail
//! REST implementation.

mod gmail;
mod traits;

pub use gmail::{GmailCredentials, GmailMailbox};
pub use traits::{Mailbox, MailboxError, MailboxLabel, Result};
