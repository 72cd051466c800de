//! Mailbox type (display name + address).

use crate::encoding::encode_rfc2047;
use std::fmt;

/// Email mailbox: an address with an optional display name.
///
/// Construction sanitizes header-injection characters so a mailbox can
/// never smuggle additional header lines into the rendered message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mailbox {
    name: Option<String>,
    email: String,
}

impl Mailbox {
    /// Creates a mailbox from a bare address.
    #[must_use]
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            name: None,
            email: sanitize_email(&email.into()),
        }
    }

    /// Creates a mailbox with a display name.
    #[must_use]
    pub fn with_name(name: impl Into<String>, email: impl Into<String>) -> Self {
        let name = sanitize_name(&name.into());
        Self {
            name: (!name.is_empty()).then_some(name),
            email: sanitize_email(&email.into()),
        }
    }

    /// Returns the bare address, as used on the SMTP envelope.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the display name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl From<&str> for Mailbox {
    fn from(email: &str) -> Self {
        Self::new(email)
    }
}

impl From<String> for Mailbox {
    fn from(email: String) -> Self {
        Self::new(email)
    }
}

impl fmt::Display for Mailbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "\"{}\" <{}>", encode_rfc2047(name), self.email),
            None => write!(f, "{}", self.email),
        }
    }
}

/// Strips characters that would break an address out of its header slot.
fn sanitize_email(email: &str) -> String {
    email
        .chars()
        .filter(|c| !matches!(c, '\r' | '\n' | '\t' | '"' | ',' | '<' | '>'))
        .collect()
}

/// Replaces quoting and angle characters in a display name.
fn sanitize_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '\r' | '\n' | '\t'))
        .map(|c| match c {
            '"' => '\'',
            '<' => '[',
            '>' => ']',
            other => other,
        })
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_string_new,
    clippy::needless_collect,
    clippy::unreadable_literal,
    clippy::used_underscore_items,
    clippy::similar_names
)]
mod tests {
    use super::*;

    #[test]
    fn bare_address() {
        let mailbox = Mailbox::new("user@example.com");
        assert_eq!(mailbox.email(), "user@example.com");
        assert_eq!(mailbox.to_string(), "user@example.com");
    }

    #[test]
    fn named_address() {
        let mailbox = Mailbox::with_name("John Doe", "john@example.com");
        assert_eq!(mailbox.email(), "john@example.com");
        assert_eq!(mailbox.to_string(), "\"John Doe\" <john@example.com>");
    }

    #[test]
    fn crlf_stripped_from_address() {
        let mailbox = Mailbox::new("user@example.com\r\nBcc: evil@example.com");
        assert!(!mailbox.email().contains('\r'));
        assert!(!mailbox.email().contains('\n'));
    }

    #[test]
    fn angle_brackets_replaced_in_name() {
        let mailbox = Mailbox::with_name("<script>", "user@example.com");
        assert_eq!(mailbox.name(), Some("[script]"));
    }

    #[test]
    fn quotes_become_apostrophes_in_name() {
        let mailbox = Mailbox::with_name("\"Ada\"", "ada@example.com");
        assert_eq!(mailbox.name(), Some("'Ada'"));
    }

    #[test]
    fn blank_name_treated_as_absent() {
        let mailbox = Mailbox::with_name("  ", "user@example.com");
        assert_eq!(mailbox.name(), None);
        assert_eq!(mailbox.to_string(), "user@example.com");
    }

    #[test]
    fn non_ascii_name_encoded() {
        let mailbox = Mailbox::with_name("Müller", "m@example.com");
        assert!(mailbox.to_string().contains("=?UTF-8?B?"));
    }
}
