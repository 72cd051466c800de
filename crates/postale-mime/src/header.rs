//! Ordered email header collection.

use std::fmt;

/// Collection of email headers preserving insertion order.
///
/// Header names are matched case-insensitively; the rendered output keeps
/// the name casing and position of the first insertion.
#[derive(Debug, Clone, Default)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    /// Creates a new empty header collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a header value, replacing an existing entry in place.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();

        if let Some(entry) = self
            .entries
            .iter_mut()
            .find(|(n, _)| n.eq_ignore_ascii_case(&name))
        {
            entry.1 = value;
        } else {
            self.entries.push((name, value));
        }
    }

    /// Gets the value for a header.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns true if the header is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Removes a header.
    pub fn remove(&mut self, name: &str) {
        self.entries.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
    }

    /// Returns an iterator over all headers in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Returns the number of headers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no headers are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in &self.entries {
            write!(f, "{name}: {value}\r\n")?;
        }
        Ok(())
    }
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
    fn set_and_get() {
        let mut headers = Headers::new();
        headers.set("Subject", "Test");
        assert_eq!(headers.get("Subject"), Some("Test"));
        assert_eq!(headers.get("subject"), Some("Test"));
    }

    #[test]
    fn set_replaces_in_place() {
        let mut headers = Headers::new();
        headers.set("From", "a@example.com");
        headers.set("To", "b@example.com");
        headers.set("From", "c@example.com");

        let rendered = headers.to_string();
        assert_eq!(rendered, "From: c@example.com\r\nTo: b@example.com\r\n");
    }

    #[test]
    fn remove_header() {
        let mut headers = Headers::new();
        headers.set("Subject", "Test");
        headers.remove("subject");
        assert!(!headers.contains("Subject"));
        assert!(headers.is_empty());
    }

    #[test]
    fn display_preserves_insertion_order() {
        let mut headers = Headers::new();
        headers.set("Return-Path", "a@example.com");
        headers.set("Date", "Mon, 1 Jan 2024 00:00:00 +0000");

        let rendered = headers.to_string();
        let return_path = rendered.find("Return-Path").unwrap();
        let date = rendered.find("Date").unwrap();
        assert!(return_path < date);
    }

    #[test]
    fn iter_yields_all_entries() {
        let mut headers = Headers::new();
        headers.set("A", "1");
        headers.set("B", "2");
        assert_eq!(headers.iter().count(), 2);
        assert_eq!(headers.len(), 2);
    }
}
