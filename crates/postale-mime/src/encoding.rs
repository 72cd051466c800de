//! Encoding utilities for header values and message bodies.
//!
//! Covers Base64 (plain and line-chunked), RFC 2047 encoded words, and the
//! word wrapping applied to plain-text bodies.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Maximum characters per line for chunked Base64 output.
const BASE64_LINE_LENGTH: usize = 76;

/// Encodes data as Base64.
#[must_use]
pub fn encode_base64(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Encodes data as Base64 split into 76-character lines.
///
/// Each line, including the last, is terminated with CRLF. This is the
/// framing used for attachment bodies inside multipart messages.
#[must_use]
pub fn encode_base64_chunked(data: &[u8]) -> String {
    let encoded = STANDARD.encode(data);
    let mut result = String::with_capacity(encoded.len() + encoded.len() / BASE64_LINE_LENGTH * 2);

    let bytes = encoded.as_bytes();
    for chunk in bytes.chunks(BASE64_LINE_LENGTH) {
        // Base64 output is always ASCII
        result.push_str(&String::from_utf8_lossy(chunk));
        result.push_str("\r\n");
    }

    result
}

/// Encodes a header value as an RFC 2047 encoded word when needed.
///
/// Plain ASCII values without `=` or `?` pass through unchanged; anything
/// else becomes `=?UTF-8?B?<base64>?=`.
#[must_use]
pub fn encode_rfc2047(text: &str) -> String {
    if text.chars().all(|c| c.is_ascii() && c != '=' && c != '?') {
        return text.to_string();
    }

    format!("=?UTF-8?B?{}?=", encode_base64(text.as_bytes()))
}

/// Wraps text at word boundaries to the given width.
///
/// Existing line breaks are preserved and words longer than the width are
/// left unbroken.
#[must_use]
pub fn wrap_text(text: &str, width: usize) -> String {
    let mut result = String::with_capacity(text.len());

    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            result.push('\n');
        }

        let mut column = 0;
        for (j, word) in line.split(' ').enumerate() {
            if j == 0 {
                result.push_str(word);
                column = word.len();
            } else if column + 1 + word.len() > width {
                result.push('\n');
                result.push_str(word);
                column = word.len();
            } else {
                result.push(' ');
                result.push_str(word);
                column += 1 + word.len();
            }
        }
    }

    result
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
    fn base64_encode() {
        assert_eq!(encode_base64(b"Hello, World!"), "SGVsbG8sIFdvcmxkIQ==");
    }

    #[test]
    fn base64_chunked_short_input() {
        let encoded = encode_base64_chunked(b"Hello");
        assert_eq!(encoded, "SGVsbG8=\r\n");
    }

    #[test]
    fn base64_chunked_splits_lines() {
        let data = vec![b'a'; 100];
        let encoded = encode_base64_chunked(&data);

        for line in encoded.split("\r\n").filter(|l| !l.is_empty()) {
            assert!(line.len() <= 76);
        }
        assert!(encoded.ends_with("\r\n"));
    }

    #[test]
    fn rfc2047_ascii_passthrough() {
        assert_eq!(encode_rfc2047("Hello world"), "Hello world");
    }

    #[test]
    fn rfc2047_encodes_non_ascii() {
        let encoded = encode_rfc2047("Héllo");
        assert!(encoded.starts_with("=?UTF-8?B?"));
        assert!(encoded.ends_with("?="));
    }

    #[test]
    fn rfc2047_encodes_special_chars() {
        assert!(encode_rfc2047("a=b").starts_with("=?UTF-8?B?"));
        assert!(encode_rfc2047("a?b").starts_with("=?UTF-8?B?"));
    }

    #[test]
    fn wrap_short_line_unchanged() {
        assert_eq!(wrap_text("hello world", 70), "hello world");
    }

    #[test]
    fn wrap_breaks_at_word_boundary() {
        assert_eq!(wrap_text("aaa bbb ccc", 7), "aaa bbb\nccc");
    }

    #[test]
    fn wrap_preserves_existing_breaks() {
        assert_eq!(wrap_text("aaa\nbbb", 70), "aaa\nbbb");
    }

    #[test]
    fn wrap_long_word_not_broken() {
        let word = "a".repeat(100);
        assert_eq!(wrap_text(&word, 70), word);
    }

    #[test]
    fn wrap_empty_input() {
        assert_eq!(wrap_text("", 70), "");
    }
}
