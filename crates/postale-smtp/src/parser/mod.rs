//! SMTP reply-line parsing.
//!
//! Replies are line-oriented. A line whose 4th character is `-` continues a
//! multi-line reply; the first line whose 4th character is a space
//! terminates it, and that line's leading three characters are the numeric
//! reply code:
//!
//! ```text
//! 250-first line
//! 250-second line
//! 250 last line
//! ```

use crate::error::{Error, Result};
use crate::types::ReplyCode;

/// Returns true if the line terminates a reply (4th character is a space).
#[must_use]
pub fn is_final_line(line: &str) -> bool {
    line.len() >= 4 && line.as_bytes()[3] == b' '
}

/// Parses the reply code from a terminating line.
///
/// # Errors
///
/// Returns an error if the line does not start with three ASCII digits.
pub fn parse_code(line: &str) -> Result<ReplyCode> {
    line.get(..3)
        .and_then(|digits| digits.parse::<u16>().ok())
        .map(ReplyCode::new)
        .ok_or_else(|| Error::InvalidReply(line.to_string()))
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
    fn final_line_has_space_separator() {
        assert!(is_final_line("250 OK"));
        assert!(is_final_line("220 smtp.example.com ESMTP ready"));
    }

    #[test]
    fn continuation_line_has_dash_separator() {
        assert!(!is_final_line("250-Continuing"));
    }

    #[test]
    fn short_lines_never_terminate() {
        assert!(!is_final_line("250"));
        assert!(!is_final_line(""));
        assert!(!is_final_line("OK"));
    }

    #[test]
    fn garbage_is_not_final() {
        assert!(!is_final_line("NoValidResponse"));
    }

    #[test]
    fn parse_code_from_final_line() {
        assert_eq!(parse_code("250 OK").unwrap(), ReplyCode::OK);
        assert_eq!(parse_code("354 Go ahead").unwrap().as_u16(), 354);
    }

    #[test]
    fn parse_code_rejects_non_numeric() {
        assert!(matches!(parse_code("ABC DEF"), Err(Error::InvalidReply(_))));
    }

    #[test]
    fn parse_code_rejects_short_line() {
        assert!(matches!(parse_code("25"), Err(Error::InvalidReply(_))));
    }

    #[test]
    fn parse_code_rejects_non_ascii_boundary() {
        assert!(parse_code("2é5 x").is_err());
    }
}
