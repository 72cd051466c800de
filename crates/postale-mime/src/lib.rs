//! # postale-mime
//!
//! Email message construction for the postale delivery library.
//!
//! ## Features
//!
//! - **Message building**: Sender, recipients (to/cc/bcc), subject, body
//! - **Attachments**: Base64-encoded `multipart/mixed` rendering
//! - **Header encoding**: RFC 2047 encoded words for non-ASCII values
//! - **Sanitization**: Header-injection characters stripped from addresses
//!   and display names
//!
//! ## Quick Start
//!
//! ```ignore
//! use postale_mime::{Mailbox, Message};
//!
//! let message = Message::new()
//!     .from("sender@example.com")
//!     .to("recipient@example.com")
//!     .subject("Hello")
//!     .body("Hello, World!");
//!
//! // Wire-ready rendering: headers + CRLF + body
//! let raw = message.to_wire();
//! ```
//!
//! ## Attachments
//!
//! ```ignore
//! use postale_mime::Message;
//!
//! let message = Message::new()
//!     .from("sender@example.com")
//!     .to("recipient@example.com")
//!     .subject("Report")
//!     .body("Attached.")
//!     .attach("report.pdf", None)?; // fails if the file does not exist
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod error;
mod header;
mod mailbox;
mod message;

pub mod encoding;

pub use error::{Error, Result};
pub use header::Headers;
pub use mailbox::Mailbox;
pub use message::{Attachment, Message};
