//! # postale
//!
//! Email composition and delivery: build an RFC-2822-style message with
//! headers, a body, and MIME attachments, then send it through one of five
//! interchangeable transports.
//!
//! ## Transports
//!
//! - **SMTP**: a sequential, response-code-gated protocol client over TCP
//!   or TLS (implicit or STARTTLS), with optional AUTH LOGIN
//! - **Sendmail**: pipes the rendered message to a sendmail-compatible
//!   binary
//! - **Mail**: delegates to the platform mail-submission facility
//! - **File**: dumps the rendered message into a directory
//! - **Null**: no I/O, always succeeds — the default
//!
//! ## Quick Start
//!
//! ```ignore
//! use postale::{Credentials, Mailer, Message, Security, SmtpClient, Transport};
//!
//! let message = Message::new()
//!     .from("sender@example.com")
//!     .to("recipient@example.com")
//!     .subject("Hello")
//!     .body("Hello, World!");
//!
//! let client = SmtpClient::new("smtp.example.com")
//!     .port(587)
//!     .security(Security::StartTls)
//!     .credentials(Credentials::new("user", "secret"));
//!
//! let mut mailer = Mailer::new(Transport::Smtp(client));
//! let sent = mailer.send(&message).await?;
//! ```
//!
//! Each delivery owns its connection for the lifetime of the call; nothing
//! is pooled and nothing is retried. The first failing protocol step
//! aborts the whole send with enough context (expected code, received
//! code, last server line) to diagnose without re-running.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod error;
mod mailer;
mod transport;

pub use error::{Error, Result};
pub use mailer::Mailer;
pub use transport::{FileTransport, Mail, Sendmail, Transport};

// Message construction surface
pub use postale_mime::{Attachment, Headers, Mailbox, Message};

// SMTP configuration surface
pub use postale_smtp::{Credentials, Error as SmtpError, Security, SmtpClient};
