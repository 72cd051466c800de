//! # postale-smtp
//!
//! Client-side SMTP delivery for the postale library: a sequential,
//! response-code-gated protocol state machine over a plain TCP or
//! TLS-encrypted stream.
//!
//! ## Protocol sequence
//!
//! ```text
//! connect ── 220 ──→ EHLO ── 250 ──→ [STARTTLS ── 220 ──→ EHLO ── 250]
//!     ──→ [AUTH LOGIN ── 334/334/235] ──→ MAIL FROM ── 250
//!     ──→ RCPT TO (×N) ── 250 ──→ DATA ── 354 ──→ payload ── 250
//!     ──→ QUIT ── 221 ──→ close
//! ```
//!
//! Every command must be answered with exactly the reply code the current
//! step mandates; the first mismatch aborts the whole send with the
//! expected code, the received code, and the last raw server line. Nothing
//! is retried.
//!
//! ## Quick Start
//!
//! ```ignore
//! use postale_smtp::{Credentials, Security, SmtpClient};
//!
//! let mut client = SmtpClient::new("smtp.example.com")
//!     .port(587)
//!     .security(Security::StartTls)
//!     .credentials(Credentials::new("user", "secret"));
//!
//! let sent = client
//!     .send(
//!         "sender@example.com",
//!         &["recipient@example.com".to_string()],
//!         "Subject: Hi\r\n\r\nHello!",
//!     )
//!     .await?;
//!
//! // Wire transcript of the last call, for diagnostics
//! for command in client.commands() {
//!     println!("C: {}", command.trim_end());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`command`]: SMTP command serialization
//! - [`connection`]: Stream handling, session context, and the client
//! - [`parser`]: Reply-line classification and code parsing
//! - [`types`]: Reply codes, credentials, security modes

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod command;
pub mod connection;
mod error;
pub mod parser;
pub mod types;

pub use connection::{Session, SmtpClient, SmtpStream};
pub use error::{Error, Result};
pub use types::{Credentials, Reply, ReplyCode, Security};
