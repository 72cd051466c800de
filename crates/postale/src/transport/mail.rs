//! Platform mail-submission transport.

use crate::error::{Error, Result};
use postale_mime::Message;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Default mail-submission program, resolved from `PATH`.
const DEFAULT_MAIL: &str = "mail";

/// Delivers through the host's mail-submission facility (the system
/// `mail` binary).
#[derive(Debug, Clone)]
pub struct Mail {
    program: PathBuf,
}

impl Default for Mail {
    fn default() -> Self {
        Self {
            program: PathBuf::from(DEFAULT_MAIL),
        }
    }
}

impl Mail {
    /// Creates the transport using the system `mail` program.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the transport with an explicit submission program.
    #[must_use]
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Returns the configured program.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Submits the message: subject and recipients as arguments, the
    /// rendered body on stdin.
    ///
    /// # Errors
    ///
    /// Returns an error if the message has no recipients, or if the
    /// submission facility fails (cannot spawn, pipe failure, nonzero
    /// exit).
    pub async fn send(&self, message: &Message) -> Result<bool> {
        let recipients = message.envelope_recipients();
        if recipients.is_empty() {
            return Err(Error::NoRecipients);
        }

        let program = self.program.display().to_string();

        let mut command = Command::new(&self.program);
        command.arg("-s").arg(message.subject_text());
        for recipient in &recipients {
            command.arg(recipient);
        }

        let mut child = command
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| Error::Process {
                program: program.clone(),
                source,
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(message.encoded_body().as_bytes())
                .await
                .map_err(|source| Error::Process {
                    program: program.clone(),
                    source,
                })?;
        }

        let status = child.wait().await.map_err(|source| Error::Process {
            program: program.clone(),
            source,
        })?;

        if !status.success() {
            return Err(Error::DeliveryStatus {
                program,
                status: status.code().unwrap_or(-1),
            });
        }

        tracing::debug!(program = %self.program.display(), "message submitted to platform mail");
        Ok(true)
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
    fn default_program() {
        assert_eq!(Mail::new().program(), Path::new("mail"));
    }

    #[tokio::test]
    async fn no_recipients_rejected_before_spawning() {
        let transport = Mail::with_program("/nonexistent/mail");
        let err = transport.send(&Message::new()).await.unwrap_err();
        assert!(matches!(err, Error::NoRecipients));
    }

    #[tokio::test]
    async fn missing_program_is_process_error() {
        let transport = Mail::with_program("/nonexistent/mail");
        let message = Message::new().to("foo@bar.com");
        let err = transport.send(&message).await.unwrap_err();
        assert!(matches!(err, Error::Process { .. }));
    }
}
