//! Sendmail pipe transport.

use crate::error::{Error, Result};
use postale_mime::Message;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Default sendmail binary location.
const DEFAULT_SENDMAIL: &str = "/usr/sbin/sendmail";

/// Delivers by piping the rendered message to a sendmail-compatible binary.
#[derive(Debug, Clone)]
pub struct Sendmail {
    path: PathBuf,
}

impl Default for Sendmail {
    fn default() -> Self {
        Self::new(DEFAULT_SENDMAIL)
    }
}

impl Sendmail {
    /// Creates the transport with the given binary path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the configured binary path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Pipes the rendered message (headers, then body) into the binary.
    ///
    /// Recipients are taken from the message headers via sendmail's `-t`
    /// flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the binary cannot be spawned, the pipe fails,
    /// or the program exits with a nonzero status.
    pub async fn send(&self, message: &Message) -> Result<bool> {
        let program = self.path.display().to_string();
        let from = message.from_address().unwrap_or_default();

        let mut child = Command::new(&self.path)
            .arg("-oi")
            .arg("-f")
            .arg(from)
            .arg("-t")
            .arg("-r")
            .arg(from)
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
                .write_all(message.to_wire().as_bytes())
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

        tracing::debug!(program = %self.path.display(), "message piped to sendmail");
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
    fn default_path() {
        assert_eq!(Sendmail::default().path(), Path::new("/usr/sbin/sendmail"));
    }

    #[tokio::test]
    async fn missing_binary_is_process_error() {
        let transport = Sendmail::new("/nonexistent/sendmail");
        let err = transport.send(&Message::new()).await.unwrap_err();
        assert!(matches!(err, Error::Process { .. }));
    }
}
