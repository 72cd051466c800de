//! Session context for a single delivery.
//!
//! A [`Session`] is owned by exactly one `send` invocation. It drives the
//! command/reply exchange over the stream and records every wire write and
//! every reply line into the transcript it borrows from the client, so the
//! transcript survives a failed step.

use super::stream::SmtpStream;
use crate::command::Command;
use crate::error::{Error, Result};
use crate::parser::{is_final_line, parse_code};
use crate::types::{Reply, ReplyCode};
use std::time::Duration;
use tokio::time::timeout;

/// Protocol session over an open stream.
#[derive(Debug)]
pub struct Session<'a> {
    stream: SmtpStream,
    response_timeout: Duration,
    commands: &'a mut Vec<String>,
    responses: &'a mut Vec<String>,
}

impl<'a> Session<'a> {
    /// Creates a session over an open stream.
    pub fn new(
        stream: SmtpStream,
        response_timeout: Duration,
        commands: &'a mut Vec<String>,
        responses: &'a mut Vec<String>,
    ) -> Self {
        Self {
            stream,
            response_timeout,
            commands,
            responses,
        }
    }

    /// Writes raw text to the stream, recording it in the transcript.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub async fn transmit(&mut self, text: &str) -> Result<()> {
        tracing::trace!(command = %text.trim_end(), "sending");
        self.commands.push(text.to_string());
        self.stream.write_all(text.as_bytes()).await
    }

    /// Sends a command and requires the mandated reply code.
    ///
    /// # Errors
    ///
    /// Returns an error if the write or read fails, or if the reply code
    /// differs from `expected`.
    pub async fn exchange(&mut self, command: &Command, expected: ReplyCode) -> Result<Reply> {
        self.transmit(&command.serialize()).await?;
        self.read_expect(expected).await
    }

    /// Reads one reply and requires the mandated code.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnexpectedReply`] carrying the expected code, the
    /// received code, and the terminating reply line on a mismatch.
    pub async fn read_expect(&mut self, expected: ReplyCode) -> Result<Reply> {
        let reply = self.read_reply().await?;

        if reply.code != expected {
            return Err(Error::UnexpectedReply {
                expected: expected.as_u16(),
                received: reply.code.as_u16(),
                reply: reply.last_line().to_string(),
            });
        }

        Ok(reply)
    }

    /// Reads one complete (possibly multi-line) reply.
    ///
    /// Each line is read under the response timeout; timeout or EOF before
    /// a terminating line is fatal.
    async fn read_reply(&mut self) -> Result<Reply> {
        let mut lines = Vec::new();

        loop {
            let line = timeout(self.response_timeout, self.stream.read_line())
                .await
                .map_err(|_| Error::NoResponse)??
                .ok_or(Error::NoResponse)?;

            self.responses.push(line.clone());

            if is_final_line(&line) {
                let code = parse_code(&line)?;
                tracing::debug!(code = code.as_u16(), "reply received");
                lines.push(line);
                return Ok(Reply::new(code, lines));
            }

            lines.push(line);
        }
    }

    /// Renegotiates the existing connection to TLS after an accepted
    /// STARTTLS, preserving the transcript.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Tls`] if the handshake fails.
    pub async fn upgrade_to_tls(self, hostname: &str) -> Result<Session<'a>> {
        let Self {
            stream,
            response_timeout,
            commands,
            responses,
        } = self;

        let stream = stream.upgrade_to_tls(hostname).await?;

        Ok(Session {
            stream,
            response_timeout,
            commands,
            responses,
        })
    }

    /// Shuts the connection down, reporting whether the close succeeded.
    pub async fn close(mut self) -> bool {
        match self.stream.shutdown().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "connection shutdown failed");
                false
            }
        }
    }
}
