//! Email message builder and wire rendering.

use crate::encoding::{encode_base64_chunked, encode_rfc2047, wrap_text};
use crate::error::{Error, Result};
use crate::header::Headers;
use crate::mailbox::Mailbox;
use std::fmt::{self, Write as _};
use std::path::Path;

/// Default word-wrap width for plain-text bodies.
const DEFAULT_WRAP: usize = 70;

/// Default X-Priority value (normal).
const DEFAULT_PRIORITY: u8 = 3;

/// Value for the X-Mailer header.
const MAILER_NAME: &str = "Postale Mailer";

/// A file attached to a message.
#[derive(Debug, Clone)]
pub struct Attachment {
    file_name: String,
    content: Vec<u8>,
}

impl Attachment {
    /// Loads an attachment from disk.
    ///
    /// The file name defaults to the path's base name.
    ///
    /// # Errors
    ///
    /// Returns an error if the path does not exist or cannot be read.
    pub fn from_file(path: impl AsRef<Path>, file_name: Option<&str>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::AttachmentNotFound(path.to_path_buf()));
        }

        let content = std::fs::read(path).map_err(|source| Error::AttachmentRead {
            path: path.to_path_buf(),
            source,
        })?;

        let file_name = file_name
            .map(ToString::to_string)
            .or_else(|| {
                path.file_name()
                    .map(|name| name.to_string_lossy().into_owned())
            })
            .unwrap_or_default();

        Ok(Self {
            file_name: sanitize_file_name(&file_name),
            content,
        })
    }

    /// Returns the attachment file name.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Returns the raw attachment content.
    #[must_use]
    pub fn content(&self) -> &[u8] {
        &self.content
    }
}

/// An email message under construction.
///
/// Built with consuming setter methods; rendered with [`Message::to_wire`]
/// (or `Display`) as the encoded header block, a blank line, and the encoded
/// body. Transports treat that rendering as an opaque payload.
#[derive(Debug, Clone)]
pub struct Message {
    from: Option<Mailbox>,
    reply_to: Option<Mailbox>,
    to: Vec<Mailbox>,
    cc: Vec<Mailbox>,
    bcc: Vec<Mailbox>,
    subject: String,
    body: String,
    attachments: Vec<Attachment>,
    headers: Headers,
    boundary: String,
    wrap_width: usize,
    priority: u8,
    html: bool,
}

impl Default for Message {
    fn default() -> Self {
        Self::new()
    }
}

impl Message {
    /// Creates an empty message.
    #[must_use]
    pub fn new() -> Self {
        Self {
            from: None,
            reply_to: None,
            to: Vec::new(),
            cc: Vec::new(),
            bcc: Vec::new(),
            subject: String::new(),
            body: String::new(),
            attachments: Vec::new(),
            headers: Headers::new(),
            boundary: uuid::Uuid::new_v4().simple().to_string(),
            wrap_width: DEFAULT_WRAP,
            priority: DEFAULT_PRIORITY,
            html: false,
        }
    }

    /// Sets the sender.
    #[must_use]
    pub fn from(mut self, sender: impl Into<Mailbox>) -> Self {
        let sender = sender.into();
        self.headers.set("From", sender.to_string());
        self.from = Some(sender);
        self
    }

    /// Sets the reply-to address. Defaults to the sender when unset.
    #[must_use]
    pub fn reply_to(mut self, mailbox: impl Into<Mailbox>) -> Self {
        let mailbox = mailbox.into();
        self.headers.set("Reply-To", mailbox.to_string());
        self.reply_to = Some(mailbox);
        self
    }

    /// Appends a recipient.
    #[must_use]
    pub fn to(mut self, recipient: impl Into<Mailbox>) -> Self {
        self.to.push(recipient.into());
        self
    }

    /// Sets the carbon-copy recipients.
    ///
    /// # Errors
    ///
    /// Returns an error if the list is empty.
    pub fn cc(mut self, recipients: Vec<Mailbox>) -> Result<Self> {
        if recipients.is_empty() {
            return Err(Error::NoRecipients);
        }

        self.headers.set("Cc", join_mailboxes(&recipients));
        self.cc = recipients;
        Ok(self)
    }

    /// Sets the blind-carbon-copy recipients.
    ///
    /// # Errors
    ///
    /// Returns an error if the list is empty.
    pub fn bcc(mut self, recipients: Vec<Mailbox>) -> Result<Self> {
        if recipients.is_empty() {
            return Err(Error::NoRecipients);
        }

        self.headers.set("Bcc", join_mailboxes(&recipients));
        self.bcc = recipients;
        Ok(self)
    }

    /// Sets the subject.
    #[must_use]
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = strip_header_controls(&subject.into());
        self
    }

    /// Sets the body.
    ///
    /// Lines starting with a dot are stuffed (`\n.` becomes `\n..`) so the
    /// body can never terminate an SMTP DATA payload early.
    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into().replace("\n.", "\n..");
        self
    }

    /// Marks the body as HTML.
    #[must_use]
    pub fn html(mut self) -> Self {
        self.headers
            .set("Content-Type", "text/html; charset=\"UTF-8\"");
        self.html = true;
        self
    }

    /// Sets the word-wrap width for plain-text bodies.
    ///
    /// Values below 1 fall back to the default of 70.
    #[must_use]
    pub fn wrap(mut self, width: usize) -> Self {
        self.wrap_width = if width < 1 { DEFAULT_WRAP } else { width };
        self
    }

    /// Sets the X-Priority value (1 highest .. 5 lowest).
    ///
    /// Out-of-range values fall back to the default of 3.
    #[must_use]
    pub fn priority(mut self, priority: u8) -> Self {
        self.priority = if (1..=5).contains(&priority) {
            priority
        } else {
            DEFAULT_PRIORITY
        };
        self
    }

    /// Sets an arbitrary header, overriding an existing value.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.set(name, strip_header_controls(&value.into()));
        self
    }

    /// Attaches a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the path does not exist or cannot be read.
    pub fn attach(mut self, path: impl AsRef<Path>, file_name: Option<&str>) -> Result<Self> {
        self.attachments.push(Attachment::from_file(path, file_name)?);
        Ok(self)
    }

    /// Returns the sender mailbox, if set.
    #[must_use]
    pub fn sender(&self) -> Option<&Mailbox> {
        self.from.as_ref()
    }

    /// Returns the bare sender address for the SMTP envelope.
    #[must_use]
    pub fn from_address(&self) -> Option<&str> {
        self.from.as_ref().map(Mailbox::email)
    }

    /// Returns the primary recipients.
    #[must_use]
    pub fn to_list(&self) -> &[Mailbox] {
        &self.to
    }

    /// Returns the carbon-copy recipients.
    #[must_use]
    pub fn cc_list(&self) -> &[Mailbox] {
        &self.cc
    }

    /// Returns the blind-carbon-copy recipients.
    #[must_use]
    pub fn bcc_list(&self) -> &[Mailbox] {
        &self.bcc
    }

    /// Returns every envelope recipient address: to, then cc, then bcc.
    #[must_use]
    pub fn envelope_recipients(&self) -> Vec<&str> {
        self.to
            .iter()
            .chain(&self.cc)
            .chain(&self.bcc)
            .map(Mailbox::email)
            .collect()
    }

    /// Returns the subject text.
    #[must_use]
    pub fn subject_text(&self) -> &str {
        &self.subject
    }

    /// Returns the (dot-stuffed) body text.
    #[must_use]
    pub fn body_text(&self) -> &str {
        &self.body
    }

    /// Returns true if the message carries attachments.
    #[must_use]
    pub fn has_attachments(&self) -> bool {
        !self.attachments.is_empty()
    }

    /// Returns the rendered header block, CRLF-terminated per header.
    #[must_use]
    pub fn encoded_headers(&self) -> String {
        self.prepared_headers().to_string()
    }

    /// Returns the rendered body: word-wrapped text, or a multipart
    /// document when attachments are present.
    #[must_use]
    pub fn encoded_body(&self) -> String {
        if self.has_attachments() {
            self.multipart_body()
        } else {
            wrap_text(&self.body, self.wrap_width)
        }
    }

    /// Renders the wire-ready message: headers, a blank line, then the body.
    #[must_use]
    pub fn to_wire(&self) -> String {
        let mut content = self.encoded_headers();
        content.push_str("\r\n");
        content.push_str(&self.encoded_body());
        content
    }

    /// Builds the final header set for rendering.
    ///
    /// Explicitly set headers keep their position; Return-Path and Reply-To
    /// default to the sender, and the trailing block (priority, mailer,
    /// subject, recipients, date, MIME framing) is always regenerated.
    fn prepared_headers(&self) -> Headers {
        let mut headers = self.headers.clone();

        let from = self
            .from
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();

        if !headers.contains("Return-Path") {
            headers.set("Return-Path", from.clone());
        }
        if !headers.contains("Reply-To") {
            headers.set("Reply-To", from);
        }

        headers.set("X-Priority", self.priority.to_string());
        headers.set("X-Mailer", MAILER_NAME);
        headers.set("Subject", encode_rfc2047(&self.subject));
        if !self.to.is_empty() {
            headers.set("To", join_mailboxes(&self.to));
        }
        headers.set("Date", chrono::Local::now().to_rfc2822());

        if self.has_attachments() {
            headers.set("MIME-Version", "1.0");
            headers.set(
                "Content-Type",
                format!("multipart/mixed; boundary=\"{}\"", self.boundary),
            );
        }

        headers
    }

    /// Renders the multipart/mixed body: base64 text part plus one
    /// octet-stream part per attachment.
    fn multipart_body(&self) -> String {
        let boundary = &self.boundary;
        let body_type = if self.html { "text/html" } else { "text/plain" };

        let mut out = String::new();
        out.push_str("This is a multi-part message in MIME format.\r\n");

        let _ = write!(out, "--{boundary}\r\n");
        let _ = write!(out, "Content-Type: {body_type}; charset=\"UTF-8\"\r\n");
        out.push_str("Content-Transfer-Encoding: base64\r\n\r\n");
        out.push_str(&encode_base64_chunked(self.body.as_bytes()));
        out.push_str("\r\n");

        for attachment in &self.attachments {
            let name = encode_rfc2047(attachment.file_name());
            let _ = write!(out, "--{boundary}\r\n");
            let _ = write!(
                out,
                "Content-Type: application/octet-stream; name=\"{name}\"\r\n"
            );
            out.push_str("Content-Transfer-Encoding: base64\r\n");
            let _ = write!(out, "Content-Disposition: attachment; filename=\"{name}\"\r\n\r\n");
            out.push_str(&encode_base64_chunked(&attachment.content));
            out.push_str("\r\n");
        }

        let _ = write!(out, "--{boundary}--\r\n");
        out
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_wire())
    }
}

/// Joins mailboxes for a recipient header value.
fn join_mailboxes(mailboxes: &[Mailbox]) -> String {
    mailboxes
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Strips control characters that would terminate a header line.
fn strip_header_controls(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, '\r' | '\n' | '\t'))
        .collect()
}

/// Strips characters that would break a file name out of its quoted slot.
fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '\r' | '\n' | '\t' | '"'))
        .collect()
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

    fn sample() -> Message {
        Message::new()
            .from("sender@example.com")
            .to("recipient@example.com")
            .subject("Test")
            .body("Hello, World!")
    }

    #[test]
    fn envelope_recipients_preserve_order() {
        let message = sample()
            .to("second@example.com")
            .cc(vec![Mailbox::new("copy@example.com")])
            .unwrap()
            .bcc(vec![Mailbox::new("hidden@example.com")])
            .unwrap();

        assert_eq!(
            message.envelope_recipients(),
            vec![
                "recipient@example.com",
                "second@example.com",
                "copy@example.com",
                "hidden@example.com",
            ]
        );
    }

    #[test]
    fn envelope_uses_bare_addresses() {
        let message = Message::new()
            .from(Mailbox::with_name("Sender", "sender@example.com"))
            .to(Mailbox::with_name("Recipient", "recipient@example.com"));

        assert_eq!(message.from_address(), Some("sender@example.com"));
        assert_eq!(message.envelope_recipients(), vec!["recipient@example.com"]);
    }

    #[test]
    fn empty_cc_rejected() {
        assert!(matches!(sample().cc(vec![]), Err(Error::NoRecipients)));
    }

    #[test]
    fn empty_bcc_rejected() {
        assert!(matches!(sample().bcc(vec![]), Err(Error::NoRecipients)));
    }

    #[test]
    fn body_dot_stuffed() {
        let message = Message::new().body("line\n.hidden terminator");
        assert_eq!(message.body_text(), "line\n..hidden terminator");
    }

    #[test]
    fn wire_format_separates_headers_and_body() {
        let wire = sample().to_wire();
        let split = wire.find("\r\n\r\n").unwrap();

        let headers = &wire[..split];
        assert!(headers.contains("From: sender@example.com"));
        assert!(headers.contains("To: recipient@example.com"));
        assert!(headers.contains("Subject: Test"));
        assert!(headers.contains("X-Priority: 3"));
        assert!(headers.contains("X-Mailer: Postale Mailer"));
        assert!(headers.contains("Date: "));
        assert!(wire.ends_with("Hello, World!"));
    }

    #[test]
    fn return_path_and_reply_to_default_to_sender() {
        let headers = sample().encoded_headers();
        assert!(headers.contains("Return-Path: sender@example.com"));
        assert!(headers.contains("Reply-To: sender@example.com"));
    }

    #[test]
    fn explicit_reply_to_preserved() {
        let headers = sample()
            .reply_to("replies@example.com")
            .encoded_headers();
        assert!(headers.contains("Reply-To: replies@example.com"));
    }

    #[test]
    fn html_sets_content_type() {
        let headers = sample().html().encoded_headers();
        assert!(headers.contains("Content-Type: text/html; charset=\"UTF-8\""));
    }

    #[test]
    fn priority_out_of_range_falls_back() {
        let message = sample().priority(9);
        assert!(message.encoded_headers().contains("X-Priority: 3"));

        let message = sample().priority(1);
        assert!(message.encoded_headers().contains("X-Priority: 1"));
    }

    #[test]
    fn wrap_zero_falls_back_to_default() {
        let long = "word ".repeat(40);
        let message = Message::new().body(long).wrap(0);
        let wrapped = message.encoded_body();
        assert!(wrapped.lines().all(|line| line.len() <= 70));
    }

    #[test]
    fn body_wrapped_at_configured_width() {
        let message = Message::new().body("aaa bbb ccc ddd").wrap(7);
        assert_eq!(message.encoded_body(), "aaa bbb\nccc ddd");
    }

    #[test]
    fn custom_header_included() {
        let headers = sample().header("X-Campaign", "launch").encoded_headers();
        assert!(headers.contains("X-Campaign: launch"));
    }

    #[test]
    fn header_injection_stripped_from_custom_value() {
        let headers = sample()
            .header("X-Test", "value\r\nBcc: evil@example.com")
            .encoded_headers();
        assert!(headers.contains("X-Test: valueBcc: evil@example.com"));
    }

    #[test]
    fn missing_attachment_rejected() {
        let result = sample().attach("/nonexistent/file.bin", None);
        assert!(matches!(result, Err(Error::AttachmentNotFound(_))));
    }

    #[test]
    fn attachment_switches_to_multipart() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("postale-attach-{}.txt", uuid::Uuid::new_v4().simple()));
        std::fs::write(&path, b"attachment payload").unwrap();

        let message = sample().attach(&path, Some("payload.txt")).unwrap();
        assert!(message.has_attachments());

        let wire = message.to_wire();
        assert!(wire.contains("multipart/mixed; boundary="));
        assert!(wire.contains("Content-Disposition: attachment; filename=\"payload.txt\""));
        assert!(wire.contains("This is a multi-part message in MIME format."));
        assert!(wire.trim_end().ends_with("--"));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn attachment_default_name_is_base_name() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("postale-name-{}.bin", uuid::Uuid::new_v4().simple()));
        std::fs::write(&path, b"x").unwrap();

        let attachment = Attachment::from_file(&path, None).unwrap();
        assert_eq!(
            attachment.file_name(),
            path.file_name().unwrap().to_string_lossy()
        );

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn non_ascii_subject_encoded() {
        let headers = sample().subject("Héllo").encoded_headers();
        assert!(headers.contains("Subject: =?UTF-8?B?"));
    }

    #[test]
    fn cc_header_lists_all_addresses() {
        let message = sample()
            .cc(vec![
                Mailbox::new("one@example.com"),
                Mailbox::new("two@example.com"),
            ])
            .unwrap();
        assert!(message
            .encoded_headers()
            .contains("Cc: one@example.com, two@example.com"));
    }
}
