//! Error types for message construction.

use std::io;
use std::path::PathBuf;

/// Result type alias for message construction.
pub type Result<T> = std::result::Result<T, Error>;

/// Message construction error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Attachment path does not exist.
    #[error("attachment file [{0}] does not exist")]
    AttachmentNotFound(PathBuf),

    /// Attachment could not be read.
    #[error("failed to read attachment [{path}]")]
    AttachmentRead {
        /// Path of the attachment.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// A bulk recipient setter was given an empty list.
    #[error("recipient list is empty")]
    NoRecipients,
}
