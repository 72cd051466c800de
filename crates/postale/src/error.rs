//! Error types for message delivery.

use std::io;
use std::path::PathBuf;

/// Result type alias for delivery operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Delivery error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// SMTP protocol failure.
    #[error(transparent)]
    Smtp(#[from] postale_smtp::Error),

    /// Message construction failure.
    #[error(transparent)]
    Message(#[from] postale_mime::Error),

    /// The message has no envelope recipients.
    #[error("message has no recipients")]
    NoRecipients,

    /// A delivery program could not be run or its pipe failed.
    #[error("delivery program [{program}] failed")]
    Process {
        /// Program that was invoked.
        program: String,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// A delivery program exited with a nonzero status.
    #[error("delivery program [{program}] exited with status {status}")]
    DeliveryStatus {
        /// Program that was invoked.
        program: String,
        /// Exit status code.
        status: i32,
    },

    /// The file transport's destination directory is unusable.
    #[error("message destination directory [{0}] does not exist or is not writable")]
    DestinationDir(PathBuf),

    /// The file transport could not write the message.
    #[error("could not write message to file [{path}]")]
    FileWrite {
        /// Target file path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}
