//! File dump transport.

use crate::error::{Error, Result};
use postale_mime::Message;
use std::path::{Path, PathBuf};

/// Writes the rendered message to a file in a destination directory.
///
/// Files are named `<timestamp>-<random>.txt` so repeated sends never
/// collide.
#[derive(Debug, Clone)]
pub struct FileTransport {
    dir: PathBuf,
}

impl Default for FileTransport {
    fn default() -> Self {
        Self::new(std::env::temp_dir())
    }
}

impl FileTransport {
    /// Creates the transport with the given destination directory.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the destination directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes the rendered message to a fresh file.
    ///
    /// # Errors
    ///
    /// Returns an error if the destination directory does not exist, or if
    /// the file cannot be written (which covers an unwritable directory).
    pub async fn send(&self, message: &Message) -> Result<bool> {
        if !self.dir.is_dir() {
            return Err(Error::DestinationDir(self.dir.clone()));
        }

        let name = format!(
            "{}-{}.txt",
            chrono::Local::now().format("%Y%m%d%H%M%S"),
            uuid::Uuid::new_v4().simple()
        );
        let path = self.dir.join(name);

        tokio::fs::write(&path, message.to_wire())
            .await
            .map_err(|source| Error::FileWrite {
                path: path.clone(),
                source,
            })?;

        tracing::debug!(path = %path.display(), "message written");
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
    fn default_dir_is_temp() {
        assert_eq!(FileTransport::default().dir(), std::env::temp_dir());
    }

    #[tokio::test]
    async fn missing_directory_rejected() {
        let transport = FileTransport::new("/nonexistent/postale-dump");
        let err = transport.send(&Message::new()).await.unwrap_err();
        assert!(matches!(err, Error::DestinationDir(_)));
    }
}
