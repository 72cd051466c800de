//! Low-level SMTP stream handling.

use crate::error::{Error, Result};
use rustls::pki_types::ServerName;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_rustls::{
    TlsConnector,
    rustls::{ClientConfig, RootCertStore},
};

/// SMTP stream (TCP or TLS).
#[derive(Debug)]
pub enum SmtpStream {
    /// Plain TCP connection.
    Tcp(BufReader<TcpStream>),
    /// TLS-encrypted connection.
    Tls(Box<BufReader<tokio_rustls::client::TlsStream<TcpStream>>>),
}

impl SmtpStream {
    /// Reads one line from the stream.
    ///
    /// Returns `None` on EOF. The trailing line terminator is stripped;
    /// other trailing characters (including a lone separator space) are
    /// preserved for the column-based reply classification.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    pub async fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let read = match self {
            Self::Tcp(reader) => reader.read_line(&mut line).await?,
            Self::Tls(reader) => reader.read_line(&mut line).await?,
        };

        if read == 0 {
            return Ok(None);
        }

        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Writes data to the stream and flushes it.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub async fn write_all(&mut self, data: &[u8]) -> Result<()> {
        match self {
            Self::Tcp(reader) => {
                reader.get_mut().write_all(data).await?;
                reader.get_mut().flush().await?;
            }
            Self::Tls(reader) => {
                reader.get_mut().write_all(data).await?;
                reader.get_mut().flush().await?;
            }
        }
        Ok(())
    }

    /// Upgrades a TCP stream to TLS in place, after an accepted STARTTLS.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Tls`] if the connection is already encrypted or the
    /// handshake fails; the server has agreed to the upgrade at this point,
    /// so a failure here is a security error rather than a code mismatch.
    pub async fn upgrade_to_tls(self, hostname: &str) -> Result<Self> {
        let tcp_stream = match self {
            Self::Tcp(reader) => reader.into_inner(),
            Self::Tls(_) => return Err(Error::Tls("connection is already encrypted".into())),
        };

        let server_name = ServerName::try_from(hostname.to_string())
            .map_err(|_| Error::Tls(format!("invalid hostname: {hostname}")))?;

        let connector = tls_connector();
        let tls_stream = connector
            .connect(server_name, tcp_stream)
            .await
            .map_err(|e| Error::Tls(e.to_string()))?;

        Ok(Self::Tls(Box::new(BufReader::new(tls_stream))))
    }

    /// Shuts the connection down.
    ///
    /// # Errors
    ///
    /// Returns an error if the shutdown fails.
    pub async fn shutdown(&mut self) -> std::io::Result<()> {
        match self {
            Self::Tcp(reader) => reader.get_mut().shutdown().await,
            Self::Tls(reader) => reader.get_mut().shutdown().await,
        }
    }
}

/// Connects to an SMTP server over plain TCP.
///
/// # Errors
///
/// Returns [`Error::Connection`] if the connection cannot be established
/// within the timeout.
pub async fn connect(host: &str, port: u16, connect_timeout: Duration) -> Result<SmtpStream> {
    let addr = format!("{host}:{port}");

    let stream = timeout(connect_timeout, TcpStream::connect(&addr))
        .await
        .map_err(|_| Error::connection(host, port, "connect timed out"))?
        .map_err(|e| Error::connection(host, port, e.to_string()))?;

    Ok(SmtpStream::Tcp(BufReader::new(stream)))
}

/// Connects to an SMTP server with implicit TLS.
///
/// # Errors
///
/// Returns [`Error::Connection`] if the connection or the up-front TLS
/// handshake fails within the timeout.
pub async fn connect_tls(host: &str, port: u16, connect_timeout: Duration) -> Result<SmtpStream> {
    let addr = format!("{host}:{port}");

    let server_name = ServerName::try_from(host.to_string())
        .map_err(|_| Error::connection(host, port, format!("invalid hostname: {host}")))?;

    let handshake = async {
        let tcp_stream = TcpStream::connect(&addr).await?;
        tls_connector().connect(server_name, tcp_stream).await
    };

    let tls_stream = timeout(connect_timeout, handshake)
        .await
        .map_err(|_| Error::connection(host, port, "connect timed out"))?
        .map_err(|e| Error::connection(host, port, e.to_string()))?;

    Ok(SmtpStream::Tls(Box::new(BufReader::new(tls_stream))))
}

/// Creates a TLS connector with the bundled webpki root certificates.
fn tls_connector() -> TlsConnector {
    let root_store = RootCertStore {
        roots: webpki_roots::TLS_SERVER_ROOTS.to_vec(),
    };

    let config = ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();

    TlsConnector::from(Arc::new(config))
}
