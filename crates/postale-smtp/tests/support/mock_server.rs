//! Scripted mock SMTP server for exercising the client over a real socket.
//!
//! The server accepts one connection and plays a fixed reply script: the
//! first entry is written as the greeting, every following entry is written
//! after one command line has been read. A `354` entry switches the server
//! into payload mode, where it consumes lines until the `.` terminator
//! before the next reply. When the script runs out the connection is closed
//! (or held open, to provoke response timeouts).
#![allow(dead_code)] // Test utility module - not every method is used in every test

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;

/// One-shot scripted SMTP server on a loopback port.
pub struct MockServer {
    addr: SocketAddr,
    received: Arc<Mutex<Vec<String>>>,
}

impl MockServer {
    /// Starts a server that closes the connection once the script is
    /// exhausted.
    pub async fn start(replies: &[&str]) -> Self {
        Self::spawn(replies, false).await
    }

    /// Starts a server that keeps the connection open (without replying)
    /// once the script is exhausted.
    pub async fn start_holding(replies: &[&str]) -> Self {
        Self::spawn(replies, true).await
    }

    async fn spawn(replies: &[&str], hold_open: bool) -> Self {
        #[allow(clippy::unwrap_used)]
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        #[allow(clippy::unwrap_used)]
        let addr = listener.local_addr().unwrap();

        let script: Vec<String> = replies.iter().map(ToString::to_string).collect();
        let received = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&received);

        tokio::spawn(async move {
            // Replay the same script for every connection; the test runtime
            // tears the task down when it ends
            while let Ok((stream, _peer)) = listener.accept().await {
                let _ = handle_client(stream, script.clone(), Arc::clone(&log), hold_open).await;
            }
        });

        Self { addr, received }
    }

    /// Returns the server host for the client configuration.
    pub fn host(&self) -> String {
        self.addr.ip().to_string()
    }

    /// Returns the server port.
    pub const fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Returns every line received from the client, payload lines included.
    pub async fn received(&self) -> Vec<String> {
        self.received.lock().await.clone()
    }
}

async fn handle_client(
    mut stream: TcpStream,
    script: Vec<String>,
    received: Arc<Mutex<Vec<String>>>,
    hold_open: bool,
) -> std::io::Result<()> {
    let (reader, mut writer) = stream.split();
    let mut reader = BufReader::new(reader);

    let mut replies = script.into_iter();
    if let Some(greeting) = replies.next() {
        writer.write_all(format!("{greeting}\r\n").as_bytes()).await?;
        writer.flush().await?;
    }

    let mut in_payload = false;
    for reply in replies {
        if in_payload {
            // Consume the DATA payload up to the dot terminator
            loop {
                let Some(line) = read_trimmed(&mut reader).await? else {
                    return Ok(());
                };
                let terminator = line == ".";
                received.lock().await.push(line);
                if terminator {
                    break;
                }
            }
        } else {
            let Some(line) = read_trimmed(&mut reader).await? else {
                return Ok(());
            };
            received.lock().await.push(line);
        }

        in_payload = reply.starts_with("354");
        writer.write_all(format!("{reply}\r\n").as_bytes()).await?;
        writer.flush().await?;
    }

    if hold_open {
        tokio::time::sleep(Duration::from_secs(60)).await;
    }

    Ok(())
}

async fn read_trimmed(
    reader: &mut BufReader<tokio::net::tcp::ReadHalf<'_>>,
) -> std::io::Result<Option<String>> {
    let mut line = String::new();
    if reader.read_line(&mut line).await? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}
