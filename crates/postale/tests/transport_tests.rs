//! Transport and facade tests: file dump, sendmail pipe, platform mail,
//! and end-to-end SMTP delivery against a scripted loopback server.

use postale::{
    Error, FileTransport, Mailbox, Mailer, Message, Sendmail, SmtpClient, SmtpError, Transport,
};

/// Scripted one-connection SMTP server for facade-level delivery tests.
mod scripted {
    use std::net::SocketAddr;
    use std::sync::Arc;
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::sync::Mutex;

    pub struct Server {
        pub addr: SocketAddr,
        received: Arc<Mutex<Vec<String>>>,
    }

    impl Server {
        pub async fn start(replies: &[&str]) -> Self {
            #[allow(clippy::unwrap_used)]
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            #[allow(clippy::unwrap_used)]
            let addr = listener.local_addr().unwrap();

            let script: Vec<String> = replies.iter().map(ToString::to_string).collect();
            let received = Arc::new(Mutex::new(Vec::new()));
            let log = Arc::clone(&received);

            tokio::spawn(async move {
                if let Ok((stream, _peer)) = listener.accept().await {
                    let _ = handle(stream, script, log).await;
                }
            });

            Self { addr, received }
        }

        pub async fn received(&self) -> Vec<String> {
            self.received.lock().await.clone()
        }
    }

    async fn handle(
        mut stream: TcpStream,
        script: Vec<String>,
        received: Arc<Mutex<Vec<String>>>,
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
            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).await? == 0 {
                    return Ok(());
                }
                let line = line.trim_end_matches(['\r', '\n']).to_string();
                let done = !in_payload || line == ".";
                received.lock().await.push(line);
                if done {
                    break;
                }
            }

            in_payload = reply.starts_with("354");
            writer.write_all(format!("{reply}\r\n").as_bytes()).await?;
            writer.flush().await?;
        }

        Ok(())
    }
}

fn unique_name(prefix: &str) -> String {
    format!("{prefix}-{}", uuid::Uuid::new_v4().simple())
}

fn sample_message() -> Message {
    Message::new()
        .from("sender@example.com")
        .to("recipient@example.com")
        .subject("Test")
        .body("Hello, World!")
}

#[tokio::test]
async fn file_transport_writes_rendered_message() {
    let dir = std::env::temp_dir().join(unique_name("postale-dump"));
    std::fs::create_dir(&dir).unwrap();

    let transport = FileTransport::new(&dir);
    let sent = transport.send(&sample_message()).await.unwrap();
    assert!(sent);

    let entries: Vec<_> = std::fs::read_dir(&dir).unwrap().collect();
    assert_eq!(entries.len(), 1);

    let path = entries[0].as_ref().unwrap().path();
    assert_eq!(path.extension().and_then(|e| e.to_str()), Some("txt"));

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("From: sender@example.com"));
    assert!(content.contains("Subject: Test"));
    assert!(content.ends_with("Hello, World!"));

    std::fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn file_transport_generates_distinct_names() {
    let dir = std::env::temp_dir().join(unique_name("postale-dump"));
    std::fs::create_dir(&dir).unwrap();

    let transport = FileTransport::new(&dir);
    transport.send(&sample_message()).await.unwrap();
    transport.send(&sample_message()).await.unwrap();

    assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 2);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[cfg(unix)]
fn write_script(contents: &str) -> std::path::PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = std::env::temp_dir().join(format!("{}.sh", unique_name("postale-script")));
    std::fs::write(&path, contents).unwrap();

    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();

    path
}

#[cfg(unix)]
#[tokio::test]
async fn sendmail_success_on_zero_exit() {
    let script = write_script("#!/bin/sh\ncat > /dev/null\nexit 0\n");

    let transport = Sendmail::new(&script);
    let sent = transport.send(&sample_message()).await.unwrap();
    assert!(sent);

    std::fs::remove_file(&script).unwrap();
}

#[cfg(unix)]
#[tokio::test]
async fn sendmail_nonzero_exit_reports_status() {
    let script = write_script("#!/bin/sh\ncat > /dev/null\nexit 64\n");

    let transport = Sendmail::new(&script);
    let err = transport.send(&sample_message()).await.unwrap_err();

    match err {
        Error::DeliveryStatus { status, .. } => assert_eq!(status, 64),
        other => panic!("expected DeliveryStatus, got {other:?}"),
    }

    std::fs::remove_file(&script).unwrap();
}

#[cfg(unix)]
#[tokio::test]
async fn platform_mail_success_on_zero_exit() {
    let script = write_script("#!/bin/sh\ncat > /dev/null\nexit 0\n");

    let transport = postale::Mail::with_program(&script);
    let sent = transport.send(&sample_message()).await.unwrap();
    assert!(sent);

    std::fs::remove_file(&script).unwrap();
}

#[tokio::test]
async fn mailer_delivers_through_smtp_transport() {
    let server = scripted::Server::start(&[
        "220 OK", "250 OK", "250 OK", "250 OK", "250 OK", "250 OK", "354 OK", "250 OK",
        "221 OK",
    ])
    .await;

    let message = Message::new()
        .from(Mailbox::with_name("Sender", "sender@example.com"))
        .to("to@example.com")
        .cc(vec![Mailbox::new("cc@example.com")])
        .unwrap()
        .bcc(vec![Mailbox::new("bcc@example.com")])
        .unwrap()
        .subject("Test")
        .body("Hello, World!");

    let client = SmtpClient::new(server.addr.ip().to_string()).port(server.addr.port());
    let mut mailer = Mailer::new(Transport::Smtp(client));

    let sent = mailer.send(&message).await.unwrap();
    assert!(sent);

    let Transport::Smtp(client) = mailer.transport() else {
        panic!("transport changed variant");
    };

    // Envelope uses bare addresses, recipients in to/cc/bcc order
    let commands = client.commands();
    assert_eq!(commands[1], "MAIL FROM:<sender@example.com>\r\n");
    assert_eq!(commands[2], "RCPT TO:<to@example.com>\r\n");
    assert_eq!(commands[3], "RCPT TO:<cc@example.com>\r\n");
    assert_eq!(commands[4], "RCPT TO:<bcc@example.com>\r\n");

    let received = server.received().await;
    assert!(received.iter().any(|line| line == "Subject: Test"));
    assert!(received.iter().any(|line| line == "."));
}

#[tokio::test]
async fn smtp_rcpt_failure_surfaces_protocol_error() {
    let server =
        scripted::Server::start(&["220 OK", "250 OK", "250 OK", "300 NotOK"]).await;

    let client = SmtpClient::new(server.addr.ip().to_string()).port(server.addr.port());
    let mut mailer = Mailer::new(Transport::Smtp(client));

    let err = mailer.send(&sample_message()).await.unwrap_err();
    match err {
        Error::Smtp(SmtpError::UnexpectedReply {
            expected, received, ..
        }) => {
            assert_eq!(expected, 250);
            assert_eq!(received, 300);
        }
        other => panic!("expected SMTP UnexpectedReply, got {other:?}"),
    }
}
