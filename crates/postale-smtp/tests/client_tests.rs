//! End-to-end client tests against a scripted loopback SMTP server.

mod support;

use postale_smtp::{Credentials, Error, Security, SmtpClient};
use std::time::Duration;
use support::mock_server::MockServer;

const SUCCESS_SCRIPT: [&str; 7] = [
    "220 OK", "250 OK", "250 OK", "250 OK", "354 OK", "250 OK", "221 OK",
];

fn client_for(server: &MockServer) -> SmtpClient {
    SmtpClient::new(server.host()).port(server.port())
}

fn one_recipient() -> Vec<String> {
    vec!["foo@bar.com".to_string()]
}

#[tokio::test]
async fn send_success_without_auth() {
    let server = MockServer::start(&SUCCESS_SCRIPT).await;
    let mut client = client_for(&server);

    let sent = client
        .send("sender@bar.com", &one_recipient(), "Subject: Hi\r\n\r\nBody")
        .await
        .unwrap();

    assert!(sent);

    // EHLO, MAIL FROM, RCPT TO, DATA, payload, QUIT
    let commands = client.commands();
    assert_eq!(commands.len(), 6);
    assert!(commands[0].starts_with("EHLO "));
    assert_eq!(commands[1], "MAIL FROM:<sender@bar.com>\r\n");
    assert_eq!(commands[2], "RCPT TO:<foo@bar.com>\r\n");
    assert_eq!(commands[3], "DATA\r\n");
    assert!(commands[4].ends_with("\r\n.\r\n"));
    assert_eq!(commands[5], "QUIT\r\n");

    assert!(!commands.iter().any(|c| c.starts_with("AUTH")));
    assert_eq!(client.responses().len(), 7);
}

#[tokio::test]
async fn send_success_with_auth() {
    let server = MockServer::start(&[
        "220 OK",
        "250 OK",
        "334 VXNlcm5hbWU6",
        "334 UGFzc3dvcmQ6",
        "235 OK",
        "250 OK",
        "250 OK",
        "354 OK",
        "250 OK",
        "221 OK",
    ])
    .await;

    let mut client = client_for(&server).credentials(Credentials::new("foo", "bar"));

    let sent = client
        .send("sender@bar.com", &one_recipient(), "Subject: Hi\r\n\r\nBody")
        .await
        .unwrap();

    assert!(sent);

    // AUTH LOGIN adds exactly three commands
    let commands = client.commands();
    assert_eq!(commands.len(), 9);
    assert_eq!(commands[1], "AUTH LOGIN\r\n");
    assert_eq!(commands[2], "Zm9v\r\n");
    assert_eq!(commands[3], "YmFy\r\n");
    assert_eq!(client.responses().len(), 10);
}

#[tokio::test]
async fn greeting_mismatch_reports_expected_220() {
    let server = MockServer::start(&["345 NotOK"]).await;
    let mut client = client_for(&server);

    let err = client
        .send("sender@bar.com", &one_recipient(), "x")
        .await
        .unwrap_err();

    match err {
        Error::UnexpectedReply {
            expected,
            received,
            reply,
        } => {
            assert_eq!(expected, 220);
            assert_eq!(received, 345);
            assert_eq!(reply, "345 NotOK");
        }
        other => panic!("expected UnexpectedReply, got {other:?}"),
    }

    // The transcript survives the failed call
    assert_eq!(client.responses().len(), 1);
}

#[tokio::test]
async fn ehlo_mismatch_reports_expected_250() {
    let server = MockServer::start(&["220 OK", "300 NotOK"]).await;
    let mut client = client_for(&server);

    let err = client
        .send("sender@bar.com", &one_recipient(), "x")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::UnexpectedReply {
            expected: 250,
            received: 300,
            ..
        }
    ));
}

#[tokio::test]
async fn rcpt_mismatch_aborts_before_data() {
    let server = MockServer::start(&["220 OK", "250 OK", "250 OK", "300 NotOK"]).await;
    let mut client = client_for(&server);

    let err = client
        .send("sender@bar.com", &one_recipient(), "x")
        .await
        .unwrap_err();

    match err {
        Error::UnexpectedReply {
            expected,
            received,
            reply,
        } => {
            assert_eq!(expected, 250);
            assert_eq!(received, 300);
            assert_eq!(reply, "300 NotOK");
        }
        other => panic!("expected UnexpectedReply, got {other:?}"),
    }

    // DATA and QUIT were never attempted
    assert_eq!(client.commands().last().map(String::as_str), Some("RCPT TO:<foo@bar.com>\r\n"));
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!server.received().await.iter().any(|line| line == "DATA"));
}

#[tokio::test]
async fn data_command_mismatch_reports_expected_354() {
    let server = MockServer::start(&["220 OK", "250 OK", "250 OK", "250 OK", "300 NotOK"]).await;
    let mut client = client_for(&server);

    let err = client
        .send("sender@bar.com", &one_recipient(), "x")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::UnexpectedReply {
            expected: 354,
            received: 300,
            ..
        }
    ));
}

#[tokio::test]
async fn payload_rejection_reports_expected_250() {
    let server = MockServer::start(&[
        "220 OK", "250 OK", "250 OK", "250 OK", "354 OK", "550 No",
    ])
    .await;
    let mut client = client_for(&server);

    let err = client
        .send("sender@bar.com", &one_recipient(), "x")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::UnexpectedReply {
            expected: 250,
            received: 550,
            ..
        }
    ));
}

#[tokio::test]
async fn quit_mismatch_reports_expected_221() {
    let server = MockServer::start(&[
        "220 OK", "250 OK", "250 OK", "250 OK", "354 OK", "250 OK", "300 NotOK",
    ])
    .await;
    let mut client = client_for(&server);

    let err = client
        .send("sender@bar.com", &one_recipient(), "x")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::UnexpectedReply {
            expected: 221,
            received: 300,
            ..
        }
    ));
}

#[tokio::test]
async fn auth_username_rejection_reports_expected_334() {
    let server =
        MockServer::start(&["220 OK", "250 OK", "334 VXNlcm5hbWU6", "300 NotOK"]).await;
    let mut client = client_for(&server).credentials(Credentials::new("foo", "bar"));

    let err = client
        .send("sender@bar.com", &one_recipient(), "x")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::UnexpectedReply {
            expected: 334,
            received: 300,
            ..
        }
    ));
}

#[tokio::test]
async fn auth_password_rejection_reports_expected_235() {
    let server = MockServer::start(&[
        "220 OK",
        "250 OK",
        "334 VXNlcm5hbWU6",
        "334 UGFzc3dvcmQ6",
        "300 NotOK",
    ])
    .await;
    let mut client = client_for(&server).credentials(Credentials::new("foo", "bar"));

    let err = client
        .send("sender@bar.com", &one_recipient(), "x")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::UnexpectedReply {
            expected: 235,
            received: 300,
            ..
        }
    ));
}

#[tokio::test]
async fn multi_line_ehlo_reply_counts_every_line() {
    let server = MockServer::start(&[
        "220 OK",
        "250-mock.example.com\r\n250-STARTTLS\r\n250 SIZE 10000",
        "250 OK",
        "250 OK",
        "354 OK",
        "250 OK",
        "221 OK",
    ])
    .await;
    let mut client = client_for(&server);

    let sent = client
        .send("sender@bar.com", &one_recipient(), "x")
        .await
        .unwrap();

    assert!(sent);
    assert_eq!(client.commands().len(), 6);
    // greeting + 3 EHLO lines + 5 single-line replies
    assert_eq!(client.responses().len(), 9);
}

#[tokio::test]
async fn recipients_issued_in_given_order() {
    let server = MockServer::start(&[
        "220 OK", "250 OK", "250 OK", "250 OK", "250 OK", "250 OK", "354 OK", "250 OK",
        "221 OK",
    ])
    .await;
    let mut client = client_for(&server);

    let recipients = vec![
        "to@bar.com".to_string(),
        "cc@bar.com".to_string(),
        "bcc@bar.com".to_string(),
    ];

    let sent = client
        .send("sender@bar.com", &recipients, "x")
        .await
        .unwrap();

    assert!(sent);
    let commands = client.commands();
    assert_eq!(commands.len(), 8);
    assert_eq!(commands[2], "RCPT TO:<to@bar.com>\r\n");
    assert_eq!(commands[3], "RCPT TO:<cc@bar.com>\r\n");
    assert_eq!(commands[4], "RCPT TO:<bcc@bar.com>\r\n");
}

#[tokio::test]
async fn payload_sent_verbatim_with_dot_terminator() {
    let server = MockServer::start(&SUCCESS_SCRIPT).await;
    let mut client = client_for(&server);

    client
        .send(
            "sender@bar.com",
            &one_recipient(),
            "Subject: T\r\n\r\nline one",
        )
        .await
        .unwrap();

    let received = server.received().await;
    assert!(received.iter().any(|line| line == "Subject: T"));
    assert!(received.iter().any(|line| line == "line one"));
    assert!(received.iter().any(|line| line == "."));
}

#[tokio::test]
async fn unrecognizable_response_then_eof() {
    let server = MockServer::start(&["NoValidResponse"]).await;
    let mut client = client_for(&server);

    let err = client
        .send("sender@bar.com", &one_recipient(), "x")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::NoResponse));
}

#[tokio::test]
async fn non_numeric_terminating_line_is_invalid() {
    let server = MockServer::start(&["ABC DEF"]).await;
    let mut client = client_for(&server);

    let err = client
        .send("sender@bar.com", &one_recipient(), "x")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::InvalidReply(_)));
}

#[tokio::test]
async fn silent_server_times_out_as_no_response() {
    let server = MockServer::start_holding(&["220 OK"]).await;
    let mut client = client_for(&server).response_timeout(Duration::from_millis(200));

    let err = client
        .send("sender@bar.com", &one_recipient(), "x")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::NoResponse));
}

#[tokio::test]
async fn connection_refused_is_connection_error() {
    // Grab a free port, then close the listener so nothing accepts
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let mut client = SmtpClient::new("127.0.0.1")
        .port(port)
        .connect_timeout(Duration::from_secs(2));

    let err = client
        .send("sender@bar.com", &one_recipient(), "x")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Connection { .. }));
}

#[tokio::test]
async fn starttls_rejection_reports_expected_220() {
    let server = MockServer::start(&["220 OK", "250 OK", "250 NotOK"]).await;
    let mut client = client_for(&server).security(Security::StartTls);

    let err = client
        .send("sender@bar.com", &one_recipient(), "x")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::UnexpectedReply {
            expected: 220,
            received: 250,
            ..
        }
    ));
}

#[tokio::test]
async fn transcript_covers_only_the_last_send() {
    let server = MockServer::start(&SUCCESS_SCRIPT).await;
    let mut client = client_for(&server);

    client
        .send("sender@bar.com", &one_recipient(), "x")
        .await
        .unwrap();
    client
        .send("sender@bar.com", &one_recipient(), "x")
        .await
        .unwrap();

    assert_eq!(client.commands().len(), 6);
    assert_eq!(client.responses().len(), 7);
}
