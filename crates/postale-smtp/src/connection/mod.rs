//! SMTP connection management: stream, session context, and the client.

mod client;
mod session;
mod stream;

pub use client::SmtpClient;
pub use session::Session;
pub use stream::{SmtpStream, connect, connect_tls};
