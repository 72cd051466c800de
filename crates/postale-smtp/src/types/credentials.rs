//! AUTH LOGIN credentials.

/// Username/password pair for AUTH LOGIN.
///
/// When no credentials are configured the AUTH LOGIN exchange is skipped
/// entirely; it is never attempted with empty values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Creates a new credential pair.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Returns the username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the password.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
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
    fn accessors() {
        let credentials = Credentials::new("foo", "bar");
        assert_eq!(credentials.username(), "foo");
        assert_eq!(credentials.password(), "bar");
    }
}
