/// A username/password pair as typed at the login prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Decides whether a teller may open a session. Kept apart from the ledger.
pub trait Authenticator: Send + Sync {
    fn authenticate(&self, credentials: &Credentials) -> bool;
}

/// Accepts exactly one configured username/password pair.
#[derive(Debug, Clone)]
pub struct StaticAuthenticator {
    expected: Credentials,
}

impl StaticAuthenticator {
    pub const DEFAULT_USERNAME: &'static str = "user";
    pub const DEFAULT_PASSWORD: &'static str = "pass";

    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            expected: Credentials::new(username, password),
        }
    }
}

impl Default for StaticAuthenticator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_USERNAME, Self::DEFAULT_PASSWORD)
    }
}

impl Authenticator for StaticAuthenticator {
    fn authenticate(&self, credentials: &Credentials) -> bool {
        credentials == &self.expected
    }
}
