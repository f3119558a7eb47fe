//! Auth session lifecycle.
//!
//! This module owns the client-held credential. A [`Session`] is an
//! explicitly constructed value injected into whatever issues requests --
//! there is no ambient global. Its lifecycle is: read the persisted token
//! once at construction, mutate via [`login`](Session::login) /
//! [`logout`](Session::logout), and read via [`token`](Session::token) on
//! every outgoing request.
//!
//! There is no expiry or refresh logic: a token is trusted until the backend
//! rejects a request that used it, at which point the caller decides what to
//! do (the CLI tells the user to log in again).

pub mod store;

pub use store::{JsonTokenStore, MemoryTokenStore, TokenStore};

use crate::domain::error::Result;

/// The client's authentication credential and its persistence lifecycle.
///
/// Holds the in-memory token alongside the injected [`TokenStore`] that
/// keeps it across process restarts. One instance exists per running client.
pub struct Session {
    /// Current credential, `None` when logged out.
    token: Option<String>,

    /// Persistence backend, kept in sync with the in-memory value.
    store: Box<dyn TokenStore>,
}

impl Session {
    /// Creates a session, reading the persisted token once.
    ///
    /// # Errors
    ///
    /// Returns an error if the store exists but cannot be read.
    pub fn new(store: Box<dyn TokenStore>) -> Result<Self> {
        let token = store.load()?;
        tracing::debug!(authenticated = token.is_some(), "session initialized");
        Ok(Self { token, store })
    }

    /// Creates an unauthenticated session with no persistence.
    ///
    /// Useful for tests and for flows that never log in.
    #[must_use]
    pub fn ephemeral() -> Self {
        Self {
            token: None,
            store: Box::new(MemoryTokenStore::default()),
        }
    }

    /// Returns the current token, if authenticated.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Returns whether the session currently holds a token.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Stores a freshly issued token in memory and persists it.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting fails; the in-memory token is still
    /// set, so the current process remains authenticated.
    pub fn login(&mut self, token: String) -> Result<()> {
        let persisted = self.store.save(&token);
        // Set the in-memory token even when persisting failed, so the
        // current process stays authenticated.
        self.token = Some(token);
        persisted?;
        tracing::debug!("session logged in");
        Ok(())
    }

    /// Clears the in-memory token and removes the persisted value.
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted value cannot be removed.
    pub fn logout(&mut self) -> Result<()> {
        self.store.clear()?;
        self.token = None;
        tracing::debug!("session logged out");
        Ok(())
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print the credential itself.
        f.debug_struct("Session")
            .field("authenticated", &self.token.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::UrlscopeError;

    /// Store whose writes always fail, as if the disk were full.
    struct BrokenStore;

    impl TokenStore for BrokenStore {
        fn load(&self) -> Result<Option<String>> {
            Ok(None)
        }

        fn save(&mut self, _token: &str) -> Result<()> {
            Err(UrlscopeError::Storage("disk full".to_string()))
        }

        fn clear(&mut self) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn failed_persist_still_authenticates_the_process() {
        let mut session = Session::new(Box::new(BrokenStore)).unwrap();

        let result = session.login("tok-abc".to_string());
        assert!(matches!(result, Err(UrlscopeError::Storage(_))));

        // The error propagates, but this process keeps its credential.
        assert!(session.is_authenticated());
        assert_eq!(session.token(), Some("tok-abc"));
    }

    #[test]
    fn new_reads_persisted_token_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let mut seed = JsonTokenStore::new(path.clone()).unwrap();
        seed.save("persisted-token").unwrap();

        let session = Session::new(Box::new(JsonTokenStore::new(path).unwrap())).unwrap();
        assert_eq!(session.token(), Some("persisted-token"));
        assert!(session.is_authenticated());
    }

    #[test]
    fn login_persists_and_logout_clears() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let mut session =
            Session::new(Box::new(JsonTokenStore::new(path.clone()).unwrap())).unwrap();
        assert!(!session.is_authenticated());

        session.login("tok-abc".to_string()).unwrap();
        assert_eq!(session.token(), Some("tok-abc"));

        // The token survives a restart.
        let restarted =
            Session::new(Box::new(JsonTokenStore::new(path.clone()).unwrap())).unwrap();
        assert_eq!(restarted.token(), Some("tok-abc"));

        session.logout().unwrap();
        assert!(!session.is_authenticated());

        let after_logout = Session::new(Box::new(JsonTokenStore::new(path).unwrap())).unwrap();
        assert_eq!(after_logout.token(), None);
    }

    #[test]
    fn debug_hides_credential() {
        let mut session = Session::ephemeral();
        session.login("super-secret".to_string()).unwrap();
        let printed = format!("{session:?}");
        assert!(!printed.contains("super-secret"));
    }
}
