//! Per-call-site async call state.
//!
//! [`CallState`] tracks the in-flight/error state of one bound operation:
//! whatever issues an API call owns a `CallState` and drives it through
//! [`run`](CallState::run). Each call site gets its own instance, so a list
//! fetch, an add and a bulk action cannot clobber each other's loading flags.
//!
//! Invariants:
//!
//! - `is_loading` transitions `false → true → false` around every
//!   invocation, and `error` is cleared when a new invocation starts.
//! - On failure the flat error message is captured for display *and* the
//!   error is re-raised, so callers must not assume silent failure.
//! - `run` borrows the state mutably across the await, so two invocations of
//!   the same call site cannot overlap and race on the shared pair.

use crate::domain::error::{Result, UrlscopeError};
use std::future::Future;

/// Loading/error state for the most recent invocation of one operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallState {
    is_loading: bool,
    error: Option<String>,
}

impl CallState {
    /// Creates an idle call state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether an invocation is currently in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Returns the display message of the most recent failure, if the last
    /// invocation failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Clears loading and error state without running anything.
    pub fn reset(&mut self) {
        self.is_loading = false;
        self.error = None;
    }

    /// Runs one async operation, tracking its state.
    ///
    /// Sets `is_loading` and clears any prior error before awaiting; on
    /// completion records the outcome and hands the result back to the
    /// caller unchanged.
    ///
    /// # Errors
    ///
    /// Re-raises the operation's error after capturing its message.
    pub async fn run<R, F>(&mut self, operation: F) -> Result<R>
    where
        F: Future<Output = Result<R>>,
    {
        self.begin();
        let result = operation.await;
        self.finish(result)
    }

    /// Like [`run`](CallState::run), with success/error hooks.
    ///
    /// `on_success` observes the value before it is returned; `on_error`
    /// observes the error before it is re-raised. Mirrors the optional
    /// callbacks the dashboard attached to its bound operations.
    ///
    /// # Errors
    ///
    /// Re-raises the operation's error after invoking `on_error`.
    pub async fn run_with<R, F>(
        &mut self,
        operation: F,
        on_success: impl FnOnce(&R),
        on_error: impl FnOnce(&UrlscopeError),
    ) -> Result<R>
    where
        F: Future<Output = Result<R>>,
    {
        self.begin();
        let result = operation.await;
        match &result {
            Ok(value) => on_success(value),
            Err(error) => on_error(error),
        }
        self.finish(result)
    }

    /// Marks the start of an invocation.
    fn begin(&mut self) {
        self.is_loading = true;
        self.error = None;
    }

    /// Records an invocation's outcome and passes the result through.
    fn finish<R>(&mut self, result: Result<R>) -> Result<R> {
        self.is_loading = false;
        if let Err(error) = &result {
            let message = error.message();
            tracing::debug!(error = %message, "call failed");
            self.error = Some(message);
        } else {
            self.error = None;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn successful_call_ends_idle_without_error() {
        let mut call = CallState::new();
        let value = call.run(async { Ok(42) }).await.unwrap();
        assert_eq!(value, 42);
        assert!(!call.is_loading());
        assert_eq!(call.error(), None);
    }

    #[tokio::test]
    async fn failing_call_captures_message_and_reraises() {
        let mut call = CallState::new();
        let result: Result<()> = call
            .run(async {
                Err(UrlscopeError::Transport {
                    message: "connection refused".to_string(),
                })
            })
            .await;
        assert!(result.is_err());
        assert!(!call.is_loading());
        assert_eq!(call.error(), Some("connection refused"));
    }

    #[tokio::test]
    async fn new_invocation_clears_previous_error() {
        let mut call = CallState::new();
        let _: Result<()> = call
            .run(async { Err(UrlscopeError::Storage("boom".to_string())) })
            .await;
        assert!(call.error().is_some());

        call.run(async { Ok(()) }).await.unwrap();
        assert_eq!(call.error(), None);
    }

    #[tokio::test]
    async fn loading_is_set_while_in_flight() {
        // The operation itself observes the loading flag via a probe taken
        // before the await point.
        let mut call = CallState::new();
        call.begin();
        assert!(call.is_loading());
        let result = call.finish(Ok(()));
        assert!(result.is_ok());
        assert!(!call.is_loading());
    }

    #[tokio::test]
    async fn hooks_fire_on_the_matching_outcome() {
        let mut call = CallState::new();
        let mut succeeded = false;
        call.run_with(async { Ok(7) }, |v| succeeded = *v == 7, |_| {})
            .await
            .unwrap();
        assert!(succeeded);

        let mut observed = None;
        let result: Result<i32> = call
            .run_with(
                async { Err(UrlscopeError::unexpected()) },
                |_| {},
                |e| observed = Some(e.message()),
            )
            .await;
        assert!(result.is_err());
        assert_eq!(observed.as_deref(), Some(crate::domain::UNEXPECTED_ERROR));
    }

    #[test]
    fn reset_returns_to_idle() {
        let mut call = CallState::new();
        call.begin();
        call.reset();
        assert!(!call.is_loading());
        assert_eq!(call.error(), None);
    }
}
