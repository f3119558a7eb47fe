//! Form state and validation engine.
//!
//! This module defines [`Form<T>`], a generic controlled-field state holder
//! with pluggable per-submission validation, plus the concrete field-value
//! types and validators for the three forms the client has (URL submission,
//! login, signup).
//!
//! The engine enforces the submission contract the original dashboard had:
//! validation runs before the submit callback, a failing validation blocks
//! submission entirely (nothing reaches the network layer), and
//! `is_submitting` is always reset when the callback completes, whether it
//! succeeded or failed.

pub mod validate;

pub use validate::{validate_login, validate_signup, validate_url_form};

use crate::domain::error::Result;
use std::collections::BTreeMap;
use std::future::Future;

/// Field-keyed validation messages. Empty means the values are valid.
pub type FormErrors = BTreeMap<String, String>;

/// Per-submission validation function for a field-value record type.
pub type Validator<T> = fn(&T) -> FormErrors;

/// Login/signup credential fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// URL submission form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlFormData {
    pub address: String,
}

/// Generic controlled-form state holder.
///
/// Owns the current `values`, field-keyed `errors` and the `is_submitting`
/// flag. Mutations go through [`set_field`](Form::set_field) so that editing
/// a field clears only that field's error, and submissions go through
/// [`handle_submit`](Form::handle_submit) so validation gating and the
/// `is_submitting` lifecycle cannot be bypassed.
#[derive(Debug, Clone)]
pub struct Form<T: Clone> {
    /// Values to restore on [`reset`](Form::reset).
    initial: T,

    /// Current field values.
    values: T,

    /// Field-keyed error messages from the last validation or
    /// [`set_error`](Form::set_error).
    errors: FormErrors,

    /// Whether a submit callback is currently running.
    is_submitting: bool,

    /// Validation run on every submission attempt, if configured.
    validate: Option<Validator<T>>,
}

impl<T: Clone> Form<T> {
    /// Creates a form without validation.
    #[must_use]
    pub fn new(initial: T) -> Self {
        Self {
            values: initial.clone(),
            initial,
            errors: FormErrors::new(),
            is_submitting: false,
            validate: None,
        }
    }

    /// Creates a form whose submissions are gated by `validate`.
    #[must_use]
    pub fn with_validator(initial: T, validate: Validator<T>) -> Self {
        Self {
            validate: Some(validate),
            ..Self::new(initial)
        }
    }

    /// Returns the current field values.
    #[must_use]
    pub fn values(&self) -> &T {
        &self.values
    }

    /// Returns all current field errors.
    #[must_use]
    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    /// Returns the error message for one field, if set.
    #[must_use]
    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    /// Returns whether a submit callback is currently running.
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    /// Edits one field's value.
    ///
    /// `apply` mutates the value record; `field` names the edited field so
    /// that a stale error on it is cleared. Errors on other fields persist
    /// until the next submission attempt.
    pub fn set_field(&mut self, field: &str, apply: impl FnOnce(&mut T)) {
        apply(&mut self.values);
        if self.errors.contains_key(field) {
            self.errors.remove(field);
        }
    }

    /// Sets an error message on a field directly.
    ///
    /// Used for request-level failures surfaced against a form (the
    /// original's "general" banner beneath the login button).
    pub fn set_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.insert(field.into(), message.into());
    }

    /// Attempts a submission.
    ///
    /// Runs the configured validator first; if any field fails, the errors
    /// are surfaced, `submit` is never invoked, and `Ok(None)` is returned.
    /// Otherwise `submit` runs with a snapshot of the current values and its
    /// result is returned as `Ok(Some(_))` or the error itself.
    /// `is_submitting` is set for exactly the duration of the callback and
    /// reset on both outcomes.
    ///
    /// # Errors
    ///
    /// Re-raises whatever the submit callback returned.
    pub async fn handle_submit<R, F, Fut>(&mut self, submit: F) -> Result<Option<R>>
    where
        F: FnOnce(T) -> Fut,
        Fut: Future<Output = Result<R>>,
    {
        if let Some(validate) = self.validate {
            let errors = validate(&self.values);
            if !errors.is_empty() {
                tracing::debug!(failing_fields = errors.len(), "submission blocked");
                self.errors = errors;
                return Ok(None);
            }
            self.errors = errors;
        }

        self.is_submitting = true;
        let result = submit(self.values.clone()).await;
        self.is_submitting = false;

        result.map(Some)
    }

    /// Restores the initial values and clears errors and submission state.
    pub fn reset(&mut self) {
        self.values = self.initial.clone();
        self.errors.clear();
        self.is_submitting = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::UrlscopeError;

    #[tokio::test]
    async fn invalid_values_block_the_submit_callback() {
        let mut form = Form::with_validator(UrlFormData::default(), validate_url_form);
        let mut called = false;

        let result = form
            .handle_submit(|_| {
                called = true;
                async { Ok(()) }
            })
            .await
            .unwrap();

        assert!(result.is_none());
        assert!(!called);
        assert_eq!(form.error("address"), Some("URL is required"));
        assert!(!form.is_submitting());
    }

    #[tokio::test]
    async fn malformed_url_gets_the_scheme_message() {
        let mut form = Form::with_validator(
            UrlFormData {
                address: "not-a-url".to_string(),
            },
            validate_url_form,
        );

        let result = form.handle_submit(|_| async { Ok(()) }).await.unwrap();
        assert!(result.is_none());
        assert_eq!(
            form.error("address"),
            Some("Please enter a valid URL starting with http:// or https://")
        );
    }

    #[tokio::test]
    async fn empty_login_populates_exactly_the_failing_fields() {
        let mut form = Form::with_validator(Credentials::default(), validate_login);
        let result = form.handle_submit(|_| async { Ok(()) }).await.unwrap();

        assert!(result.is_none());
        assert_eq!(form.errors().len(), 2);
        assert_eq!(form.error("username"), Some("Username is required"));
        assert_eq!(form.error("password"), Some("Password is required"));
    }

    #[tokio::test]
    async fn valid_values_reach_the_callback_with_a_snapshot() {
        let mut form = Form::with_validator(
            UrlFormData {
                address: "https://example.com".to_string(),
            },
            validate_url_form,
        );

        let result = form
            .handle_submit(|values| async move { Ok(values.address) })
            .await
            .unwrap();

        assert_eq!(result.as_deref(), Some("https://example.com"));
        assert!(form.errors().is_empty());
        assert!(!form.is_submitting());
    }

    #[tokio::test]
    async fn is_submitting_resets_when_the_callback_fails() {
        let mut form = Form::with_validator(
            Credentials {
                username: "alice".to_string(),
                password: "hunter2".to_string(),
            },
            validate_login,
        );

        let result: Result<Option<()>> = form
            .handle_submit(|_| async {
                Err(UrlscopeError::Api {
                    message: "invalid credentials".to_string(),
                    code: None,
                    field: None,
                    status: Some(401),
                })
            })
            .await;

        assert!(result.is_err());
        assert!(!form.is_submitting());
    }

    #[test]
    fn editing_a_field_clears_only_its_error() {
        let mut form = Form::with_validator(Credentials::default(), validate_login);
        form.set_error("username", "Username is required");
        form.set_error("password", "Password is required");

        form.set_field("username", |v| v.username = "alice".to_string());

        assert_eq!(form.error("username"), None);
        assert_eq!(form.error("password"), Some("Password is required"));
        assert_eq!(form.values().username, "alice");
    }

    #[test]
    fn reset_restores_initial_values_and_clears_errors() {
        let mut form = Form::with_validator(UrlFormData::default(), validate_url_form);
        form.set_field("address", |v| v.address = "https://example.com".to_string());
        form.set_error("general", "something went wrong");

        form.reset();

        assert_eq!(form.values().address, "");
        assert!(form.errors().is_empty());
        assert!(!form.is_submitting());
    }
}
