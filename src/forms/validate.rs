//! Per-form validation policies.
//!
//! The validators mirror the dashboard's rules exactly, message strings
//! included: a URL must be non-empty and start with an `http://` or
//! `https://` scheme followed by anything; login requires both credential
//! fields; signup additionally requires a password of at least 8 characters.
//!
//! Validators only ever insert entries for failing fields, so the resulting
//! [`FormErrors`] map names exactly the fields that need attention.

use super::{Credentials, FormErrors, UrlFormData};

/// Minimum password length accepted at signup.
const MIN_PASSWORD_LEN: usize = 8;

/// Returns whether `address` matches `^https?://.+`.
#[must_use]
pub fn is_valid_url(address: &str) -> bool {
    address
        .strip_prefix("http://")
        .or_else(|| address.strip_prefix("https://"))
        .is_some_and(|rest| !rest.is_empty())
}

/// Validates the URL submission form.
#[must_use]
pub fn validate_url_form(values: &UrlFormData) -> FormErrors {
    let mut errors = FormErrors::new();

    if values.address.is_empty() {
        errors.insert("address".to_string(), "URL is required".to_string());
    } else if !is_valid_url(&values.address) {
        errors.insert(
            "address".to_string(),
            "Please enter a valid URL starting with http:// or https://".to_string(),
        );
    }

    errors
}

/// Validates the login form.
#[must_use]
pub fn validate_login(values: &Credentials) -> FormErrors {
    let mut errors = FormErrors::new();

    if values.username.is_empty() {
        errors.insert("username".to_string(), "Username is required".to_string());
    }
    if values.password.is_empty() {
        errors.insert("password".to_string(), "Password is required".to_string());
    }

    errors
}

/// Validates the signup form: login rules plus the minimum password length.
#[must_use]
pub fn validate_signup(values: &Credentials) -> FormErrors {
    let mut errors = validate_login(values);

    // Character count, not bytes: a multibyte password of 7 characters is
    // still too short.
    if !values.password.is_empty() && values.password.chars().count() < MIN_PASSWORD_LEN {
        errors.insert(
            "password".to_string(),
            "Password must be at least 8 characters long".to_string(),
        );
    }

    errors
}
