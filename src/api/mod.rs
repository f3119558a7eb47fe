//! API layer: HTTP binding and call-state tracking.
//!
//! This module owns everything between the domain model and the wire. The
//! [`client`] submodule speaks the backend's REST protocol and is the single
//! place where failures are classified into the error taxonomy; the [`call`]
//! submodule tracks the loading/error state of individual bound operations.
//!
//! # Organization
//!
//! - [`client`]: Typed reqwest binding with bearer-token injection
//! - [`call`]: Per-call-site `{is_loading, error}` state machine

pub mod call;
pub mod client;

pub use call::CallState;
pub use client::ApiClient;
