//! Application layer: list state machine and dashboard controller.
//!
//! This layer sits between the consumers (the CLI, or any other front end)
//! and the API/session layers. It follows a unidirectional flow:
//!
//! ```text
//! Trigger (page/query changed, mutation completed)
//!     → ListState transition → FetchSpec
//!     → Dashboard issues the fetch
//!     → completion applied under its generation (stale ones discarded)
//! ```
//!
//! # Modules
//!
//! - [`state`]: Pure list/query/selection state machine
//! - [`dashboard`]: Effectful controller wiring client + session + state

pub mod dashboard;
pub mod state;

pub use dashboard::Dashboard;
pub use state::{FetchSpec, ListPhase, ListState};
