//! Domain layer for the urlscope client.
//!
//! This module contains the core domain types for the client, independent of
//! HTTP or persistence concerns: the crawl result model the backend reports,
//! and the error taxonomy everything else propagates.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`record`]: Crawl result model and page envelope

pub mod error;
pub mod record;

pub use error::{Result, UrlscopeError, UNEXPECTED_ERROR};
pub use record::{total_pages, BrokenLink, BulkAction, CrawlStatus, Page, UrlRecord};
