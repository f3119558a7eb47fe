//! Crawl result domain model.
//!
//! This module defines the types the backend reports for each analyzed URL:
//! the [`UrlRecord`] with its crawl status and computed metrics, the broken
//! link detail rows, and the [`Page`] envelope returned by list queries. All
//! fields are server-authoritative; the client only ever reads and
//! re-requests them, never computes them locally.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of seconds in one minute.
const SECONDS_PER_MINUTE: i64 = 60;

/// Number of seconds in one hour.
const SECONDS_PER_HOUR: i64 = 3600;

/// Number of seconds in one day.
const SECONDS_PER_DAY: i64 = 86400;

/// Lifecycle state of a crawl, assigned and advanced by the backend.
///
/// A record is created as `Queued`, transitions through `Running`, and
/// finishes as `Done` or `Error`. The client never moves a record between
/// states; it only observes them between fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrawlStatus {
    /// Accepted by the backend, waiting for a crawler slot.
    Queued,
    /// A crawler is currently fetching and analyzing the page.
    Running,
    /// Analysis finished successfully; metric fields are final.
    Done,
    /// The crawl failed; the record's `error` field holds the reason.
    Error,
}

impl CrawlStatus {
    /// Returns the lowercase wire/display label for this status.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Running => "running",
            Self::Done => "done",
            Self::Error => "error",
        }
    }
}

/// One broken link found on an analyzed page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokenLink {
    /// Target URL of the broken link.
    pub url: String,

    /// HTTP status or error code the crawler observed for the target.
    pub code: String,

    /// Link classification (e.g. internal/external), when the backend
    /// reports one.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// One crawled URL's result, including crawl status and computed metrics.
///
/// Field names follow the backend's JSON wire format. `error` is only
/// populated when `status` is [`CrawlStatus::Error`]; the backend sends an
/// empty string otherwise, and older records may omit it entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlRecord {
    /// Server-assigned identity, immutable for the record's lifetime.
    pub id: i64,

    /// The submitted URL, immutable after creation.
    pub address: String,

    /// Page title extracted by the crawler.
    #[serde(default)]
    pub title: String,

    /// Detected HTML version (e.g. "HTML5").
    #[serde(default)]
    pub html_version: String,

    /// Count of headings per tag name (`h1` through `h6`).
    #[serde(default)]
    pub heading_counts: BTreeMap<String, u32>,

    /// Number of links pointing within the crawled site.
    #[serde(default)]
    pub internal_links: u32,

    /// Number of links pointing to other sites.
    #[serde(default)]
    pub external_links: u32,

    /// Number of links that failed to resolve.
    #[serde(default)]
    pub broken_links: u32,

    /// Detail rows for each broken link, in crawl order.
    #[serde(default)]
    pub broken_list: Vec<BrokenLink>,

    /// Whether the page contains a login form.
    #[serde(default)]
    pub has_login_form: bool,

    /// Current lifecycle state of the crawl.
    pub status: CrawlStatus,

    /// Failure reason, empty unless `status` is `error`.
    #[serde(default)]
    pub error: String,

    /// When the record was created (URL submitted).
    pub created_at: chrono::DateTime<chrono::Utc>,

    /// When the backend last touched the record.
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl UrlRecord {
    /// Returns a human-readable string describing how long ago the record
    /// was last updated by the backend.
    ///
    /// The format varies based on the time elapsed:
    /// - Less than 1 minute: "just now"
    /// - Less than 1 hour: "Xm ago"
    /// - Less than 1 day: "Xh ago"
    /// - 1 day or more: "Xd ago"
    #[must_use]
    pub fn updated_ago(&self) -> String {
        let now = chrono::Utc::now().timestamp();
        let diff = now - self.updated_at.timestamp();

        if diff < SECONDS_PER_MINUTE {
            "just now".to_string()
        } else if diff < SECONDS_PER_HOUR {
            let mins = diff / SECONDS_PER_MINUTE;
            format!("{mins}m ago")
        } else if diff < SECONDS_PER_DAY {
            let hours = diff / SECONDS_PER_HOUR;
            format!("{hours}h ago")
        } else {
            let days = diff / SECONDS_PER_DAY;
            format!("{days}d ago")
        }
    }
}

/// One page of list-query results, replaced wholesale on every fetch.
///
/// There is no incremental merge: whatever the backend returns for the
/// requested page becomes the displayed list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Records for the requested page, in backend order.
    pub data: Vec<UrlRecord>,

    /// 1-based page number this envelope covers.
    pub page: u64,

    /// Requested page size.
    pub size: u64,

    /// Total record count across all pages for the current query.
    pub total: u64,
}

impl Page {
    /// Returns the number of pages needed to show `total` records at the
    /// envelope's page size. At least 1, so an empty result still renders
    /// as "Page 1 of 1".
    #[must_use]
    pub fn total_pages(&self) -> u64 {
        total_pages(self.total, self.size)
    }
}

/// Computes `ceil(total / size)`, clamped to a minimum of one page.
#[must_use]
pub fn total_pages(total: u64, size: u64) -> u64 {
    if size == 0 {
        return 1;
    }
    total.div_ceil(size).max(1)
}

/// A batched mutation applied to a set of selected records in one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BulkAction {
    /// Queue the selected URLs for a fresh crawl.
    Rerun,
    /// Delete the selected records.
    Delete,
}

impl BulkAction {
    /// Returns the lowercase wire label for this action.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Rerun => "rerun",
            Self::Delete => "delete",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "id": 1,
        "address": "https://example.com",
        "title": "Example Domain",
        "html_version": "HTML5",
        "heading_counts": {"h1": 1, "h2": 3},
        "internal_links": 4,
        "external_links": 2,
        "broken_links": 1,
        "broken_list": [{"url": "https://example.com/404", "code": "404", "type": "internal"}],
        "has_login_form": false,
        "status": "done",
        "error": "",
        "created_at": "2024-05-01T12:00:00Z",
        "updated_at": "2024-05-01T12:00:05Z"
    }"#;

    #[test]
    fn parses_wire_record() {
        let record: UrlRecord = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(record.id, 1);
        assert_eq!(record.status, CrawlStatus::Done);
        assert_eq!(record.heading_counts.get("h2"), Some(&3));
        assert_eq!(record.broken_list[0].kind.as_deref(), Some("internal"));
        assert_eq!(record.broken_list[0].code, "404");
    }

    #[test]
    fn missing_optional_fields_default() {
        let minimal = r#"{
            "id": 7,
            "address": "https://example.org",
            "status": "queued",
            "created_at": "2024-05-01T12:00:00Z",
            "updated_at": "2024-05-01T12:00:00Z"
        }"#;
        let record: UrlRecord = serde_json::from_str(minimal).unwrap();
        assert_eq!(record.status, CrawlStatus::Queued);
        assert!(record.error.is_empty());
        assert!(record.broken_list.is_empty());
        assert!(!record.has_login_form);
    }

    #[test]
    fn status_round_trips_lowercase() {
        assert_eq!(serde_json::to_string(&CrawlStatus::Running).unwrap(), "\"running\"");
        let status: CrawlStatus = serde_json::from_str("\"error\"").unwrap();
        assert_eq!(status, CrawlStatus::Error);
    }

    #[test]
    fn page_math() {
        assert_eq!(total_pages(20, 10), 2);
        assert_eq!(total_pages(21, 10), 3);
        assert_eq!(total_pages(0, 10), 1);
        assert_eq!(total_pages(5, 0), 1);
    }

    #[test]
    fn bulk_action_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&BulkAction::Rerun).unwrap(), "\"rerun\"");
        assert_eq!(BulkAction::Delete.label(), "delete");
    }
}
