//! List/query state machine for the URL collection.
//!
//! This module defines [`ListState`], the single source of truth for what
//! the list view displays and fetches: the current page of records, the
//! pagination cursor, the free-text filter and the multi-row selection set.
//!
//! # State machine
//!
//! The list is always in one of four phases -- `Idle`, `Fetching`, `Loaded`,
//! `Failed` -- and only three triggers start a fetch: the page changed, the
//! query changed, or a mutation (add / bulk action) completed. Each trigger
//! produces exactly one [`FetchSpec`] describing the request to issue; the
//! state itself never touches the network, which keeps the transitions pure
//! and the effects explicit.
//!
//! # Fetch generations
//!
//! Every `FetchSpec` carries a generation from a monotonically increasing
//! counter. A completion is applied only if its generation is still current,
//! so a late-arriving response for a superseded request is discarded instead
//! of clobbering newer data.

use crate::domain::record::{total_pages, Page, UrlRecord};
use std::collections::HashSet;

/// Phase of the list with respect to its backing fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListPhase {
    /// No fetch has been issued yet.
    Idle,
    /// A fetch is in flight for the current generation.
    Fetching,
    /// The last fetch completed and `items`/`total` reflect it.
    Loaded,
    /// The last fetch failed; `items`/`total` still hold the previous
    /// successful load.
    Failed,
}

/// Description of one fetch to issue, produced by a state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSpec {
    /// 1-based page to request.
    pub page: u64,

    /// Page size to request.
    pub size: u64,

    /// Trimmed search query; `None` when blank, in which case the request
    /// omits the parameter entirely.
    pub query: Option<String>,

    /// Generation identifying this fetch for staleness checks.
    pub generation: u64,
}

/// State container for the paged, searchable, selectable URL list.
#[derive(Debug, Clone)]
pub struct ListState {
    /// Records of the most recent successful load, in backend order.
    items: Vec<UrlRecord>,

    /// Total record count across all pages for the current query.
    total: u64,

    /// Current 1-based page.
    page: u64,

    /// Page size, fixed for the session.
    size: u64,

    /// Free-text filter; empty means no filter.
    search_query: String,

    /// Ids currently selected for bulk actions.
    ///
    /// Cleared after a successful bulk action. Deliberately not pruned on
    /// page navigation, matching the original dashboard's behavior.
    selected_ids: HashSet<i64>,

    /// Current fetch phase.
    phase: ListPhase,

    /// Generation of the most recently issued fetch.
    generation: u64,

    /// Message of the most recent failed fetch, if the list is `Failed`.
    error: Option<String>,
}

impl ListState {
    /// Creates an idle list with the given page size.
    #[must_use]
    pub fn new(size: u64) -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page: 1,
            size: size.max(1),
            search_query: String::new(),
            selected_ids: HashSet::new(),
            phase: ListPhase::Idle,
            generation: 0,
            error: None,
        }
    }

    /// Returns the records of the most recent successful load.
    #[must_use]
    pub fn items(&self) -> &[UrlRecord] {
        &self.items
    }

    /// Returns the total record count for the current query.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Returns the current 1-based page.
    #[must_use]
    pub fn page(&self) -> u64 {
        self.page
    }

    /// Returns the session's page size.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Returns the current search query (possibly empty).
    #[must_use]
    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// Returns the current fetch phase.
    #[must_use]
    pub fn phase(&self) -> ListPhase {
        self.phase
    }

    /// Returns the most recent fetch failure message, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Returns the number of pages for the current total and size.
    #[must_use]
    pub fn total_pages(&self) -> u64 {
        total_pages(self.total, self.size)
    }

    /// Returns whether a previous page exists.
    #[must_use]
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    /// Returns whether a next page exists.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    /// Starts a fetch for the current page/query.
    ///
    /// This is the "mutation completed" trigger (and the initial load):
    /// after an add or bulk action the list is re-fetched unconditionally so
    /// that server-assigned fields are authoritative before display.
    pub fn refresh(&mut self) -> FetchSpec {
        self.begin_fetch()
    }

    /// Moves to another page.
    ///
    /// Returns the single fetch to issue, or `None` if `page` is already
    /// current (no transition, no fetch). Pages are clamped to 1-based.
    pub fn set_page(&mut self, page: u64) -> Option<FetchSpec> {
        let page = page.max(1);
        if page == self.page {
            return None;
        }
        self.page = page;
        Some(self.begin_fetch())
    }

    /// Replaces the search query.
    ///
    /// A changed query always resets the page to 1 before fetching, so a
    /// narrowed result set cannot leave the cursor on a stale out-of-range
    /// page. Returns `None` when the query is unchanged.
    pub fn set_search_query(&mut self, query: impl Into<String>) -> Option<FetchSpec> {
        let query = query.into();
        if query == self.search_query {
            return None;
        }
        self.search_query = query;
        self.page = 1;
        Some(self.begin_fetch())
    }

    /// Applies a completed fetch.
    ///
    /// Returns `false` (and changes nothing) when `generation` is no longer
    /// current, i.e. the response belongs to a superseded request.
    pub fn apply_page(&mut self, generation: u64, page: Page) -> bool {
        if generation != self.generation {
            tracing::debug!(
                stale = generation,
                current = self.generation,
                "discarding stale fetch result"
            );
            return false;
        }

        self.total = page.total;
        self.items = page.data;
        self.phase = ListPhase::Loaded;
        self.error = None;

        tracing::debug!(
            items = self.items.len(),
            total = self.total,
            page = self.page,
            "list loaded"
        );
        true
    }

    /// Applies a failed fetch.
    ///
    /// Stale failures are discarded like stale successes. A current failure
    /// moves the list to `Failed` but leaves `items`/`total` from the
    /// previous successful load untouched.
    pub fn apply_error(&mut self, generation: u64, message: impl Into<String>) -> bool {
        if generation != self.generation {
            tracing::debug!(
                stale = generation,
                current = self.generation,
                "discarding stale fetch error"
            );
            return false;
        }

        self.phase = ListPhase::Failed;
        self.error = Some(message.into());
        true
    }

    /// Returns whether the given id is selected.
    #[must_use]
    pub fn is_selected(&self, id: i64) -> bool {
        self.selected_ids.contains(&id)
    }

    /// Returns whether any rows are selected.
    #[must_use]
    pub fn has_selection(&self) -> bool {
        !self.selected_ids.is_empty()
    }

    /// Returns the selected ids in ascending order.
    #[must_use]
    pub fn selected_ids(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = self.selected_ids.iter().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Adds or removes a single id from the selection.
    pub fn toggle_selection(&mut self, id: i64) {
        if !self.selected_ids.remove(&id) {
            self.selected_ids.insert(id);
        }
    }

    /// Selects every row on the currently loaded page.
    ///
    /// Covers the loaded page only, not all pages of the result set.
    pub fn select_all(&mut self) {
        self.selected_ids = self.items.iter().map(|record| record.id).collect();
    }

    /// Clears the selection.
    pub fn clear_selection(&mut self) {
        self.selected_ids.clear();
    }

    /// Advances the generation and enters the `Fetching` phase.
    fn begin_fetch(&mut self) -> FetchSpec {
        self.generation += 1;
        self.phase = ListPhase::Fetching;

        let query = {
            let trimmed = self.search_query.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        };

        let spec = FetchSpec {
            page: self.page,
            size: self.size,
            query,
            generation: self.generation,
        };

        tracing::debug!(
            page = spec.page,
            query = spec.query.as_deref().unwrap_or(""),
            generation = spec.generation,
            "fetch started"
        );
        spec
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::CrawlStatus;
    use std::collections::BTreeMap;

    fn record(id: i64) -> UrlRecord {
        let now = chrono::Utc::now();
        UrlRecord {
            id,
            address: format!("https://example.com/{id}"),
            title: String::new(),
            html_version: String::new(),
            heading_counts: BTreeMap::new(),
            internal_links: 0,
            external_links: 0,
            broken_links: 0,
            broken_list: Vec::new(),
            has_login_form: false,
            status: CrawlStatus::Queued,
            error: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    fn page_of(ids: &[i64], page: u64, size: u64, total: u64) -> Page {
        Page {
            data: ids.iter().copied().map(record).collect(),
            page,
            size,
            total,
        }
    }

    #[test]
    fn query_change_resets_page_and_issues_one_fetch() {
        let mut list = ListState::new(10);
        list.set_page(3);

        let spec = list.set_search_query("example").expect("fetch expected");
        assert_eq!(spec.page, 1);
        assert_eq!(list.page(), 1);
        assert_eq!(spec.query.as_deref(), Some("example"));

        // Same query again: no transition, no fetch.
        assert!(list.set_search_query("example").is_none());
    }

    #[test]
    fn blank_query_is_omitted_from_the_spec() {
        let mut list = ListState::new(10);
        let spec = list.set_search_query("   ").expect("query changed");
        assert_eq!(spec.query, None);
    }

    #[test]
    fn same_page_is_a_noop() {
        let mut list = ListState::new(10);
        assert!(list.set_page(1).is_none());
        assert!(list.set_page(2).is_some());
        assert!(list.set_page(2).is_none());
    }

    #[test]
    fn stale_completion_is_discarded() {
        let mut list = ListState::new(10);
        let first = list.set_page(2).unwrap();
        let second = list.set_search_query("x").unwrap();

        // The older request resolves after the newer one was issued.
        assert!(!list.apply_page(first.generation, page_of(&[1, 2], 2, 10, 20)));
        assert!(list.items().is_empty());

        assert!(list.apply_page(second.generation, page_of(&[3], 1, 10, 1)));
        assert_eq!(list.items().len(), 1);
        assert_eq!(list.phase(), ListPhase::Loaded);
    }

    #[test]
    fn failed_fetch_keeps_previous_items() {
        let mut list = ListState::new(10);
        let spec = list.refresh();
        assert!(list.apply_page(spec.generation, page_of(&[1, 2], 1, 10, 2)));

        let retry = list.refresh();
        assert!(list.apply_error(retry.generation, "connection refused"));
        assert_eq!(list.phase(), ListPhase::Failed);
        assert_eq!(list.error(), Some("connection refused"));
        assert_eq!(list.items().len(), 2);
        assert_eq!(list.total(), 2);
    }

    #[test]
    fn stale_error_is_discarded() {
        let mut list = ListState::new(10);
        let old = list.refresh();
        let new = list.refresh();
        assert!(!list.apply_error(old.generation, "late failure"));
        assert_eq!(list.phase(), ListPhase::Fetching);
        assert!(list.apply_error(new.generation, "real failure"));
    }

    #[test]
    fn pagination_of_two_pages() {
        let mut list = ListState::new(10);
        let spec = list.set_page(2).unwrap();
        list.apply_page(spec.generation, page_of(&[11, 12], 2, 10, 20));

        assert_eq!(list.total_pages(), 2);
        assert!(list.has_prev());
        assert!(!list.has_next());
        assert_eq!(format!("Page {} of {}", list.page(), list.total_pages()), "Page 2 of 2");
    }

    #[test]
    fn select_all_covers_loaded_page_then_toggle_removes() {
        let mut list = ListState::new(10);
        let spec = list.refresh();
        list.apply_page(spec.generation, page_of(&[1, 2], 1, 10, 2));

        list.select_all();
        assert_eq!(list.selected_ids(), vec![1, 2]);

        list.toggle_selection(1);
        assert_eq!(list.selected_ids(), vec![2]);

        list.toggle_selection(1);
        assert_eq!(list.selected_ids(), vec![1, 2]);

        list.clear_selection();
        assert!(!list.has_selection());
    }

    #[test]
    fn selection_survives_page_navigation() {
        // Documented original behavior: navigation does not prune selection.
        let mut list = ListState::new(10);
        let spec = list.refresh();
        list.apply_page(spec.generation, page_of(&[1, 2], 1, 10, 12));
        list.select_all();

        let next = list.set_page(2).unwrap();
        list.apply_page(next.generation, page_of(&[11, 12], 2, 10, 12));
        assert_eq!(list.selected_ids(), vec![1, 2]);
    }
}
