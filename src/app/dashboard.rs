//! Dashboard controller coordinating the client, session and list state.
//!
//! [`Dashboard`] is the effectful counterpart of [`ListState`]: transitions
//! on the pure state machine produce [`FetchSpec`]s, and the controller is
//! what actually issues them against the backend and feeds the completions
//! back (with their generation, so stale responses are dropped).
//!
//! It also owns the mutation flows the original dashboard page had:
//!
//! - **Add URL**: submit, then unconditionally re-fetch the current
//!   page/query. No optimistic insert -- the server-assigned `id` and
//!   `status` are authoritative before anything is displayed.
//! - **Bulk rerun/delete**: no-op on an empty selection; on success clear
//!   the selection and re-fetch once; on failure leave the prior list state
//!   untouched.
//!
//! Each operation owns a separate [`CallState`], so an in-flight add cannot
//! clobber the loading/error pair of the list fetch or of a bulk action.

use crate::api::{ApiClient, CallState};
use crate::app::state::{FetchSpec, ListState};
use crate::domain::error::Result;
use crate::domain::record::{BulkAction, UrlRecord};
use crate::session::Session;

/// Controller wiring the API client and session into the list state machine.
pub struct Dashboard {
    /// HTTP binding shared by all operations.
    client: ApiClient,

    /// Injected auth session, read on every outgoing request.
    session: Session,

    /// The paged/searchable/selectable list state.
    list: ListState,

    /// Call state of the list fetch operation.
    load_call: CallState,

    /// Call state of the add-URL operation.
    add_call: CallState,

    /// Call state of the bulk-action operation.
    bulk_call: CallState,
}

impl Dashboard {
    /// Creates a dashboard over the given client and session.
    #[must_use]
    pub fn new(client: ApiClient, session: Session, page_size: u64) -> Self {
        Self {
            client,
            session,
            list: ListState::new(page_size),
            load_call: CallState::new(),
            add_call: CallState::new(),
            bulk_call: CallState::new(),
        }
    }

    /// Returns the list state for display.
    #[must_use]
    pub fn list(&self) -> &ListState {
        &self.list
    }

    /// Returns mutable access to the list state for selection edits.
    pub fn list_mut(&mut self) -> &mut ListState {
        &mut self.list
    }

    /// Returns the session in use.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Returns the call state of the list fetch.
    #[must_use]
    pub fn load_call(&self) -> &CallState {
        &self.load_call
    }

    /// Returns the call state of the add-URL operation.
    #[must_use]
    pub fn add_call(&self) -> &CallState {
        &self.add_call
    }

    /// Returns the call state of the bulk-action operation.
    #[must_use]
    pub fn bulk_call(&self) -> &CallState {
        &self.bulk_call
    }

    /// Loads (or reloads) the current page/query.
    ///
    /// # Errors
    ///
    /// Propagates the fetch failure after recording it in the list state.
    pub async fn load(&mut self) -> Result<()> {
        let spec = self.list.refresh();
        self.run_fetch(spec).await
    }

    /// Moves to another page, fetching it if the page actually changed.
    ///
    /// # Errors
    ///
    /// Propagates the fetch failure after recording it in the list state.
    pub async fn set_page(&mut self, page: u64) -> Result<()> {
        match self.list.set_page(page) {
            Some(spec) => self.run_fetch(spec).await,
            None => Ok(()),
        }
    }

    /// Replaces the search query, fetching page 1 if the query changed.
    ///
    /// # Errors
    ///
    /// Propagates the fetch failure after recording it in the list state.
    pub async fn set_search_query(&mut self, query: impl Into<String>) -> Result<()> {
        match self.list.set_search_query(query) {
            Some(spec) => self.run_fetch(spec).await,
            None => Ok(()),
        }
    }

    /// Submits a URL, then re-fetches the current page/query.
    ///
    /// The returned record is the backend's, with its assigned `id` and
    /// initial `queued` status.
    ///
    /// # Errors
    ///
    /// Propagates the submission failure (the list is not re-fetched) or
    /// the re-fetch failure.
    pub async fn add_url(&mut self, address: &str) -> Result<UrlRecord> {
        let record = {
            let Self {
                client,
                session,
                add_call,
                ..
            } = self;
            add_call.run(client.add_url(session, address)).await?
        };

        tracing::debug!(id = record.id, status = record.status.label(), "url submitted");

        let spec = self.list.refresh();
        self.run_fetch(spec).await?;
        Ok(record)
    }

    /// Applies a bulk action to the current selection.
    ///
    /// With an empty selection this performs no network call and leaves all
    /// state unchanged. On success the selection is cleared and the list
    /// re-fetched once; on failure the selection and list are left exactly
    /// as they were.
    ///
    /// # Errors
    ///
    /// Propagates the bulk failure or the subsequent re-fetch failure.
    pub async fn bulk(&mut self, action: BulkAction) -> Result<()> {
        if !self.list.has_selection() {
            tracing::debug!(action = action.label(), "bulk skipped, empty selection");
            return Ok(());
        }

        let ids = self.list.selected_ids();
        {
            let Self {
                client,
                session,
                bulk_call,
                ..
            } = self;
            bulk_call
                .run(client.bulk_action(session, action, &ids))
                .await?;
        }

        tracing::debug!(action = action.label(), count = ids.len(), "bulk applied");

        self.list.clear_selection();
        let spec = self.list.refresh();
        self.run_fetch(spec).await
    }

    /// Issues one fetch and applies its completion under the spec's
    /// generation.
    async fn run_fetch(&mut self, spec: FetchSpec) -> Result<()> {
        let result = {
            let Self {
                client,
                session,
                load_call,
                ..
            } = self;
            load_call
                .run(client.fetch_urls(session, spec.page, spec.size, spec.query.as_deref()))
                .await
        };

        match result {
            Ok(page) => {
                self.list.apply_page(spec.generation, page);
                Ok(())
            }
            Err(error) => {
                self.list.apply_error(spec.generation, error.message());
                Err(error)
            }
        }
    }
}
