//! # Resource List Store
//!
//! Owns the currently displayed page of records and its pagination. Fetches
//! are sequenced: [`ListStore::begin`] hands out a monotonically increasing
//! ticket and [`ListStore::complete`] only applies the response whose ticket
//! is still the latest. A slow response that arrives after a newer request
//! was issued is discarded instead of overwriting newer state.

use crate::api::{ApiError, ListQuery, Page};
use crate::pagination::PaginationInfo;
use crate::schema::ResourceSchema;
use tracing::debug;

/// Ticket for an issued fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

/// What happened to a completed fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Applied,
    /// The backend failed; the previous records are still shown.
    Failed(ApiError),
    /// A newer fetch was issued after this one; the response was dropped.
    Superseded,
}

#[derive(Debug, Clone)]
pub struct ListStore<R: ResourceSchema> {
    records: Vec<R>,
    pagination: PaginationInfo,
    query: ListQuery<R::Filter>,
    loading: bool,
    latest: u64,
}

impl<R: ResourceSchema> Default for ListStore<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            pagination: PaginationInfo::default(),
            query: ListQuery::default(),
            loading: false,
            latest: 0,
        }
    }
}

impl<R: ResourceSchema> ListStore<R> {
    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn pagination(&self) -> &PaginationInfo {
        &self.pagination
    }

    /// The query of the most recently issued fetch.
    pub fn query(&self) -> &ListQuery<R::Filter> {
        &self.query
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn find(&self, id: &R::Id) -> Option<&R> {
        self.records.iter().find(|record| record.id() == id)
    }

    /// Records `query` as current, raises `loading` and returns the ticket the
    /// response must present.
    pub fn begin(&mut self, query: ListQuery<R::Filter>) -> FetchTicket {
        self.latest += 1;
        self.query = query;
        self.loading = true;
        FetchTicket(self.latest)
    }

    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        ticket.0 == self.latest
    }

    pub fn complete(&mut self, ticket: FetchTicket, result: Result<Page<R>, ApiError>) -> FetchOutcome {
        if !self.is_current(ticket) {
            debug!(resource = R::PLURAL, ticket = ticket.0, latest = self.latest, "dropping superseded response");
            return FetchOutcome::Superseded;
        }
        self.loading = false;
        match result {
            Ok(page) => {
                self.records = page.data;
                self.pagination = page.pagination.normalized();
                FetchOutcome::Applied
            }
            Err(e) => FetchOutcome::Failed(e),
        }
    }
}
