//! # Resource API
//!
//! The transport seam between a screen and the backend. [`ResourceApi`] has
//! one method per endpoint of the list/create/update/delete contract:
//!
//! - `GET    {endpoint}?page&limit&search&<filter>` → `{data, pagination}`
//! - `GET    <scoped path>` → full scoped set, no pagination
//! - `POST   {endpoint}` → created record or `{message}`
//! - `PUT    {endpoint}/{id}` → updated record or `{message}`
//! - `DELETE {endpoint}/{id}` → `{success}` or `{message}`
//!
//! Implementations: [`HttpResourceApi`] (reqwest), the in-memory
//! [`StoreClient`](crate::store::StoreClient), and
//! [`MockApi`](crate::mock::MockApi) for tests.

mod error;
mod http;

pub use error::*;
pub use http::*;

use crate::pagination::{PaginationInfo, PAGE_SIZE};
use crate::schema::ResourceSchema;
use async_trait::async_trait;

/// Parameters of one list fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery<F> {
    pub page: u32,
    pub limit: u32,
    pub search: String,
    pub filter: F,
}

impl<F: Default> Default for ListQuery<F> {
    fn default() -> Self {
        Self {
            page: 1,
            limit: PAGE_SIZE,
            search: String::new(),
            filter: F::default(),
        }
    }
}

impl<F> ListQuery<F> {
    /// Search term, or `None` when blank so it can be left off the request.
    pub fn search_term(&self) -> Option<&str> {
        let term = self.search.trim();
        (!term.is_empty()).then_some(term)
    }
}

/// One page of records as returned by a list endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<R> {
    pub data: Vec<R>,
    pub pagination: PaginationInfo,
}

impl<R> Page<R> {
    /// Wraps a scoped result set in a synthetic single page.
    pub fn scoped(data: Vec<R>) -> Self {
        let pagination = PaginationInfo::single_page(data.len() as u64);
        Self { data, pagination }
    }
}

/// Backend operations consumed by the resource manager.
#[async_trait]
pub trait ResourceApi<R: ResourceSchema>: Send + Sync + 'static {
    async fn list(&self, query: &ListQuery<R::Filter>) -> Result<Page<R>, ApiError>;

    async fn create(&self, draft: &R::Draft) -> Result<(), ApiError>;

    async fn update(&self, id: &R::Id, draft: &R::Draft) -> Result<(), ApiError>;

    async fn remove(&self, id: &R::Id) -> Result<(), ApiError>;
}
