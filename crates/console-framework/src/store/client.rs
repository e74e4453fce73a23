//! # Store Client
//!
//! Handle to a running [`StoreActor`](super::StoreActor). It implements
//! [`ResourceApi`], so a resource manager can be pointed at the in-memory
//! store exactly as it would be at the HTTP backend.

use super::message::StoreRequest;
use crate::api::{ApiError, ListQuery, Page, ResourceApi};
use crate::schema::{ResourceSchema, StoredResource};
use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

pub struct StoreClient<R: StoredResource> {
    sender: mpsc::Sender<StoreRequest<R>>,
}

impl<R: StoredResource> Clone for StoreClient<R> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

fn store_closed() -> ApiError {
    ApiError::Transport("Store closed".to_string())
}

fn store_dropped() -> ApiError {
    ApiError::Transport("Store dropped the request".to_string())
}

impl<R: StoredResource> StoreClient<R> {
    pub fn new(sender: mpsc::Sender<StoreRequest<R>>) -> Self {
        Self { sender }
    }

    async fn call<T>(&self, make: impl FnOnce(oneshot::Sender<Result<T, ApiError>>) -> StoreRequest<R>) -> Result<T, ApiError> {
        let (respond_to, response) = oneshot::channel();
        self.sender.send(make(respond_to)).await.map_err(|_| store_closed())?;
        response.await.map_err(|_| store_dropped())?
    }

    /// Creates a record and returns its assigned id. Used for seeding.
    pub async fn insert(&self, draft: <R as ResourceSchema>::Draft) -> Result<R::Id, ApiError> {
        self.call(|respond_to| StoreRequest::Create { draft, respond_to }).await
    }

    /// Updates a record and returns the stored result.
    pub async fn replace(&self, id: R::Id, draft: <R as ResourceSchema>::Draft) -> Result<R, ApiError> {
        self.call(|respond_to| StoreRequest::Update { id, draft, respond_to }).await
    }
}

#[async_trait]
impl<R: StoredResource> ResourceApi<R> for StoreClient<R> {
    #[tracing::instrument(skip(self), fields(resource = R::PLURAL))]
    async fn list(&self, query: &ListQuery<R::Filter>) -> Result<Page<R>, ApiError> {
        let query = query.clone();
        self.call(|respond_to| StoreRequest::List { query, respond_to }).await
    }

    #[tracing::instrument(skip(self, draft), fields(resource = R::PLURAL))]
    async fn create(&self, draft: &R::Draft) -> Result<(), ApiError> {
        self.insert(draft.clone()).await.map(|_| ())
    }

    #[tracing::instrument(skip(self, draft), fields(resource = R::PLURAL))]
    async fn update(&self, id: &R::Id, draft: &R::Draft) -> Result<(), ApiError> {
        self.replace(id.clone(), draft.clone()).await.map(|_| ())
    }

    #[tracing::instrument(skip(self), fields(resource = R::PLURAL))]
    async fn remove(&self, id: &R::Id) -> Result<(), ApiError> {
        let id = id.clone();
        self.call(|respond_to| StoreRequest::Delete { id, respond_to }).await
    }
}
