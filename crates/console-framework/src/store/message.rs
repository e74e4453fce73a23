//! # Store Messages
//!
//! Requests accepted by the [`StoreActor`](super::StoreActor). Each variant
//! carries a `oneshot` sender for the reply.

use crate::api::{ApiError, ListQuery, Page};
use crate::schema::{ResourceSchema, StoredResource};
use tokio::sync::oneshot;

pub type Reply<T> = oneshot::Sender<Result<T, ApiError>>;

pub enum StoreRequest<R: StoredResource> {
    List {
        query: ListQuery<R::Filter>,
        respond_to: Reply<Page<R>>,
    },
    Create {
        draft: <R as ResourceSchema>::Draft,
        respond_to: Reply<R::Id>,
    },
    Update {
        id: R::Id,
        draft: <R as ResourceSchema>::Draft,
        respond_to: Reply<R>,
    },
    Delete {
        id: R::Id,
        respond_to: Reply<()>,
    },
}
