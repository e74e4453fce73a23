//! # Mock API & Testing Guide
//!
//! [`MockApi<R>`] implements [`ResourceApi<R>`] from a queue of expectations,
//! so a [`ResourceManager`](crate::ResourceManager) can be driven without a
//! backend.
//!
//! | Feature | MockApi | StoreActor | HttpResourceApi |
//! |---------|---------|------------|-----------------|
//! | **State** | None (scripted replies) | Real records | Remote |
//! | **Error injection** | `return_err` | Duplicates / missing ids | Server-side |
//! | **Response timing** | `gated()` holds a reply back | Immediate | Network |
//! | **Use case** | Manager state machine | End-to-end flows | Transport |
//!
//! ## Scripting replies
//!
//! Expectations are consumed in order. A call of the wrong kind gets a
//! transport error and is recorded as a mismatch; [`MockApi::verify`]
//! panics on mismatches and on leftover expectations.
//!
//! ```rust,ignore
//! let api = MockApi::<Department>::new();
//! api.expect_list().return_ok(Page::scoped(vec![]));
//! api.expect_create().return_err(ApiError::Backend { status: 409, message: "Code taken".into() });
//! ```
//!
//! ## Holding a reply back
//!
//! `gated()` returns a [`Gate`]; the call blocks until the gate is released.
//! This is how out-of-order responses are produced in tests:
//!
//! ```rust,ignore
//! let slow = api.expect_list().gated();
//! api.expect_list().return_ok(newer_page);
//! // ... issue two fetches ...
//! slow.release(Ok(older_page)); // arrives last, must be ignored
//! ```
//!
//! ## Asserting on traffic
//!
//! Every call is recorded in order, see [`MockApi::calls`]. A validation
//! failure, for example, must leave no `Create` in the log.

use crate::api::{ApiError, ListQuery, Page, ResourceApi};
use crate::schema::ResourceSchema;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{oneshot, Notify};

/// One recorded call.
#[derive(Debug, Clone)]
pub enum ApiCall<R: ResourceSchema> {
    List(ListQuery<R::Filter>),
    Create(R::Draft),
    Update(R::Id, R::Draft),
    Remove(R::Id),
}

impl<R: ResourceSchema> ApiCall<R> {
    fn kind(&self) -> &'static str {
        match self {
            ApiCall::List(_) => "list",
            ApiCall::Create(_) => "create",
            ApiCall::Update(..) => "update",
            ApiCall::Remove(_) => "remove",
        }
    }
}

enum Reply<T> {
    Ready(Result<T, ApiError>),
    Gated(oneshot::Receiver<Result<T, ApiError>>),
}

impl<T> Reply<T> {
    async fn resolve(self) -> Result<T, ApiError> {
        match self {
            Reply::Ready(result) => result,
            Reply::Gated(gate) => gate
                .await
                .unwrap_or_else(|_| Err(ApiError::Transport("Gate dropped".to_string()))),
        }
    }
}

enum Expectation<R: ResourceSchema> {
    List(Reply<Page<R>>),
    Create(Reply<()>),
    Update(Reply<()>),
    Remove(Reply<()>),
}

impl<R: ResourceSchema> Expectation<R> {
    fn kind(&self) -> &'static str {
        match self {
            Expectation::List(_) => "list",
            Expectation::Create(_) => "create",
            Expectation::Update(_) => "update",
            Expectation::Remove(_) => "remove",
        }
    }
}

struct MockState<R: ResourceSchema> {
    expectations: VecDeque<Expectation<R>>,
    calls: Vec<ApiCall<R>>,
    mismatches: Vec<String>,
}

/// Scripted [`ResourceApi`] for tests. Clones share the same script.
pub struct MockApi<R: ResourceSchema> {
    state: Arc<Mutex<MockState<R>>>,
    called: Arc<Notify>,
}

impl<R: ResourceSchema> Clone for MockApi<R> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            called: self.called.clone(),
        }
    }
}

impl<R: ResourceSchema> Default for MockApi<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: ResourceSchema> MockApi<R> {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                expectations: VecDeque::new(),
                calls: Vec::new(),
                mismatches: Vec::new(),
            })),
            called: Arc::new(Notify::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MockState<R>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn expect_list(&self) -> ExpectationBuilder<R, Page<R>> {
        ExpectationBuilder::new(self.state.clone(), Expectation::List)
    }

    pub fn expect_create(&self) -> ExpectationBuilder<R, ()> {
        ExpectationBuilder::new(self.state.clone(), Expectation::Create)
    }

    pub fn expect_update(&self) -> ExpectationBuilder<R, ()> {
        ExpectationBuilder::new(self.state.clone(), Expectation::Update)
    }

    pub fn expect_remove(&self) -> ExpectationBuilder<R, ()> {
        ExpectationBuilder::new(self.state.clone(), Expectation::Remove)
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<ApiCall<R>> {
        self.lock().calls.clone()
    }

    pub fn count(&self, kind: &str) -> usize {
        self.lock().calls.iter().filter(|c| c.kind() == kind).count()
    }

    /// Waits until at least `count` calls of `kind` have arrived.
    pub async fn wait_for_calls(&self, kind: &str, count: usize) {
        loop {
            let called = self.called.notified();
            if self.count(kind) >= count {
                return;
            }
            called.await;
        }
    }

    /// Panics if a call did not match its expectation or if expectations remain.
    pub fn verify(&self) {
        let state = self.lock();
        if !state.mismatches.is_empty() {
            panic!("Unexpected calls: {}", state.mismatches.join("; "));
        }
        if !state.expectations.is_empty() {
            panic!("Not all expectations were met. {} remaining", state.expectations.len());
        }
    }

    /// Records the call and pops the next expectation.
    fn next(&self, call: ApiCall<R>) -> Option<Expectation<R>> {
        let mut state = self.lock();
        let kind = call.kind();
        state.calls.push(call);
        self.called.notify_waiters();
        match state.expectations.pop_front() {
            Some(expectation) if expectation.kind() == kind => Some(expectation),
            Some(expectation) => {
                let message = format!("expected {}, got {kind}", expectation.kind());
                state.mismatches.push(message);
                None
            }
            None => {
                state.mismatches.push(format!("no expectation for {kind}"));
                None
            }
        }
    }
}

fn unexpected<T>() -> Result<T, ApiError> {
    Err(ApiError::Transport("Unexpected call".to_string()))
}

#[async_trait]
impl<R: ResourceSchema> ResourceApi<R> for MockApi<R> {
    async fn list(&self, query: &ListQuery<R::Filter>) -> Result<Page<R>, ApiError> {
        match self.next(ApiCall::List(query.clone())) {
            Some(Expectation::List(reply)) => reply.resolve().await,
            _ => unexpected(),
        }
    }

    async fn create(&self, draft: &R::Draft) -> Result<(), ApiError> {
        match self.next(ApiCall::Create(draft.clone())) {
            Some(Expectation::Create(reply)) => reply.resolve().await,
            _ => unexpected(),
        }
    }

    async fn update(&self, id: &R::Id, draft: &R::Draft) -> Result<(), ApiError> {
        match self.next(ApiCall::Update(id.clone(), draft.clone())) {
            Some(Expectation::Update(reply)) => reply.resolve().await,
            _ => unexpected(),
        }
    }

    async fn remove(&self, id: &R::Id) -> Result<(), ApiError> {
        match self.next(ApiCall::Remove(id.clone())) {
            Some(Expectation::Remove(reply)) => reply.resolve().await,
            _ => unexpected(),
        }
    }
}

pub struct ExpectationBuilder<R: ResourceSchema, T> {
    state: Arc<Mutex<MockState<R>>>,
    wrap: fn(Reply<T>) -> Expectation<R>,
}

impl<R: ResourceSchema, T> ExpectationBuilder<R, T> {
    fn new(state: Arc<Mutex<MockState<R>>>, wrap: fn(Reply<T>) -> Expectation<R>) -> Self {
        Self { state, wrap }
    }

    fn push(self, reply: Reply<T>) {
        let expectation = (self.wrap)(reply);
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .expectations
            .push_back(expectation);
    }

    pub fn return_ok(self, value: T) {
        self.push(Reply::Ready(Ok(value)));
    }

    pub fn return_err(self, error: ApiError) {
        self.push(Reply::Ready(Err(error)));
    }

    /// Holds the reply until [`Gate::release`] is called.
    pub fn gated(self) -> Gate<T> {
        let (tx, rx) = oneshot::channel();
        self.push(Reply::Gated(rx));
        Gate { tx }
    }
}

/// Releases a held-back reply.
pub struct Gate<T> {
    tx: oneshot::Sender<Result<T, ApiError>>,
}

impl<T> Gate<T> {
    pub fn release(self, result: Result<T, ApiError>) {
        let _ = self.tx.send(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{room, valid_draft, Room};
    use crate::schema::RecordId;

    #[tokio::test]
    async fn test_mock_replays_script_and_logs_calls() {
        let api = MockApi::<Room>::new();
        api.expect_list().return_ok(Page::scoped(vec![room(1, "LAB")]));
        api.expect_create()
            .return_err(ApiError::Transport("timeout".into()));

        let page = api.list(&ListQuery::default()).await.unwrap();
        assert_eq!(page.data.len(), 1);
        let err = api.create(&valid_draft("SEM")).await.unwrap_err();
        assert_eq!(err, ApiError::Transport("timeout".into()));

        assert_eq!(api.count("list"), 1);
        assert_eq!(api.count("create"), 1);
        api.verify();
    }

    #[tokio::test]
    async fn test_gated_reply_waits_for_release() {
        let api = MockApi::<Room>::new();
        let gate = api.expect_remove().gated();

        let call = tokio::spawn({
            let api = api.clone();
            async move { api.remove(&RecordId(3)).await }
        });
        tokio::task::yield_now().await;
        assert!(!call.is_finished());

        gate.release(Ok(()));
        assert_eq!(call.await.unwrap(), Ok(()));
        assert!(matches!(api.calls()[0], ApiCall::Remove(RecordId(3))));
    }

    #[tokio::test]
    #[should_panic(expected = "expected list, got create")]
    async fn test_verify_reports_mismatched_calls() {
        let api = MockApi::<Room>::new();
        api.expect_list().return_ok(Page::scoped(vec![]));
        let _ = api.create(&valid_draft("SEM")).await;
        api.verify();
    }
}
