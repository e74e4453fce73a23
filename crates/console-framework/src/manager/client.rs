//! # Manager Client
//!
//! Cheap, cloneable handle to a running [`ResourceManager`](super::ResourceManager).
//! Every user action is a request/reply round trip; the resulting screen
//! state is read from the `watch` channel via [`ManagerClient::view`] or
//! awaited with [`ManagerClient::wait_for`].

use super::message::{ManagerRequest, Reply, SubmitOutcome};
use super::view::ViewState;
use crate::error::FrameworkError;
use crate::fields::{Attachment, FieldValue};
use crate::schema::ResourceSchema;
use tokio::sync::{mpsc, oneshot, watch};

pub struct ManagerClient<R: ResourceSchema> {
    sender: mpsc::Sender<ManagerRequest<R>>,
    view: watch::Receiver<ViewState<R>>,
}

impl<R: ResourceSchema> Clone for ManagerClient<R> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            view: self.view.clone(),
        }
    }
}

impl<R: ResourceSchema> ManagerClient<R> {
    pub fn new(sender: mpsc::Sender<ManagerRequest<R>>, view: watch::Receiver<ViewState<R>>) -> Self {
        Self { sender, view }
    }

    async fn call<T>(&self, make: impl FnOnce(Reply<T>) -> ManagerRequest<R>) -> Result<T, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(make(respond_to))
            .await
            .map_err(|_| FrameworkError::ManagerClosed)?;
        response.await.map_err(|_| FrameworkError::ManagerDropped)?
    }

    /// Snapshot of the latest published state.
    pub fn view(&self) -> ViewState<R> {
        self.view.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState<R>> {
        self.view.clone()
    }

    /// Waits until the published state satisfies `predicate`, checking the
    /// current state first.
    pub async fn wait_for(&self, predicate: impl FnMut(&ViewState<R>) -> bool + Send) -> Result<ViewState<R>, FrameworkError> {
        let mut view = self.view.clone();
        let state = view
            .wait_for(predicate)
            .await
            .map_err(|_| FrameworkError::ManagerClosed)?;
        Ok(state.clone())
    }

    /// Waits until no fetch, save, delete or debounce is outstanding.
    pub async fn settled(&self) -> Result<ViewState<R>, FrameworkError> {
        self.wait_for(|view| view.is_idle()).await
    }

    pub async fn refresh(&self) -> Result<(), FrameworkError> {
        self.call(|respond_to| ManagerRequest::Refresh { respond_to }).await
    }

    pub async fn search(&self, text: impl Into<String>) -> Result<(), FrameworkError> {
        let text = text.into();
        self.call(|respond_to| ManagerRequest::Search { text, respond_to }).await
    }

    pub async fn set_filter(&self, filter: R::Filter) -> Result<(), FrameworkError> {
        self.call(|respond_to| ManagerRequest::SetFilter { filter, respond_to }).await
    }

    /// Returns whether a fetch was issued.
    pub async fn go_to(&self, page: u32) -> Result<bool, FrameworkError> {
        self.call(|respond_to| ManagerRequest::GoTo { page, respond_to }).await
    }

    pub async fn next_page(&self) -> Result<bool, FrameworkError> {
        self.call(|respond_to| ManagerRequest::NextPage { respond_to }).await
    }

    pub async fn prev_page(&self) -> Result<bool, FrameworkError> {
        self.call(|respond_to| ManagerRequest::PrevPage { respond_to }).await
    }

    pub async fn open_add(&self) -> Result<(), FrameworkError> {
        self.call(|respond_to| ManagerRequest::OpenAdd { respond_to }).await
    }

    pub async fn open_edit(&self, id: R::Id) -> Result<(), FrameworkError> {
        self.call(|respond_to| ManagerRequest::OpenEdit { id, respond_to }).await
    }

    pub async fn set_field(&self, name: impl Into<String>, value: impl Into<FieldValue>) -> Result<(), FrameworkError> {
        let (name, value) = (name.into(), value.into());
        self.call(|respond_to| ManagerRequest::SetField { name, value, respond_to })
            .await
    }

    pub async fn attach(&self, attachment: Option<Attachment>) -> Result<(), FrameworkError> {
        self.call(|respond_to| ManagerRequest::Attach { attachment, respond_to }).await
    }

    pub async fn cancel(&self) -> Result<(), FrameworkError> {
        self.call(|respond_to| ManagerRequest::Cancel { respond_to }).await
    }

    pub async fn submit(&self) -> Result<SubmitOutcome, FrameworkError> {
        self.call(|respond_to| ManagerRequest::Submit { respond_to }).await
    }

    pub async fn request_delete(&self, id: R::Id) -> Result<(), FrameworkError> {
        self.call(|respond_to| ManagerRequest::RequestDelete { id, respond_to }).await
    }

    pub async fn confirm_delete(&self) -> Result<(), FrameworkError> {
        self.call(|respond_to| ManagerRequest::ConfirmDelete { respond_to }).await
    }

    pub async fn cancel_delete(&self) -> Result<(), FrameworkError> {
        self.call(|respond_to| ManagerRequest::CancelDelete { respond_to }).await
    }

    pub async fn dismiss(&self) -> Result<(), FrameworkError> {
        self.call(|respond_to| ManagerRequest::Dismiss { respond_to }).await
    }
}
