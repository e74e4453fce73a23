//! # PageClient Trait
//!
//! Common surface for screen-specific clients. An implementor supplies the
//! underlying [`ManagerClient`] and an error mapping; the list, form and
//! delete actions come as default methods.
use crate::{FieldValue, FrameworkError, ManagerClient, ResourceSchema, SubmitOutcome, ViewState};
use async_trait::async_trait;

#[async_trait]
pub trait PageClient<R: ResourceSchema>: Send + Sync {
    type Error: Send + Sync;

    fn manager(&self) -> &ManagerClient<R>;

    fn map_error(e: FrameworkError) -> Self::Error;

    /// Latest published screen state.
    fn view(&self) -> ViewState<R> {
        self.manager().view()
    }

    async fn settled(&self) -> Result<ViewState<R>, Self::Error> {
        self.manager().settled().await.map_err(Self::map_error)
    }

    #[tracing::instrument(skip(self), fields(resource = R::PLURAL))]
    async fn refresh(&self) -> Result<(), Self::Error> {
        tracing::debug!("Sending request");
        self.manager().refresh().await.map_err(Self::map_error)
    }

    #[tracing::instrument(skip(self), fields(resource = R::PLURAL))]
    async fn search(&self, text: &str) -> Result<(), Self::Error> {
        tracing::debug!("Sending request");
        self.manager().search(text).await.map_err(Self::map_error)
    }

    #[tracing::instrument(skip(self), fields(resource = R::PLURAL))]
    async fn go_to(&self, page: u32) -> Result<bool, Self::Error> {
        tracing::debug!("Sending request");
        self.manager().go_to(page).await.map_err(Self::map_error)
    }

    async fn next_page(&self) -> Result<bool, Self::Error> {
        self.manager().next_page().await.map_err(Self::map_error)
    }

    async fn prev_page(&self) -> Result<bool, Self::Error> {
        self.manager().prev_page().await.map_err(Self::map_error)
    }

    #[tracing::instrument(skip(self), fields(resource = R::PLURAL))]
    async fn open_add(&self) -> Result<(), Self::Error> {
        tracing::debug!("Sending request");
        self.manager().open_add().await.map_err(Self::map_error)
    }

    #[tracing::instrument(skip(self), fields(resource = R::PLURAL))]
    async fn open_edit(&self, id: R::Id) -> Result<(), Self::Error> {
        tracing::debug!("Sending request");
        self.manager().open_edit(id).await.map_err(Self::map_error)
    }

    async fn set_field(&self, name: &str, value: FieldValue) -> Result<(), Self::Error> {
        self.manager().set_field(name, value).await.map_err(Self::map_error)
    }

    async fn cancel(&self) -> Result<(), Self::Error> {
        self.manager().cancel().await.map_err(Self::map_error)
    }

    #[tracing::instrument(skip(self), fields(resource = R::PLURAL))]
    async fn submit(&self) -> Result<SubmitOutcome, Self::Error> {
        tracing::debug!("Sending request");
        self.manager().submit().await.map_err(Self::map_error)
    }

    #[tracing::instrument(skip(self), fields(resource = R::PLURAL))]
    async fn request_delete(&self, id: R::Id) -> Result<(), Self::Error> {
        tracing::debug!("Sending request");
        self.manager().request_delete(id).await.map_err(Self::map_error)
    }

    #[tracing::instrument(skip(self), fields(resource = R::PLURAL))]
    async fn confirm_delete(&self) -> Result<(), Self::Error> {
        tracing::debug!("Sending request");
        self.manager().confirm_delete().await.map_err(Self::map_error)
    }

    async fn cancel_delete(&self) -> Result<(), Self::Error> {
        self.manager().cancel_delete().await.map_err(Self::map_error)
    }

    async fn dismiss(&self) -> Result<(), Self::Error> {
        self.manager().dismiss().await.map_err(Self::map_error)
    }
}
