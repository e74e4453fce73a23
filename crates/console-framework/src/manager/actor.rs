//! # Resource Manager
//!
//! `ResourceManager` is the CRUD orchestrator of one screen. It owns the list
//! store, the form, the notification center, the search debounce and the
//! pending delete, and processes everything sequentially in one task:
//!
//! 1. **Requests** from [`ManagerClient`]s (user actions).
//! 2. **Completions** of work it spawned itself: list fetches, saves,
//!    deletes and debounce timers report back through an internal channel.
//! 3. **Countdown ticks** of the success notification.
//!
//! Network calls never block the loop. Each one runs in its own task and
//! the result is folded back in as a [`Completion`], so a slow fetch cannot
//! hold up a dismiss or a page change. After every event the manager
//! publishes a fresh [`ViewState`] on a `watch` channel.
//!
//! Dropping every client stops the loop; the debounce and countdown timers
//! are owned by the manager and are aborted with it.

use super::client::ManagerClient;
use super::message::{Completion, ManagerRequest, SubmitOutcome};
use super::view::ViewState;
use crate::api::{ListQuery, ResourceApi};
use crate::error::FrameworkError;
use crate::form::{FormMode, FormState, SubmitCheck};
use crate::list_store::{FetchOutcome, ListStore};
use crate::notification::{CountdownTick, NotificationCenter};
use crate::pagination::PAGE_SIZE;
use crate::schema::ResourceSchema;
use crate::timer::ScopedTimer;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info, warn};

/// Tuning knobs for a manager.
#[derive(Debug, Clone, Copy)]
pub struct ManagerOptions {
    pub buffer_size: usize,
    /// Quiet period before typed search text is applied. Zero applies it
    /// immediately.
    pub search_debounce: Duration,
}

impl Default for ManagerOptions {
    fn default() -> Self {
        Self {
            buffer_size: 32,
            search_debounce: Duration::from_millis(300),
        }
    }
}

pub struct ResourceManager<R: ResourceSchema, A: ResourceApi<R>> {
    requests: mpsc::Receiver<ManagerRequest<R>>,
    completions: mpsc::UnboundedReceiver<Completion<R>>,
    completion_tx: mpsc::UnboundedSender<Completion<R>>,
    ticks: mpsc::UnboundedReceiver<CountdownTick>,
    api: Arc<A>,
    options: ManagerOptions,

    list: ListStore<R>,
    form: FormState<R>,
    notices: NotificationCenter,
    search_input: String,
    search_generation: u64,
    debounce: Option<ScopedTimer>,
    pending_delete: Option<R::Id>,
    deleting: bool,

    view: watch::Sender<ViewState<R>>,
}

impl<R: ResourceSchema, A: ResourceApi<R>> ResourceManager<R, A> {
    pub fn new(api: A, options: ManagerOptions) -> (Self, ManagerClient<R>) {
        Self::with_shared(Arc::new(api), options)
    }

    pub fn with_shared(api: Arc<A>, options: ManagerOptions) -> (Self, ManagerClient<R>) {
        let (sender, requests) = mpsc::channel(options.buffer_size.max(1));
        let (completion_tx, completions) = mpsc::unbounded_channel();
        let (tick_tx, ticks) = mpsc::unbounded_channel();
        // The first fetch is issued as soon as the manager runs.
        let (view, view_rx) = watch::channel(ViewState {
            loading: true,
            ..ViewState::default()
        });

        let manager = Self {
            requests,
            completions,
            completion_tx,
            ticks,
            api,
            options,
            list: ListStore::default(),
            form: FormState::default(),
            notices: NotificationCenter::new(tick_tx),
            search_input: String::new(),
            search_generation: 0,
            debounce: None,
            pending_delete: None,
            deleting: false,
            view,
        };
        (manager, ManagerClient::new(sender, view_rx))
    }

    /// Loads the first page, then serves requests until every client is gone.
    pub async fn run(mut self) {
        info!(resource = R::PLURAL, "Manager started");
        self.fetch(ListQuery::default());
        self.publish();

        loop {
            tokio::select! {
                request = self.requests.recv() => match request {
                    // Publishes before replying.
                    Some(request) => {
                        self.handle_request(request);
                        continue;
                    }
                    None => break,
                },
                Some(completion) = self.completions.recv() => self.handle_completion(completion),
                Some(tick) = self.ticks.recv() => {
                    if !self.notices.on_tick(tick) {
                        continue;
                    }
                }
            }
            self.publish();
        }

        info!(resource = R::PLURAL, "Manager shutdown");
    }

    fn publish(&self) {
        let view = ViewState {
            records: self.list.records().to_vec(),
            pagination: *self.list.pagination(),
            loading: self.list.is_loading(),
            search: self.search_input.clone(),
            search_pending: self.debounce.is_some(),
            filter: self.list.query().filter.clone(),
            form: self.form.phase().clone(),
            draft: self.form.draft().clone(),
            field_errors: self.form.field_errors().clone(),
            notification: self.notices.current().cloned(),
            pending_delete: self.pending_delete.clone(),
            deleting: self.deleting,
        };
        self.view.send_replace(view);
    }

    // -------------------------------------------------------------------------
    // Fetching
    // -------------------------------------------------------------------------

    fn fetch(&mut self, query: ListQuery<R::Filter>) {
        let ticket = self.list.begin(query.clone());
        debug!(resource = R::PLURAL, page = query.page, search = %query.search, ?ticket, "Fetch");
        let api = self.api.clone();
        let completions = self.completion_tx.clone();
        tokio::spawn(async move {
            let result = api.list(&query).await;
            let _ = completions.send(Completion::Fetched { ticket, result });
        });
    }

    /// Re-fetches `page` with the applied search and filter.
    fn fetch_page(&mut self, page: u32) {
        let query = ListQuery {
            page,
            limit: PAGE_SIZE,
            ..self.list.query().clone()
        };
        self.fetch(query);
    }

    fn refetch_current(&mut self) {
        self.fetch_page(self.list.query().page);
    }

    fn apply_search(&mut self) {
        self.debounce = None;
        let query = ListQuery {
            page: 1,
            limit: PAGE_SIZE,
            search: self.search_input.clone(),
            filter: self.list.query().filter.clone(),
        };
        self.fetch(query);
    }

    // -------------------------------------------------------------------------
    // Requests
    // -------------------------------------------------------------------------

    /// Applies a request, publishes the resulting state, then replies. A
    /// caller that reads the view after its call returns sees its own change.
    fn handle_request(&mut self, request: ManagerRequest<R>) {
        match request {
            ManagerRequest::Refresh { respond_to } => {
                self.refetch_current();
                self.reply(respond_to, Ok(()));
            }
            ManagerRequest::Search { text, respond_to } => {
                self.on_search(text);
                self.reply(respond_to, Ok(()));
            }
            ManagerRequest::SetFilter { filter, respond_to } => {
                debug!(resource = R::PLURAL, ?filter, "Filter");
                let query = ListQuery {
                    page: 1,
                    limit: PAGE_SIZE,
                    search: self.list.query().search.clone(),
                    filter,
                };
                self.fetch(query);
                self.reply(respond_to, Ok(()));
            }
            ManagerRequest::GoTo { page, respond_to } => {
                let moved = self.go_to(Some(page));
                self.reply(respond_to, Ok(moved));
            }
            ManagerRequest::NextPage { respond_to } => {
                let target = self.list.pagination().next_page();
                let moved = self.go_to(target);
                self.reply(respond_to, Ok(moved));
            }
            ManagerRequest::PrevPage { respond_to } => {
                let target = self.list.pagination().prev_page();
                let moved = self.go_to(target);
                self.reply(respond_to, Ok(moved));
            }
            ManagerRequest::OpenAdd { respond_to } => {
                let result = self.form.open_add();
                self.reply(respond_to, result);
            }
            ManagerRequest::OpenEdit { id, respond_to } => {
                let result = self.open_edit(&id);
                self.reply(respond_to, result);
            }
            ManagerRequest::SetField { name, value, respond_to } => {
                let result = self.form.set_field(&name, value);
                if result.is_ok() && self.notices.dismiss_error() {
                    debug!(resource = R::PLURAL, field = %name, "Edit cleared error notification");
                }
                self.reply(respond_to, result);
            }
            ManagerRequest::Attach { attachment, respond_to } => {
                let result = self.form.attach(attachment);
                if result.is_ok() {
                    self.notices.dismiss_error();
                }
                self.reply(respond_to, result);
            }
            ManagerRequest::Cancel { respond_to } => {
                let result = self.form.cancel();
                if result.is_ok() {
                    self.notices.dismiss();
                }
                self.reply(respond_to, result);
            }
            ManagerRequest::Submit { respond_to } => {
                let result = self.submit();
                self.reply(respond_to, result);
            }
            ManagerRequest::RequestDelete { id, respond_to } => {
                let result = self.request_delete(id);
                self.reply(respond_to, result);
            }
            ManagerRequest::ConfirmDelete { respond_to } => {
                let result = self.confirm_delete();
                self.reply(respond_to, result);
            }
            ManagerRequest::CancelDelete { respond_to } => {
                self.pending_delete = None;
                self.reply(respond_to, Ok(()));
            }
            ManagerRequest::Dismiss { respond_to } => {
                self.notices.dismiss();
                self.reply(respond_to, Ok(()));
            }
        }
    }

    fn reply<T>(&self, respond_to: oneshot::Sender<T>, value: T) {
        self.publish();
        let _ = respond_to.send(value);
    }

    fn on_search(&mut self, text: String) {
        self.search_input = text;
        self.search_generation += 1;
        if self.options.search_debounce.is_zero() {
            self.apply_search();
            return;
        }
        self.debounce = Some(ScopedTimer::once(
            self.options.search_debounce,
            self.completion_tx.clone(),
            Completion::SearchSettled {
                generation: self.search_generation,
            },
        ));
    }

    /// Fetches `target` if it is a legal page; otherwise a no-op.
    fn go_to(&mut self, target: Option<u32>) -> bool {
        match target {
            Some(page) if self.list.pagination().accepts(page) => {
                self.fetch_page(page);
                true
            }
            _ => {
                debug!(resource = R::PLURAL, ?target, "Ignoring page change");
                false
            }
        }
    }

    fn open_edit(&mut self, id: &R::Id) -> Result<(), FrameworkError> {
        let record = self
            .list
            .find(id)
            .cloned()
            .ok_or_else(|| FrameworkError::NotFound(id.to_string()))?;
        self.form.open_edit(&record)?;
        self.notices.dismiss();
        Ok(())
    }

    fn submit(&mut self) -> Result<SubmitOutcome, FrameworkError> {
        let plan = match self.form.begin_submit(self.list.records())? {
            SubmitCheck::Invalid(report) => {
                debug!(resource = R::PLURAL, errors = ?report.errors, "Validation failed");
                if let Some(message) = &report.first_message {
                    self.notices.error(message.clone());
                }
                return Ok(SubmitOutcome::Invalid(report));
            }
            SubmitCheck::Ready(plan) => plan,
        };

        debug!(resource = R::PLURAL, mode = ?plan.mode, "Saving");
        let api = self.api.clone();
        let completions = self.completion_tx.clone();
        tokio::spawn(async move {
            let result = match &plan.mode {
                FormMode::Add => api.create(&plan.draft).await,
                FormMode::Edit(id) => api.update(id, &plan.draft).await,
            };
            let _ = completions.send(Completion::Saved {
                mode: plan.mode,
                result,
            });
        });
        Ok(SubmitOutcome::Sent)
    }

    fn request_delete(&mut self, id: R::Id) -> Result<(), FrameworkError> {
        if self.deleting {
            return Err(FrameworkError::DeleteInFlight);
        }
        if self.list.find(&id).is_none() {
            return Err(FrameworkError::NotFound(id.to_string()));
        }
        self.pending_delete = Some(id);
        Ok(())
    }

    fn confirm_delete(&mut self) -> Result<(), FrameworkError> {
        if self.deleting {
            return Err(FrameworkError::DeleteInFlight);
        }
        let id = self.pending_delete.take().ok_or(FrameworkError::NothingToConfirm)?;
        self.deleting = true;
        debug!(resource = R::PLURAL, %id, "Deleting");

        let api = self.api.clone();
        let completions = self.completion_tx.clone();
        tokio::spawn(async move {
            let result = api.remove(&id).await;
            let _ = completions.send(Completion::Deleted { id, result });
        });
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Completions
    // -------------------------------------------------------------------------

    fn handle_completion(&mut self, completion: Completion<R>) {
        match completion {
            Completion::Fetched { ticket, result } => match self.list.complete(ticket, result) {
                FetchOutcome::Applied => {
                    let pagination = *self.list.pagination();
                    if self.list.records().is_empty() && pagination.current_page > pagination.total_pages {
                        debug!(resource = R::PLURAL, page = pagination.current_page, "Page emptied, moving to last page");
                        self.fetch_page(pagination.total_pages);
                    }
                }
                FetchOutcome::Failed(e) => {
                    warn!(resource = R::PLURAL, error = %e, "Fetch failed");
                    self.notices.error(R::fetch_failed_message());
                }
                FetchOutcome::Superseded => {
                    warn!(resource = R::PLURAL, ?ticket, "Discarding stale fetch response");
                }
            },
            Completion::Saved { mode, result } => {
                self.form.finish_submit(result.is_ok());
                match result {
                    Ok(()) => {
                        info!(resource = R::PLURAL, ?mode, "Saved");
                        let message = match mode {
                            FormMode::Add => R::created_message(),
                            FormMode::Edit(_) => R::updated_message(),
                        };
                        self.notices.success(message);
                        self.refetch_current();
                    }
                    Err(e) => {
                        warn!(resource = R::PLURAL, ?mode, error = %e, "Save failed");
                        self.notices.error(e.user_message(&R::save_failed_message()));
                    }
                }
            }
            Completion::Deleted { id, result } => {
                self.deleting = false;
                match result {
                    Ok(()) => {
                        info!(resource = R::PLURAL, %id, "Deleted");
                        self.notices.success(R::deleted_message());
                        self.refetch_current();
                    }
                    Err(e) => {
                        warn!(resource = R::PLURAL, %id, error = %e, "Delete failed");
                        self.notices.error(e.user_message(&R::delete_failed_message()));
                    }
                }
            }
            Completion::SearchSettled { generation } => {
                if generation == self.search_generation {
                    self.apply_search();
                }
            }
        }
    }
}
