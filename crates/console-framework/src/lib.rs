//! # Console Framework
//!
//! Building blocks for paginated CRUD admin screens. Every screen of an admin
//! console follows the same pattern: fetch a searchable, paginated list from
//! a remote API, edit records in a modal form with client-side validation,
//! and report the outcome with a transient notification. This crate writes
//! that pattern **once**, generic over the resource being managed.
//!
//! ## Architecture Overview
//!
//! 1. **Schema Layer** ([`ResourceSchema`], [`Draft`], [`ListFilter`]) - the
//!    fields, validation rules, endpoint and labels of one entity.
//! 2. **Runtime Layer** ([`ResourceManager`]) - one task per screen that owns
//!    the list, the form, the notification and the timers, and processes
//!    user actions and API completions sequentially.
//! 3. **Interface Layer** ([`ManagerClient`], [`PageClient`]) - type-safe
//!    handles that send actions and observe the published [`ViewState`].
//! 4. **Transport Layer** ([`ResourceApi`]) - [`HttpResourceApi`] for the
//!    real backend, [`StoreActor`](store::StoreActor) for an in-process
//!    backend, and [`MockApi`](mock::MockApi) for tests.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use console_framework::{HttpResourceApi, ManagerOptions, ResourceManager};
//!
//! let api = HttpResourceApi::<Department>::new(reqwest::Client::new(), "http://localhost:5000");
//! let (manager, client) = ResourceManager::new(api, ManagerOptions::default());
//! tokio::spawn(manager.run());
//!
//! client.open_add().await?;
//! client.set_field("department_name", "Computer Science").await?;
//! client.set_field("department_code", "CSE").await?;
//! client.submit().await?;
//!
//! let view = client.settled().await?;
//! assert_eq!(view.notification_text(), Some("Department created successfully!"));
//! ```
//!
//! ## Screen Lifecycle
//!
//! - **Fetch**: every fetch gets a ticket; only the latest ticket's response
//!   is applied. Failures keep the previous page and raise
//!   "Failed to fetch <resources>".
//! - **Search**: typed text is applied after a quiet period and always
//!   restarts at page 1.
//! - **Submit**: local validation first. Nothing reaches the network unless
//!   every rule passes; the first failing rule becomes the error
//!   notification. While a save is in flight the form refuses edits, cancel
//!   and another submit.
//! - **Delete**: request, then explicit confirmation, then the call.
//! - **After any mutation** the current page is re-fetched; nothing is
//!   patched locally.
//!
//! ## Concurrency Model
//!
//! - Each manager runs in its own Tokio task and owns its state outright
//! - Network calls run in spawned tasks and report back as messages
//! - Timers are owned handles; replacing or dropping one aborts it
//! - Dropping every client shuts the manager down
//!
//! ## Testing
//!
//! [`mock::MockApi`] scripts backend replies, can hold a reply back to
//! produce out-of-order responses, and records every call. Timer behaviour
//! is tested with paused Tokio time.

pub mod api;
pub mod client_trait;
pub mod error;
pub mod fields;
pub mod form;
pub mod list_store;
pub mod manager;
pub mod mock;
pub mod notification;
pub mod pagination;
pub mod schema;
pub mod store;
pub mod timer;
pub mod validation;

#[cfg(test)]
mod fixtures;

pub use api::{ApiError, HttpResourceApi, ListQuery, Page, ResourceApi};
pub use client_trait::PageClient;
pub use error::{FieldError, FrameworkError};
pub use fields::{Attachment, FieldValue};
pub use form::{FormMode, FormPhase};
pub use manager::{ManagerClient, ManagerOptions, ResourceManager, SubmitOutcome, ViewState};
pub use notification::{Notification, NotificationKind};
pub use pagination::{PaginationInfo, PAGE_SIZE};
pub use schema::{contains_ignore_case, Draft, ListFilter, RecordId, ResourceSchema, StoredResource};
pub use validation::{FieldErrors, Rule, ValidationReport, ValidationScope};
