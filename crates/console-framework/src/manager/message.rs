//! # Manager Messages
//!
//! [`ManagerRequest`] is what a [`ManagerClient`](super::ManagerClient)
//! sends: one variant per user action on a screen. [`Completion`] is the
//! manager's private inbox for results of work it started itself (API calls
//! and the search debounce).

use crate::api::{ApiError, Page};
use crate::error::FrameworkError;
use crate::fields::{Attachment, FieldValue};
use crate::form::FormMode;
use crate::list_store::FetchTicket;
use crate::schema::ResourceSchema;
use crate::validation::ValidationReport;
use tokio::sync::oneshot;

pub type Reply<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// What happened to a submit request.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Validation failed locally; nothing was sent.
    Invalid(ValidationReport),
    /// The create/update call is in flight.
    Sent,
}

#[derive(Debug)]
pub enum ManagerRequest<R: ResourceSchema> {
    Refresh {
        respond_to: Reply<()>,
    },
    Search {
        text: String,
        respond_to: Reply<()>,
    },
    SetFilter {
        filter: R::Filter,
        respond_to: Reply<()>,
    },
    /// Replies `true` when a fetch was issued, `false` for a no-op.
    GoTo {
        page: u32,
        respond_to: Reply<bool>,
    },
    NextPage {
        respond_to: Reply<bool>,
    },
    PrevPage {
        respond_to: Reply<bool>,
    },
    OpenAdd {
        respond_to: Reply<()>,
    },
    OpenEdit {
        id: R::Id,
        respond_to: Reply<()>,
    },
    SetField {
        name: String,
        value: FieldValue,
        respond_to: Reply<()>,
    },
    Attach {
        attachment: Option<Attachment>,
        respond_to: Reply<()>,
    },
    Cancel {
        respond_to: Reply<()>,
    },
    Submit {
        respond_to: Reply<SubmitOutcome>,
    },
    RequestDelete {
        id: R::Id,
        respond_to: Reply<()>,
    },
    ConfirmDelete {
        respond_to: Reply<()>,
    },
    CancelDelete {
        respond_to: Reply<()>,
    },
    Dismiss {
        respond_to: Reply<()>,
    },
}

pub(crate) enum Completion<R: ResourceSchema> {
    Fetched {
        ticket: FetchTicket,
        result: Result<Page<R>, ApiError>,
    },
    Saved {
        mode: FormMode<R::Id>,
        result: Result<(), ApiError>,
    },
    Deleted {
        id: R::Id,
        result: Result<(), ApiError>,
    },
    SearchSettled {
        generation: u64,
    },
}
