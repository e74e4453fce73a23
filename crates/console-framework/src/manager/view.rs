use crate::fields::FieldValue;
use crate::form::{FormMode, FormPhase};
use crate::notification::Notification;
use crate::pagination::PaginationInfo;
use crate::schema::{Draft, ResourceSchema};
use crate::validation::FieldErrors;

/// Everything a screen renders, published after every event the manager
/// handles.
#[derive(Debug, Clone)]
pub struct ViewState<R: ResourceSchema> {
    pub records: Vec<R>,
    pub pagination: PaginationInfo,
    pub loading: bool,
    /// Search text as typed, which may not be applied yet.
    pub search: String,
    /// True while a debounced search is waiting to be applied.
    pub search_pending: bool,
    pub filter: R::Filter,
    pub form: FormPhase<R::Id>,
    pub draft: R::Draft,
    pub field_errors: FieldErrors,
    pub notification: Option<Notification>,
    /// Record awaiting delete confirmation.
    pub pending_delete: Option<R::Id>,
    pub deleting: bool,
}

impl<R: ResourceSchema> Default for ViewState<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            pagination: PaginationInfo::default(),
            loading: false,
            search: String::new(),
            search_pending: false,
            filter: R::Filter::default(),
            form: FormPhase::Closed,
            draft: R::Draft::default(),
            field_errors: FieldErrors::new(),
            notification: None,
            pending_delete: None,
            deleting: false,
        }
    }
}

impl<R: ResourceSchema> ViewState<R> {
    pub fn is_modal_open(&self) -> bool {
        !matches!(self.form, FormPhase::Closed)
    }

    /// The submit control is disabled while this is true.
    pub fn is_saving(&self) -> bool {
        matches!(self.form, FormPhase::Submitting(_))
    }

    pub fn is_editing(&self, id: &R::Id) -> bool {
        matches!(&self.form, FormPhase::Editing(FormMode::Edit(current)) | FormPhase::Submitting(FormMode::Edit(current)) if current == id)
    }

    /// No fetch, save, delete or debounce outstanding.
    pub fn is_idle(&self) -> bool {
        !self.loading && !self.is_saving() && !self.deleting && !self.search_pending
    }

    pub fn field(&self, name: &str) -> Option<FieldValue> {
        self.draft.field(name)
    }

    pub fn notification_text(&self) -> Option<&str> {
        self.notification.as_ref().map(|n| n.text.as_str())
    }
}
