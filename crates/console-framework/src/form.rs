//! # Form / Modal Lifecycle
//!
//! ```text
//! Closed ──open_add──▶ Editing(Add) ──submit ok──▶ Submitting(Add) ──saved──▶ Closed
//! Closed ─open_edit──▶ Editing(Edit) ─submit ok─▶ Submitting(Edit) ─saved──▶ Closed
//! Editing ──cancel──▶ Closed
//! Submitting ──failed──▶ Editing (same mode, draft kept)
//! ```
//!
//! A submit that fails validation stays in `Editing` with the field errors
//! set. While `Submitting`, edits, cancel and a second submit are refused.

use crate::error::FrameworkError;
use crate::fields::{Attachment, FieldValue};
use crate::schema::{Draft, ResourceSchema};
use crate::validation::{validate, FieldErrors, ValidationReport, ValidationScope};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode<Id> {
    Add,
    Edit(Id),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPhase<Id> {
    Closed,
    Editing(FormMode<Id>),
    Submitting(FormMode<Id>),
}

/// A validated draft ready to be sent.
#[derive(Debug, Clone)]
pub struct SavePlan<R: ResourceSchema> {
    pub mode: FormMode<R::Id>,
    pub draft: R::Draft,
}

#[derive(Debug, Clone)]
pub enum SubmitCheck<R: ResourceSchema> {
    Invalid(ValidationReport),
    Ready(SavePlan<R>),
}

#[derive(Debug, Clone)]
pub struct FormState<R: ResourceSchema> {
    phase: FormPhase<R::Id>,
    draft: R::Draft,
    field_errors: FieldErrors,
}

impl<R: ResourceSchema> Default for FormState<R> {
    fn default() -> Self {
        Self {
            phase: FormPhase::Closed,
            draft: R::Draft::default(),
            field_errors: FieldErrors::new(),
        }
    }
}

impl<R: ResourceSchema> FormState<R> {
    pub fn phase(&self) -> &FormPhase<R::Id> {
        &self.phase
    }

    pub fn draft(&self) -> &R::Draft {
        &self.draft
    }

    pub fn field_errors(&self) -> &FieldErrors {
        &self.field_errors
    }

    pub fn is_open(&self) -> bool {
        !matches!(self.phase, FormPhase::Closed)
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.phase, FormPhase::Submitting(_))
    }

    /// The id being edited, if any.
    pub fn editing_id(&self) -> Option<&R::Id> {
        match &self.phase {
            FormPhase::Editing(FormMode::Edit(id)) | FormPhase::Submitting(FormMode::Edit(id)) => Some(id),
            _ => None,
        }
    }

    fn ensure_idle(&self) -> Result<(), FrameworkError> {
        if self.is_submitting() {
            return Err(FrameworkError::SubmitInFlight);
        }
        Ok(())
    }

    fn ensure_editing(&self) -> Result<(), FrameworkError> {
        match self.phase {
            FormPhase::Closed => Err(FrameworkError::FormClosed),
            FormPhase::Submitting(_) => Err(FrameworkError::SubmitInFlight),
            FormPhase::Editing(_) => Ok(()),
        }
    }

    pub fn open_add(&mut self) -> Result<(), FrameworkError> {
        self.ensure_idle()?;
        self.phase = FormPhase::Editing(FormMode::Add);
        self.draft = R::Draft::default();
        self.field_errors.clear();
        Ok(())
    }

    pub fn open_edit(&mut self, record: &R) -> Result<(), FrameworkError> {
        self.ensure_idle()?;
        self.phase = FormPhase::Editing(FormMode::Edit(record.id().clone()));
        self.draft = record.to_draft();
        self.field_errors.clear();
        Ok(())
    }

    pub fn cancel(&mut self) -> Result<(), FrameworkError> {
        self.ensure_idle()?;
        self.reset();
        Ok(())
    }

    /// Binds an input value and clears that field's error.
    pub fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), FrameworkError> {
        self.ensure_editing()?;
        self.draft.set_field(name, value)?;
        self.field_errors.remove(name);
        Ok(())
    }

    /// Attaches (or clears) the draft's file.
    pub fn attach(&mut self, attachment: Option<Attachment>) -> Result<(), FrameworkError> {
        self.ensure_editing()?;
        let field = attachment.as_ref().map(|a| a.field);
        self.draft.set_attachment(attachment)?;
        if let Some(field) = field {
            self.field_errors.remove(field);
        }
        Ok(())
    }

    /// Validates the draft against the loaded page. On success the form
    /// moves to `Submitting` and the returned plan carries a copy of the draft.
    pub fn begin_submit(&mut self, records: &[R]) -> Result<SubmitCheck<R>, FrameworkError> {
        let mode = match &self.phase {
            FormPhase::Closed => return Err(FrameworkError::FormClosed),
            FormPhase::Submitting(_) => return Err(FrameworkError::SubmitInFlight),
            FormPhase::Editing(mode) => mode.clone(),
        };

        let editing = match &mode {
            FormMode::Edit(id) => Some(id),
            FormMode::Add => None,
        };
        let report = validate::<R>(&self.draft, &ValidationScope::new(records, editing));
        if !report.is_valid() {
            self.field_errors = report.errors.clone();
            return Ok(SubmitCheck::Invalid(report));
        }

        self.field_errors.clear();
        self.phase = FormPhase::Submitting(mode.clone());
        Ok(SubmitCheck::Ready(SavePlan {
            mode,
            draft: self.draft.clone(),
        }))
    }

    /// Resolves an in-flight submit: close on success, back to editing on failure.
    pub fn finish_submit(&mut self, saved: bool) {
        let FormPhase::Submitting(mode) = &self.phase else {
            return;
        };
        if saved {
            self.reset();
        } else {
            self.phase = FormPhase::Editing(mode.clone());
        }
    }

    fn reset(&mut self) {
        self.phase = FormPhase::Closed;
        self.draft = R::Draft::default();
        self.field_errors.clear();
    }
}
