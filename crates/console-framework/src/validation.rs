//! # Validation Engine
//!
//! Synchronous, per-field rules evaluated in declaration order against a
//! draft. Uniqueness rules only see the page of records currently loaded in
//! the list store, not the whole backing collection.
//!
//! ```rust,ignore
//! fn rules() -> Vec<Rule<Self>> {
//!     vec![
//!         Rule::required("department_name", "Department name is required"),
//!         Rule::max_len("department_name", 100, "Department name must be at most 100 characters"),
//!         Rule::unique("department_code", "Department code already exists"),
//!     ]
//! }
//! ```

use crate::fields::FieldValue;
use crate::schema::{Draft, ResourceSchema};
use regex::Regex;
use std::collections::BTreeMap;

/// Field name to message, one entry per failing field.
pub type FieldErrors = BTreeMap<&'static str, String>;

/// What a rule can see besides the draft itself.
pub struct ValidationScope<'a, R: ResourceSchema> {
    /// The page of records currently loaded.
    pub records: &'a [R],
    /// The record being edited, excluded from uniqueness checks.
    pub editing: Option<&'a R::Id>,
}

impl<'a, R: ResourceSchema> ValidationScope<'a, R> {
    pub fn new(records: &'a [R], editing: Option<&'a R::Id>) -> Self {
        Self { records, editing }
    }
}

type Check<R> =
    Box<dyn Fn(&<R as ResourceSchema>::Draft, &ValidationScope<'_, R>) -> bool + Send + Sync>;

/// One validation rule bound to a field.
pub struct Rule<R: ResourceSchema> {
    field: &'static str,
    message: String,
    check: Check<R>,
}

impl<R: ResourceSchema> Rule<R> {
    /// Wraps an arbitrary predicate; it returns `true` when the draft passes.
    pub fn custom<F>(field: &'static str, message: impl Into<String>, check: F) -> Self
    where
        F: Fn(&R::Draft, &ValidationScope<'_, R>) -> bool + Send + Sync + 'static,
    {
        Self {
            field,
            message: message.into(),
            check: Box::new(check),
        }
    }

    pub fn required(field: &'static str, message: impl Into<String>) -> Self {
        Self::custom(field, message, move |draft, _| {
            draft.field(field).is_some_and(|value| !value.is_blank())
        })
    }

    /// Minimum length in characters of the trimmed text. Blank values pass.
    pub fn min_len(field: &'static str, min: usize, message: impl Into<String>) -> Self {
        Self::custom(field, message, move |draft, _| {
            text_of(draft, field).map_or(true, |text| text.chars().count() >= min)
        })
    }

    /// Maximum length in characters of the trimmed text.
    pub fn max_len(field: &'static str, max: usize, message: impl Into<String>) -> Self {
        Self::custom(field, message, move |draft, _| {
            text_of(draft, field).map_or(true, |text| text.chars().count() <= max)
        })
    }

    /// Inclusive numeric range. Blank values pass; non-numeric values fail.
    pub fn range(field: &'static str, min: f64, max: f64, message: impl Into<String>) -> Self {
        Self::custom(field, message, move |draft, _| match draft.field(field) {
            None => true,
            Some(value) if value.is_blank() => true,
            Some(value) => value.as_number().is_some_and(|n| n >= min && n <= max),
        })
    }

    /// Full-text regex match on the trimmed value. Blank values pass.
    pub fn pattern(field: &'static str, pattern: &'static Regex, message: impl Into<String>) -> Self {
        Self::custom(field, message, move |draft, _| {
            text_of(draft, field).map_or(true, |text| pattern.is_match(&text))
        })
    }

    /// Case-insensitive uniqueness against the loaded page, ignoring the
    /// record being edited.
    pub fn unique(field: &'static str, message: impl Into<String>) -> Self {
        Self::custom(field, message, move |draft, scope| {
            let Some(candidate) = text_of(draft, field).map(|t| t.to_lowercase()) else {
                return true;
            };
            !scope
                .records
                .iter()
                .filter(|record| scope.editing != Some(record.id()))
                .filter_map(|record| record.to_draft().field(field))
                .any(|existing| existing.display().trim().to_lowercase() == candidate)
        })
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    fn passes(&self, draft: &R::Draft, scope: &ValidationScope<'_, R>) -> bool {
        (self.check)(draft, scope)
    }
}

/// Trimmed display text, or `None` when the field is blank or unknown.
fn text_of<D: Draft>(draft: &D, field: &str) -> Option<String> {
    draft
        .field(field)
        .filter(|value| !value.is_blank())
        .map(|value: FieldValue| value.display().trim().to_string())
}

/// Result of running every rule against a draft.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    pub errors: FieldErrors,
    /// Message of the first failing rule, in declaration order.
    pub first_message: Option<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Runs `R::rules()` against a draft.
///
/// Every rule runs so each input can be flagged; only the first failure per
/// field is kept, and the report remembers the first failure overall.
pub fn validate<R: ResourceSchema>(draft: &R::Draft, scope: &ValidationScope<'_, R>) -> ValidationReport {
    let mut report = ValidationReport::default();
    for rule in R::rules() {
        if rule.passes(draft, scope) {
            continue;
        }
        if report.first_message.is_none() {
            report.first_message = Some(rule.message.clone());
        }
        report.errors.entry(rule.field).or_insert(rule.message);
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{room, valid_draft, Room, RoomDraft};
    use crate::schema::RecordId;

    #[test]
    fn test_first_message_follows_declaration_order() {
        let draft = RoomDraft {
            name: String::new(),
            code: "lower".into(),
            seats: Some(0),
            ..Default::default()
        };
        let report = validate::<Room>(&draft, &ValidationScope::new(&[], None));

        assert!(!report.is_valid());
        assert_eq!(report.first_message.as_deref(), Some("Room name is required"));
        assert_eq!(report.errors.len(), 3);
        assert_eq!(report.errors["code"], "Room code must be 2-4 capital letters");
        assert_eq!(report.errors["seats"], "Seats must be between 1 and 500");
    }

    #[test]
    fn test_one_error_per_field_keeps_the_earliest() {
        let draft = RoomDraft {
            name: "A".into(),
            code: "AB".into(),
            seats: None,
            ..Default::default()
        };
        let report = validate::<Room>(&draft, &ValidationScope::new(&[], None));
        assert_eq!(report.errors["name"], "Room name must be at least 3 characters");
        assert_eq!(report.errors.len(), 1);
    }

    #[test]
    fn test_unique_checks_loaded_page_and_skips_edited_record() {
        let page = vec![room(1, "LAB"), room(2, "AUD")];
        let draft = RoomDraft {
            name: "Lab annex".into(),
            code: "lab".to_uppercase(),
            seats: Some(20),
            ..Default::default()
        };

        let creating = validate::<Room>(&draft, &ValidationScope::new(&page, None));
        assert_eq!(creating.first_message.as_deref(), Some("Room code already exists"));

        let editing_self = validate::<Room>(&draft, &ValidationScope::new(&page, Some(&RecordId(1))));
        assert!(editing_self.is_valid());
    }

    #[test]
    fn test_valid_draft_produces_empty_report() {
        let draft = valid_draft("SEM");
        let report = validate::<Room>(&draft, &ValidationScope::new(&[], None));
        assert!(report.is_valid());
        assert!(report.first_message.is_none());
    }
}
