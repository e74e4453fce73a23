//! # Resource Schema
//!
//! The `ResourceSchema` trait is the contract every managed entity (department,
//! taxonomy level, program outcome, ...) implements. It names the draft type
//! edited by the form, the list filter used for scoped fetches, the endpoint,
//! the labels used in notifications and the ordered validation rules.
//!
//! The [`ResourceManager`](crate::ResourceManager) is written once against this
//! trait; each screen is just an implementation of it.
//!
//! # Provided Methods
//! - [`ResourceSchema::created_message`] and friends build the notification
//!   texts from the labels. Override them only when a screen needs different
//!   wording.

use crate::error::FieldError;
use crate::fields::{Attachment, FieldValue};
use crate::validation::Rule;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Identifier assigned by the backing store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u32);

impl From<u32> for RecordId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The in-progress, unsaved edit state of a resource.
///
/// Drafts serialize to the create/update payload. Field bindings go through
/// [`Draft::field`] and [`Draft::set_field`] so the generic form can read and
/// write any screen's inputs by name.
pub trait Draft: Clone + Default + Debug + Serialize + Send + Sync + 'static {
    /// File-bearing forms submit multipart bodies even when no file is
    /// attached.
    const MULTIPART: bool = false;

    /// Current value of a named field, or `None` for an unknown name.
    fn field(&self, name: &str) -> Option<FieldValue>;

    /// Writes a named field. List fields accept delimited text and re-split it.
    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), FieldError>;

    /// Binary attachment for file-bearing forms.
    fn attachment(&self) -> Option<&Attachment> {
        None
    }

    /// Replaces or clears the attachment. Drafts without one reject it.
    fn set_attachment(&mut self, _attachment: Option<Attachment>) -> Result<(), FieldError> {
        Err(FieldError::UnknownField("attachment".to_string()))
    }
}

/// Narrows a list fetch to one parent context.
pub trait ListFilter: Clone + Default + Debug + PartialEq + Send + Sync + 'static {
    /// Extra query parameters sent with a paginated list request.
    fn query(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }

    /// Path of a scoped fetch, relative to the API base. When present the
    /// fetch bypasses pagination and returns the full scoped set.
    fn scoped_path(&self, _endpoint: &str) -> Option<String> {
        None
    }
}

impl ListFilter for () {}

/// Trait that any resource must implement to be managed by `ResourceManager`.
pub trait ResourceSchema: Clone + Debug + DeserializeOwned + Send + Sync + 'static {
    /// Backend identifier. Numeric on the wire, hence `From<u32>`.
    type Id: Eq
        + Ord
        + Hash
        + Clone
        + Debug
        + Display
        + From<u32>
        + Serialize
        + DeserializeOwned
        + Send
        + Sync
        + 'static;

    /// Editable form state, serialized as the create/update payload.
    type Draft: Draft;

    /// Parent filter; use `()` when the screen has none.
    type Filter: ListFilter;

    /// Singular label, e.g. "Department".
    const LABEL: &'static str;

    /// Plural, lower case, e.g. "departments".
    const PLURAL: &'static str;

    /// Collection path relative to the API base, e.g. "/api/departments".
    const ENDPOINT: &'static str;

    fn id(&self) -> &Self::Id;

    /// Deep copy of the editable fields.
    fn to_draft(&self) -> Self::Draft;

    /// Validation rules in declaration order. The first failing rule provides
    /// the notification text.
    fn rules() -> Vec<Rule<Self>>;

    fn created_message() -> String {
        format!("{} created successfully!", Self::LABEL)
    }

    fn updated_message() -> String {
        format!("{} updated successfully!", Self::LABEL)
    }

    fn deleted_message() -> String {
        format!("{} deleted successfully!", Self::LABEL)
    }

    fn fetch_failed_message() -> String {
        format!("Failed to fetch {}", Self::PLURAL)
    }

    fn save_failed_message() -> String {
        format!("Failed to save {}", Self::LABEL.to_lowercase())
    }

    fn delete_failed_message() -> String {
        format!("Failed to delete {}", Self::LABEL.to_lowercase())
    }
}

/// A resource the in-memory [`StoreActor`](crate::store::StoreActor) can hold.
///
/// This is the backing-store half of a schema: building records from drafts,
/// applying updates, and answering search and scope queries.
pub trait StoredResource: ResourceSchema {
    /// Construct the full record from the assigned ID and a draft.
    fn from_draft(id: Self::Id, draft: Self::Draft) -> Self;

    /// Overwrite the editable fields from a draft.
    fn apply_draft(&mut self, draft: Self::Draft);

    /// Free-text search over the searchable columns.
    fn matches_search(&self, term: &str) -> bool;

    /// Whether the record belongs to the filtered parent context.
    fn in_scope(&self, _filter: &Self::Filter) -> bool {
        true
    }

    /// Backend-side uniqueness: a message when `draft` would collide with
    /// this record.
    fn conflict_with(&self, _draft: &Self::Draft) -> Option<String> {
        None
    }
}

/// Case-insensitive substring match used by `matches_search` implementations.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
