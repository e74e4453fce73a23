//! # Domain Model
//!
//! Record, draft and filter types of every screen in the program console.
//! Each record implements [`ResourceSchema`](console_framework::ResourceSchema)
//! for the screen itself and
//! [`StoredResource`](console_framework::StoredResource) so the in-memory
//! backend can serve it.

mod department;
mod program;
mod taxonomy;
mod training;

pub use department::*;
pub use program::*;
pub use taxonomy::*;
pub use training::*;

/// Optional text columns are stored as `None` rather than empty strings.
fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
