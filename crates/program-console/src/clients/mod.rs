//! # Screen Clients
//!
//! One typed client per console screen. Each wraps the screen's
//! [`ManagerClient`](console_framework::ManagerClient), gets the generic list,
//! form and delete actions from [`PageClient`], and adds the handful of
//! operations specific to its entity.

pub mod department_client;
pub mod program_client;
pub mod taxonomy_client;
pub mod training_client;

pub use department_client::*;
pub use program_client::*;
pub use taxonomy_client::*;
pub use training_client::*;

use crate::error::ConsoleError;
use console_framework::{Draft, PageClient, ResourceSchema, SubmitOutcome};

/// Binds every listed field of `draft` into the open form.
pub(crate) async fn fill<R, C>(client: &C, draft: &R::Draft, fields: &[&str]) -> Result<(), ConsoleError>
where
    R: ResourceSchema,
    C: PageClient<R, Error = ConsoleError>,
{
    for name in fields {
        if let Some(value) = draft.field(name) {
            client.set_field(name, value).await?;
        }
    }
    Ok(())
}

/// Opens the add form, binds the draft and submits it.
pub(crate) async fn add<R, C>(client: &C, draft: &R::Draft, fields: &[&str]) -> Result<SubmitOutcome, ConsoleError>
where
    R: ResourceSchema,
    C: PageClient<R, Error = ConsoleError>,
{
    client.open_add().await?;
    fill(client, draft, fields).await?;
    client.submit().await
}

/// Opens the edit form for `id`, rebinds the draft and submits it.
pub(crate) async fn edit<R, C>(
    client: &C,
    id: R::Id,
    draft: &R::Draft,
    fields: &[&str],
) -> Result<SubmitOutcome, ConsoleError>
where
    R: ResourceSchema,
    C: PageClient<R, Error = ConsoleError>,
{
    client.open_edit(id).await?;
    fill(client, draft, fields).await?;
    client.submit().await
}
