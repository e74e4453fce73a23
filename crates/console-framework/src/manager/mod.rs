//! The per-screen orchestrator: [`ResourceManager`] and its [`ManagerClient`].

mod actor;
mod client;
mod message;
mod view;

pub use actor::{ManagerOptions, ResourceManager};
pub use client::ManagerClient;
pub use message::{ManagerRequest, SubmitOutcome};
pub use view::ViewState;
