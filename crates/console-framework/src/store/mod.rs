//! In-process backing store, one actor per resource type.

mod actor;
mod client;
mod message;

pub use actor::StoreActor;
pub use client::StoreClient;
pub use message::StoreRequest;
