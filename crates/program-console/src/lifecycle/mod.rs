//! # Console Lifecycle
//!
//! Starting, wiring and stopping the screens of the program console.
//!
//! ## Startup
//!
//! [`AdminConsole::start`] reads the backend from [`Settings`](crate::config::Settings):
//!
//! - **http**: one [`HttpResourceApi`](console_framework::HttpResourceApi) per
//!   screen over a shared `reqwest::Client` with the configured timeout.
//! - **memory**: one [`StoreActor`](console_framework::store::StoreActor) per
//!   screen. Each manager owns the only client of its store.
//!
//! Every screen's [`ResourceManager`](console_framework::ResourceManager) is
//! spawned in its own task and issues its first fetch immediately.
//!
//! ## Shutdown
//!
//! 1. **Drop all screen clients**, closing the managers' request channels
//! 2. **Managers exit**, dropping their API handles and any pending timers
//! 3. **Stores exit** once their last client (the manager's) is gone
//! 4. **Await every task** and report the first one that panicked
//!
//! ## Observability
//!
//! [`setup_tracing`] installs the subscriber used by the binary; see the
//! [`tracing`](self::tracing) module for filters and sample output.

pub mod admin_console;
pub mod tracing;

pub use admin_console::AdminConsole;
pub use self::tracing::setup_tracing;
