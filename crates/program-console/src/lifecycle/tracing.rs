//! # Tracing Setup
//!
//! Compact `tracing-subscriber` output filtered by `RUST_LOG`.
//!
//! ```bash
//! RUST_LOG=info cargo run      # manager and store lifecycle, saves, deletes
//! RUST_LOG=debug cargo run     # every request, fetch and page
//! RUST_LOG=console_framework=debug,program_console=info cargo run
//! ```
//!
//! With `RUST_LOG=debug` and the in-memory backend, a create on the
//! departments screen reads:
//!
//! ```text
//! DEBUG create_department{code=CSE}: Sending request
//! DEBUG Saving resource="departments" mode=Add
//! INFO Created resource="departments" id=1 size=1
//! INFO Saved resource="departments" mode=Add
//! DEBUG Fetch resource="departments" page=1 search= ticket=FetchTicket(2)
//! ```
//!
//! Stale responses and failed calls are logged at `warn`.

/// Installs the global subscriber. Call once, at startup.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
