//! # Observability & Tracing
//!
//! Structured logging for every actor in the process.
//!
//! The run loop logs with an `entity_type` field instead of the module path, so the
//! subscriber hides targets (`with_target(false)`) and uses the compact format, which
//! prints enclosing spans inline (`place_order:allocate_order: Transaction committed`).
//!
//! ```bash
//! RUST_LOG=info cargo run      # lifecycle and outcomes
//! RUST_LOG=debug cargo run     # full request payloads
//! RUST_LOG=resource_actor=warn,fefo_fulfillment=debug cargo run
//! ```
//!
//! Without `RUST_LOG` the filter defaults to `info`.

use tracing_subscriber::EnvFilter;

/// Initializes the global subscriber.
///
/// Safe to call more than once; later calls are no-ops, which lets every test
/// call it freely.
pub fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init();
}
