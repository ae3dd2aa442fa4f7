//! # System Lifecycle
//!
//! Starts, wires, persists and stops the three actors.
//!
//! ## Wiring
//!
//! ```text
//!  OrderClient ──► Order actor ──(context: StockClient)──► Lot actor
//!                                         │
//!                                         └──► Audit actor
//! ```
//!
//! The Order actor gets its [`StockClient`](crate::clients::StockClient) at `run()`
//! time, not at construction. Actors are created first, then spawned with their
//! dependencies.
//!
//! ## Shutdown
//!
//! Dropping the system's clients closes the Order actor's channel. When it exits it
//! drops its `StockClient`, which closes the Lot actor, which in turn lets the Audit
//! actor finish. [`FulfillmentSystem::shutdown`] awaits the tasks in that order.
//! Clients cloned out of the system keep their actors alive until they are dropped too.

pub mod fulfillment_system;

pub use fulfillment_system::*;
pub use resource_actor::tracing::setup_tracing;
