//! Type-safe wrappers around [`ResourceClient`](resource_actor::ResourceClient).
//!
//! Callers never see raw requests or [`FrameworkError`](resource_actor::FrameworkError):
//! each client speaks its actor's domain operations and error type.

pub mod audit_client;
pub mod order_client;
pub mod stock_client;

pub use audit_client::*;
pub use order_client::*;
pub use resource_actor::ActorClient;
pub use stock_client::*;
