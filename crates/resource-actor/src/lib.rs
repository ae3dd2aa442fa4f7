//! # Resource Actor
//!
//! A small runtime for keeping collections of stateful entities behind Tokio actors.
//!
//! Each resource type (stock lots, orders, audit entries) gets one [`ResourceActor`]
//! that owns its entities in a `HashMap` and processes requests strictly one at a
//! time. Callers talk to it through a cloneable [`ResourceClient`].
//!
//! ## Requests
//!
//! - **CRUD**: `create`, `get`, `update` (returns [`Updated`] before/after), `delete`
//!   (returns the removed entity).
//! - **Actions**: resource-specific operations via [`ActorEntity::Action`].
//! - **Collection level**: `list` for snapshots, `import` to restore saved entities,
//!   `inspect` to read the collection together with other actors reached through the
//!   context, and `transact` to mutate many entities atomically on a working copy
//!   (see [`transaction`]).
//!
//! ## Concurrency Model
//!
//! One task per actor, one message at a time. Anything done inside a single request,
//! including a whole transaction, is serialized against every other request to the
//! same actor. Different actors run in parallel.
//!
//! ## Errors
//!
//! Channel failures surface as [`FrameworkError`]. Entity hook errors are boxed into
//! [`FrameworkError::EntityError`] and can be recovered with
//! [`FrameworkError::downcast_entity`].
//!
//! ## Testing
//!
//! The [`mock`] module serves a [`ResourceClient`] from scripted expectations, so
//! domain clients can be tested without a running actor.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;
pub mod tracing;
pub mod transaction;

pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{BoxFuture, InspectOp, ResourceRequest, Response, Updated};
pub use transaction::{Transaction, TransactionOp};
