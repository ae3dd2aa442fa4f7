//! # Order Actor
//!
//! Keeps orders and commits them against stock.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](resource_actor::ActorEntity) implementation for [`Order`]
//! - [`error`] - [`OrderError`]
//! - [`new()`] - creates the actor and its client
//!
//! ## Dependencies
//!
//! The actor's context is a [`StockClient`](crate::clients::StockClient), injected at
//! `run()` time:
//!
//! ```rust,ignore
//! let (order_actor, order_client) = order_actor::new(32);
//! tokio::spawn(order_actor.run(stock_client.clone()));
//! ```
//!
//! Orders are created one at a time by this actor, and each creation waits for its
//! stock transaction to finish, so two orders never allocate from the same snapshot.
//! Status updates go through the same actor but never touch stock.

pub mod entity;
pub mod error;

pub use error::*;

use crate::model::Order;
use resource_actor::{ResourceActor, ResourceClient};

/// Creates a new Order actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Order>, ResourceClient<Order>) {
    ResourceActor::new(buffer_size)
}
