//! # Lot Store
//!
//! The authoritative collection of stock lots, kept by a [`ResourceActor<Lot>`].
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](resource_actor::ActorEntity) implementation for [`Lot`]
//! - [`error`] - [`StockError`], shared with the allocation engine
//! - [`new()`] - creates the actor and its client
//!
//! The store itself never writes audit records; [`StockClient`](crate::clients::StockClient)
//! pairs every mutation with one.
//!
//! ## Usage
//!
//! ```rust
//! use fefo_fulfillment::lot_actor;
//! use fefo_fulfillment::clients::{AuditClient, StockClient};
//! use fefo_fulfillment::audit_actor;
//! use fefo_fulfillment::model::{LotCreate, ProductId};
//! use chrono::NaiveDate;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (audit, audit_client) = audit_actor::new(32);
//!     let (lots, lot_client) = lot_actor::new(32);
//!     tokio::spawn(audit.run(()));
//!     tokio::spawn(lots.run(()));
//!
//!     let stock = StockClient::new(lot_client, AuditClient::new(audit_client));
//!     let id = stock
//!         .add_stock_lot(LotCreate {
//!             product_id: ProductId::new("P"),
//!             product_name: "Saline 500ml".into(),
//!             lot_code: "A".into(),
//!             expires_at: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
//!             quantity: 5,
//!         })
//!         .await?;
//!     stock.adjust_stock_lot(id, 4).await?;
//!     Ok(())
//! }
//! ```

pub mod entity;
pub mod error;

pub use error::*;

use crate::model::Lot;
use resource_actor::{ResourceActor, ResourceClient};

/// Creates a new Lot actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Lot>, ResourceClient<Lot>) {
    ResourceActor::new(buffer_size)
}
