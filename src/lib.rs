//! # FEFO Fulfillment
//!
//! Lot-level stock keeping and order commitment for perishable goods, built on
//! resource actors.
//!
//! Stock is held as lots: a product, a lot code, an expiry date and a remaining
//! quantity. Placing an order allocates each line item from the product's lots
//! **first-expiry-first-out**, splitting across lots when one is not enough, and
//! records which lot supplied how much. An order either commits in full or changes
//! nothing.
//!
//! ## Module Tour
//!
//! ### 1. The Engine ([`allocation`])
//! Pure FEFO allocation over a set of lots, plus merging of duplicate cart rows.
//!
//! ### 2. The Actors ([`lot_actor`], [`order_actor`], [`audit_actor`])
//! [`ActorEntity`](resource_actor::ActorEntity) implementations for [`Lot`](model::Lot),
//! [`Order`](model::Order) and [`AuditEntry`](model::AuditEntry). Each collection lives
//! in its own actor and is mutated one request at a time.
//!
//! ### 3. The Interface ([`clients`])
//! [`StockClient`](clients::StockClient), [`OrderClient`](clients::OrderClient) and
//! [`AuditClient`](clients::AuditClient) wrap the generic resource client with domain
//! operations and typed errors.
//!
//! ### 4. The Orchestrator ([`lifecycle`])
//! [`FulfillmentSystem`](lifecycle::FulfillmentSystem) spawns and wires the actors,
//! restores and writes [`persistence`] snapshots, and shuts everything down.
//!
//! ## Concurrency
//!
//! An order's allocation runs as one transaction inside the Lot actor, and the Order
//! actor places orders one at a time. Two concurrent orders for the last units of a
//! product cannot both succeed.
//!
//! ## Running the Demo
//!
//! ```bash
//! RUST_LOG=info cargo run
//! FEFO_DATA_DIR=./data cargo run   # also writes stock.json, orders.json, audit.json
//! ```

pub mod allocation;
pub mod audit_actor;
pub mod clients;
pub mod config;
pub mod lifecycle;
pub mod lot_actor;
pub mod model;
pub mod order_actor;
pub mod persistence;
