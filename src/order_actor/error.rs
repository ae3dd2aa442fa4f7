//! Error types for the Order actor.

use crate::lot_actor::StockError;
use crate::model::OrderStatus;
use thiserror::Error;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    /// The requested order was not found.
    #[error("Order not found: {0}")]
    NotFound(String),

    /// The order request was malformed (no items, zero quantity, missing client).
    #[error("Invalid order: {0}")]
    InvalidInput(String),

    /// A line item could not be covered by stock. No lot was changed and no order
    /// was stored.
    #[error("Insufficient stock for {product_name}")]
    InsufficientStock { product_name: String },

    #[error("Cannot move order from {from} to {to}")]
    InvalidStatusTransition { from: OrderStatus, to: OrderStatus },

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for OrderError {
    fn from(msg: String) -> Self {
        OrderError::ActorCommunicationError(msg)
    }
}

impl From<StockError> for OrderError {
    fn from(err: StockError) -> Self {
        match err {
            StockError::InsufficientStock { product, .. } => OrderError::InsufficientStock {
                product_name: product,
            },
            StockError::InvalidInput(msg) => OrderError::InvalidInput(msg),
            StockError::NotFound(id) => OrderError::NotFound(id),
            StockError::ActorCommunicationError(msg) => OrderError::ActorCommunicationError(msg),
        }
    }
}
