//! Error types for the Lot actor and the allocation engine.

use thiserror::Error;

/// Errors that can occur during stock operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StockError {
    /// The requested lot was not found.
    #[error("Lot not found: {0}")]
    NotFound(String),

    /// A quantity or required field was invalid. Nothing was changed.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The product's lots hold fewer units than requested.
    #[error("Insufficient stock for {product}: requested {requested}, available {available}")]
    InsufficientStock {
        product: String,
        requested: u32,
        available: u32,
    },

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl StockError {
    /// Replaces the product reference in an `InsufficientStock` error with a display
    /// name. Other variants pass through.
    pub fn for_product(self, name: &str) -> Self {
        match self {
            StockError::InsufficientStock {
                requested,
                available,
                ..
            } => StockError::InsufficientStock {
                product: name.to_string(),
                requested,
                available,
            },
            other => other,
        }
    }
}

impl From<String> for StockError {
    fn from(msg: String) -> Self {
        StockError::ActorCommunicationError(msg)
    }
}
