//! Cart error types.

use thiserror::Error;

/// Errors that can occur in cart operations.
///
/// Every variant is returned before any mutation happens; a failed
/// operation leaves the cart exactly as it was.
#[derive(Error, Debug)]
pub enum CartError {
    /// Product snapshot is missing a required field.
    #[error("Invalid item: {0}")]
    InvalidItem(String),

    /// Quantity is not a positive integer.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Item not in cart.
    #[error("Item not in cart: {0}")]
    NotFound(String),

    /// Quantity exceeds maximum allowed.
    #[error("Quantity {0} exceeds maximum allowed ({1})")]
    QuantityExceedsLimit(i64, i64),

    /// Currency mismatch.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// Checkout attempted on an empty cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Persistence layer error.
    #[error("Cache error: {0}")]
    Cache(#[from] pantry_cache::CacheError),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for CartError {
    fn from(e: serde_json::Error) -> Self {
        CartError::SerializationError(e.to_string())
    }
}
