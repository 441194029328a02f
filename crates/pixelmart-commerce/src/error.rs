//! Commerce error types.

use crate::ids::ProductId;
use pixelmart_cache::CacheError;
use thiserror::Error;

/// Errors that can occur in storefront operations.
///
/// Pricing, filtering and sorting are total functions and never produce
/// these; they come from catalog loading, lookups and cart persistence.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// Cart line index out of range.
    #[error("Cart line not found: {0}")]
    LineItemNotFound(usize),

    /// Catalog record could not be interpreted.
    #[error("Invalid catalog record {id}: {reason}")]
    InvalidProduct { id: u64, reason: String },

    /// Storage backend failure.
    #[error("Storage error: {0}")]
    Storage(#[from] CacheError),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::SerializationError(e.to_string())
    }
}
