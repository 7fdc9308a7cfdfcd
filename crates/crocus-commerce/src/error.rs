//! Commerce error types.

use thiserror::Error;

use crate::voucher::SpinRejection;

/// Errors that can occur in storefront operations.
///
/// Missing ids are not errors: store operations on an unknown cart line,
/// address or post are silent no-ops that report `false`.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Invalid quantity.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(u32),

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in quantity calculation")]
    Overflow,

    /// Operation needs a logged-in user.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Actor may not perform the operation.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Checkout incomplete.
    #[error("Checkout incomplete: missing {0}")]
    CheckoutIncomplete(String),

    /// Voucher wheel misconfigured.
    #[error("Invalid wheel: {0}")]
    InvalidWheel(String),

    /// Spin request was rejected.
    #[error("Spin rejected: {0}")]
    SpinRejected(#[from] SpinRejection),

    /// Cache error.
    #[error("Cache error: {0}")]
    CacheError(#[from] crocus_cache::CacheError),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::SerializationError(e.to_string())
    }
}
