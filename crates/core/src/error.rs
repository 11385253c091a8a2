//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic business failures. Every fulfillment
/// operation fails fast with exactly one of these kinds; retrying never helps
/// because availability does not change by asking again.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A referenced record does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Requested quantity exceeds the stock on hand.
    #[error(
        "insufficient stock for product {product_id} in warehouse {warehouse_id}: \
         requested {requested}, available {available}"
    )]
    InsufficientStock {
        product_id: String,
        warehouse_id: String,
        requested: i64,
        available: i64,
    },

    /// The operation is not permitted in the record's current status.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// A vehicle or driver exists but is not available.
    #[error("resource unavailable: {0}")]
    ResourceUnavailable(String),

    /// Malformed input (unknown status name, non-positive quantity, bad id).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Uniqueness violation or stale record version.
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: impl core::fmt::Display) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn insufficient_stock(
        product_id: impl core::fmt::Display,
        warehouse_id: impl core::fmt::Display,
        requested: i64,
        available: i64,
    ) -> Self {
        Self::InsufficientStock {
            product_id: product_id.to_string(),
            warehouse_id: warehouse_id.to_string(),
            requested,
            available,
        }
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    pub fn resource_unavailable(msg: impl Into<String>) -> Self {
        Self::ResourceUnavailable(msg.into())
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// Stable machine-readable code for this error kind.
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::NotFound { .. } => "not_found",
            DomainError::InsufficientStock { .. } => "insufficient_stock",
            DomainError::InvalidState(_) => "invalid_state",
            DomainError::ResourceUnavailable(_) => "resource_unavailable",
            DomainError::InvalidArgument(_) => "invalid_argument",
            DomainError::Conflict(_) => "conflict",
        }
    }
}
