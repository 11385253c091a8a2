use thiserror::Error;

use marketerp_core::DomainError;

/// Failure of a fulfillment operation.
///
/// Business rejections pass through unchanged as [`FulfillmentError::Domain`];
/// [`FulfillmentError::Store`] is reserved for the backend itself failing.
#[derive(Debug, Error)]
pub enum FulfillmentError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The persistence backend failed (e.g. a poisoned lock). Nothing was committed.
    #[error("store failure: {0}")]
    Store(String),
}

impl FulfillmentError {
    pub fn domain(&self) -> Option<&DomainError> {
        match self {
            FulfillmentError::Domain(e) => Some(e),
            FulfillmentError::Store(_) => None,
        }
    }

    /// Stable machine-readable code (used in logs and HTTP error bodies).
    pub fn code(&self) -> &'static str {
        match self {
            FulfillmentError::Domain(e) => e.code(),
            FulfillmentError::Store(_) => "store_failure",
        }
    }
}
