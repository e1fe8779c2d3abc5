use thiserror::Error;

/// Failure recorded by a store after a fetch settles. Stored in the store's
/// `last_error` slot rather than returned, so snapshots must be cloneable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("request failed: {0}")]
    Network(String),
    #[error("{detail}")]
    ApplicationRejected { detail: String },
    #[error("invalid data format received from the API")]
    InvalidShape,
}
