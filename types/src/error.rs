//! Validation errors for incoming petitions.

use thiserror::Error;

/// Why a submitted petition was rejected before reaching the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Title or description was absent or empty. The message is part of the
    /// HTTP contract and is shown to users verbatim.
    #[error("Missing title or description")]
    MissingField,
}
