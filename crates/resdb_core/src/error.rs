//! Error types for ResDB core.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur while localizing a transaction.
///
/// Every variant is fatal for the whole batch: the caller must discard
/// the entire result and must not persist any partially-rewritten
/// operation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// An operation's target key has no recognizable authority.
    #[error("client provided a key without a base: {key}")]
    UnqualifiedKey {
        /// The offending key.
        key: String,
    },

    /// A provisional reference has no identity-map entry.
    #[error("reference does not point to a resource in the store or the current transaction: {reference}")]
    UnresolvedReference {
        /// The unresolved reference.
        reference: String,
    },

    /// The same original identity was localized twice in one batch.
    #[error("identity localized twice in one transaction: {key}")]
    DuplicateIdentity {
        /// The duplicated original key.
        key: String,
    },
}

impl CoreError {
    /// Creates an unqualified key error.
    pub fn unqualified_key(key: impl Into<String>) -> Self {
        Self::UnqualifiedKey { key: key.into() }
    }

    /// Creates an unresolved reference error.
    pub fn unresolved_reference(reference: impl Into<String>) -> Self {
        Self::UnresolvedReference {
            reference: reference.into(),
        }
    }

    /// Creates a duplicate identity error.
    pub fn duplicate_identity(key: impl Into<String>) -> Self {
        Self::DuplicateIdentity { key: key.into() }
    }
}
