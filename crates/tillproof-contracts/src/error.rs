//! Error types for the Tillproof ledger.
//!
//! All fallible operations return `LedgerResult<T>`. Every variant is
//! recoverable; the boundary layer decides how each is presented.

use thiserror::Error;

use crate::identity::Role;

/// The unified error type for the Tillproof crates.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The caller's address holds no role at all.
    #[error("address '{address}' is not registered")]
    Unauthenticated { address: String },

    /// The caller holds a role, but not the one the operation requires.
    #[error("address '{address}' holds role '{held}' but '{required}' is required")]
    Forbidden {
        address: String,
        held: Role,
        required: Role,
    },

    /// A role name outside `admin`, `auditor`, `cashier`.
    #[error("invalid role '{role}'")]
    InvalidRole { role: String },

    /// The address failed the structural (prefix/length) check.
    #[error("invalid address format '{address}': {reason}")]
    InvalidAddressFormat { address: String, reason: String },

    /// A sales record already exists for this key.
    #[error("sales record for store '{store_id}' on '{date}' already exists")]
    DuplicateKey { store_id: String, date: String },

    /// Verification was requested for a key nobody submitted.
    #[error("no sales record for store '{store_id}' on '{date}'")]
    RecordNotFound { store_id: String, date: String },

    /// The operation would leave the ledger without an admin.
    #[error("cannot remove or demote '{address}': it is the last admin")]
    LastAdmin { address: String },

    /// Revoke targeted an address with no identity record.
    #[error("address '{address}' has no role to revoke")]
    NotFound { address: String },

    /// One or more required request fields were blank.
    #[error("missing required fields: {}", fields.join(", "))]
    MissingFields { fields: Vec<String> },

    /// The upload exceeded the configured size limit.
    #[error("file of {size} bytes exceeds the {limit} byte limit")]
    FileTooLarge { size: u64, limit: u64 },

    /// The upload's extension is not on the allow-list.
    #[error("file type '{extension}' is not allowed")]
    UnsupportedFileType { extension: String },

    /// The persistence provider failed or a lock was poisoned.
    #[error("storage error: {reason}")]
    Storage { reason: String },

    /// A stored hash chain failed verification.
    #[error("integrity violation: {reason}")]
    IntegrityViolation { reason: String },

    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },
}

/// Convenience alias used throughout the Tillproof crates.
pub type LedgerResult<T> = Result<T, LedgerError>;
