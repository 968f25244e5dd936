//! Sales record types.
//!
//! A `SalesRecord` is written exactly once per `(store_id, date)` key by a
//! cashier and is never modified afterwards. The digest it carries is the
//! reference every later audit compares against.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::Address;

/// Lowercase hex content hash of an uploaded file.
///
/// Equality is plain string equality: two digests that differ only in case
/// are different digests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Digest(pub String);

impl Digest {
    pub fn new(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Composite key of the sales ledger.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SalesKey {
    pub store_id: String,
    /// Business date as supplied by the caller, e.g. `"2024-01-01"`.
    pub date: String,
}

impl SalesKey {
    pub fn new(store_id: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            store_id: store_id.into(),
            date: date.into(),
        }
    }
}

impl fmt::Display for SalesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.store_id, self.date)
    }
}

/// Descriptive metadata about the uploaded file. Informational only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    pub file_name: Option<String>,
    pub file_size: Option<u64>,
}

/// The immutable record of one daily sales submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub key: SalesKey,
    pub digest: Digest,
    pub submitted_by: Address,
    pub submitted_at: DateTime<Utc>,
    #[serde(default)]
    pub file: FileMetadata,
}
