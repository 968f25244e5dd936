//! Log entry and snapshot types.
//!
//! `LogEntry` wraps one event with its sequence number and the SHA-256
//! hashes that make tampering detectable. `StoreSnapshot` is the byte-level
//! unit an external storage collaborator persists.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tillproof_contracts::{
    events::{AdminActionEvent, AuditEvent},
    sales::SalesRecord,
};
use tillproof_core::traits::IdentitySnapshot;

/// The sentinel `prev_hash` of the first entry in every chain: 64 hex zeros.
pub const GENESIS_HASH: &str = "0000000000000000000000000000000000000000000000000000000000000000";

/// Chain name of the verification trail.
pub const AUDIT_LOG: &str = "audit";

/// Chain name of the admin action log.
pub const ADMIN_LOG: &str = "admin";

/// A single entry in one of the hash-chained logs.
///
/// Modifying any field, including those of the embedded `event`,
/// invalidates `this_hash` and every later `prev_hash`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry<T> {
    /// Position in the chain, starting at 0.
    pub sequence: u64,
    pub prev_hash: String,
    pub this_hash: String,
    pub event: T,
}

/// Everything an `InMemoryStore` holds, in serializable form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub identities: IdentitySnapshot,
    pub sales: Vec<SalesRecord>,
    pub audit_log: Vec<LogEntry<AuditEvent>>,
    pub admin_log: Vec<LogEntry<AdminActionEvent>>,
    pub exported_at: DateTime<Utc>,
}
