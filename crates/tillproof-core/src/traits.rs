//! Core trait definitions for the Tillproof ledger.
//!
//! These four traits define the seams of the service:
//!
//! - `LedgerStore`  : persistence provider (atomic primitives, no business rules)
//! - `Authorizer`   : trusted gate (evaluated before every mutating operation)
//! - `ContentDigest`: content integrity engine (hash and compare)
//! - `Clock`        : wall-clock source
//!
//! The `Ledger` wires them together in the correct order.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tillproof_contracts::{
    error::LedgerResult,
    events::{AdminActionEvent, AuditEvent},
    identity::{Address, IdentityRecord, Role},
    sales::{Digest, SalesKey, SalesRecord},
};

// ── Store value types ─────────────────────────────────────────────────────────

/// A consistent, versioned copy of the whole identity table.
///
/// `version` changes on every applied mutation, so a caller can validate
/// invariants against the snapshot and then commit with `cas_identities`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdentitySnapshot {
    pub version: u64,
    /// Identity records in insertion order.
    pub records: Vec<IdentityRecord>,
}

impl IdentitySnapshot {
    pub fn get(&self, address: &Address) -> Option<&IdentityRecord> {
        self.records.iter().find(|r| &r.address == address)
    }

    pub fn role_of(&self, address: &Address) -> Option<Role> {
        self.get(address).map(|r| r.role)
    }

    pub fn count(&self, role: Role) -> usize {
        self.records.iter().filter(|r| r.role == role).count()
    }
}

/// A single mutation to the identity table.
#[derive(Debug, Clone)]
pub enum IdentityChange {
    /// Insert the record, or replace the existing record for its address.
    /// A replaced record keeps its original position.
    Upsert(IdentityRecord),
    /// Remove the record for this address if present.
    Remove(Address),
}

/// Result of a compare-and-swap on the identity table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CasOutcome {
    /// The change was applied; the table is now at `version`.
    Applied { version: u64 },
    /// The table moved on since the caller's snapshot. Nothing was written.
    Conflict { current_version: u64 },
}

/// Result of a compare-and-insert on the sales ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// A record already occupied the key. It is returned untouched.
    Exists(SalesRecord),
}

// ── Traits ────────────────────────────────────────────────────────────────────

/// The persistence provider behind the ledger.
///
/// Implementations hold data and guarantee atomicity of each call. They do
/// not enforce business invariants: the last-admin rule and role checks live
/// in `Ledger`. Every read may hit persistence; no caching is assumed.
pub trait LedgerStore: Send + Sync {
    /// Return the full identity table with its current version.
    fn identities(&self) -> LedgerResult<IdentitySnapshot>;

    /// Look up one identity.
    fn identity(&self, address: &Address) -> LedgerResult<Option<IdentityRecord>>;

    /// Apply `change` only if the table is still at `expected_version`.
    fn cas_identities(
        &self,
        expected_version: u64,
        change: IdentityChange,
    ) -> LedgerResult<CasOutcome>;

    /// Insert `record` only if its key is vacant. Check and insert are one
    /// atomic step.
    fn compare_and_insert_sale(&self, record: SalesRecord) -> LedgerResult<InsertOutcome>;

    fn sale(&self, key: &SalesKey) -> LedgerResult<Option<SalesRecord>>;

    /// All sales records. Order is implementation-defined.
    fn sales(&self) -> LedgerResult<Vec<SalesRecord>>;

    /// Append a verification event and return its sequence number.
    fn append_audit_event(&self, event: &AuditEvent) -> LedgerResult<u64>;

    /// All verification events, oldest first.
    fn audit_events(&self) -> LedgerResult<Vec<AuditEvent>>;

    /// Append an admin action and return its sequence number.
    fn append_admin_action(&self, event: &AdminActionEvent) -> LedgerResult<u64>;

    /// All admin actions, oldest first.
    fn admin_actions(&self) -> LedgerResult<Vec<AdminActionEvent>>;
}

/// Lets a caller keep an `Arc` handle on a store it also hands to the ledger.
impl<S: LedgerStore + ?Sized> LedgerStore for Arc<S> {
    fn identities(&self) -> LedgerResult<IdentitySnapshot> {
        (**self).identities()
    }

    fn identity(&self, address: &Address) -> LedgerResult<Option<IdentityRecord>> {
        (**self).identity(address)
    }

    fn cas_identities(
        &self,
        expected_version: u64,
        change: IdentityChange,
    ) -> LedgerResult<CasOutcome> {
        (**self).cas_identities(expected_version, change)
    }

    fn compare_and_insert_sale(&self, record: SalesRecord) -> LedgerResult<InsertOutcome> {
        (**self).compare_and_insert_sale(record)
    }

    fn sale(&self, key: &SalesKey) -> LedgerResult<Option<SalesRecord>> {
        (**self).sale(key)
    }

    fn sales(&self) -> LedgerResult<Vec<SalesRecord>> {
        (**self).sales()
    }

    fn append_audit_event(&self, event: &AuditEvent) -> LedgerResult<u64> {
        (**self).append_audit_event(event)
    }

    fn audit_events(&self) -> LedgerResult<Vec<AuditEvent>> {
        (**self).audit_events()
    }

    fn append_admin_action(&self, event: &AdminActionEvent) -> LedgerResult<u64> {
        (**self).append_admin_action(event)
    }

    fn admin_actions(&self) -> LedgerResult<Vec<AdminActionEvent>> {
        (**self).admin_actions()
    }
}

/// The authorization guard: decides whether `address` may act as `required`.
///
/// The ledger resolves the held role first and passes it in, so the guard
/// stays a pure decision with no storage access.
pub trait Authorizer: Send + Sync {
    fn authorize(&self, address: &Address, held: Option<Role>, required: Role) -> LedgerResult<()>;
}

/// The content integrity engine.
///
/// `digest` must be deterministic and use the same algorithm and encoding on
/// every call.
pub trait ContentDigest: Send + Sync {
    fn digest(&self, bytes: &[u8]) -> Digest;

    /// Recompute the digest of `bytes` and compare it to `expected` exactly.
    fn verify(&self, bytes: &[u8], expected: &Digest) -> bool {
        self.digest(bytes) == *expected
    }
}

/// Source of "now" for every timestamp the ledger writes.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
