//! In-memory implementation of `LedgerStore`.
//!
//! `InMemoryStore` is the reference persistence provider. Each table sits
//! behind its own `RwLock`: reads share the lock, and a write to one table
//! never waits on another. The two event logs are SHA-256 hash-chained.
//!
//! Durability is by snapshot: `export_snapshot()` / `save_to()` produce a
//! JSON image, and `from_snapshot()` / `load_from()` refuse an image whose
//! chains do not verify.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

use tillproof_contracts::{
    error::{LedgerError, LedgerResult},
    events::{AdminActionEvent, AuditEvent},
    identity::{Address, IdentityRecord, Role},
    sales::{SalesKey, SalesRecord},
};
use tillproof_core::traits::{
    CasOutcome, IdentityChange, IdentitySnapshot, InsertOutcome, LedgerStore,
};

use crate::{
    chain::{hash_entry, verify_chain},
    event::{LogEntry, StoreSnapshot, ADMIN_LOG, AUDIT_LOG, GENESIS_HASH},
};

// ── Internal chained log ──────────────────────────────────────────────────────

/// The mutable interior of one hash-chained log.
pub(crate) struct ChainLog<T> {
    name: &'static str,
    pub(crate) entries: Vec<LogEntry<T>>,
    /// `this_hash` of the last entry, or `GENESIS_HASH` when empty.
    last_hash: String,
}

impl<T: Serialize + Clone> ChainLog<T> {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            entries: Vec::new(),
            last_hash: GENESIS_HASH.to_string(),
        }
    }

    fn restore(name: &'static str, entries: Vec<LogEntry<T>>) -> LedgerResult<Self> {
        if !verify_chain(name, &entries) {
            return Err(LedgerError::IntegrityViolation {
                reason: format!("{name} log hash chain does not verify"),
            });
        }
        let last_hash = entries
            .last()
            .map(|e| e.this_hash.clone())
            .unwrap_or_else(|| GENESIS_HASH.to_string());
        Ok(Self {
            name,
            entries,
            last_hash,
        })
    }

    fn append(&mut self, event: &T) -> LedgerResult<u64> {
        let sequence = self.entries.len() as u64;
        let prev_hash = self.last_hash.clone();
        let this_hash = hash_entry(self.name, sequence, event, &prev_hash)?;

        self.entries.push(LogEntry {
            sequence,
            prev_hash,
            this_hash: this_hash.clone(),
            event: event.clone(),
        });
        self.last_hash = this_hash;
        Ok(sequence)
    }

    fn events(&self) -> Vec<T> {
        self.entries.iter().map(|e| e.event.clone()).collect()
    }

    fn verify(&self) -> bool {
        verify_chain(self.name, &self.entries)
    }
}

// ── Public store ──────────────────────────────────────────────────────────────

/// An in-memory ledger store with hash-chained event logs.
///
/// # Thread safety
///
/// Every `LedgerStore` call takes exactly one table lock, so each call is
/// atomic with respect to its table. `compare_and_insert_sale` and
/// `cas_identities` do their check and their write under the same write
/// guard.
pub struct InMemoryStore {
    identities: RwLock<IdentitySnapshot>,
    sales: RwLock<BTreeMap<SalesKey, SalesRecord>>,
    pub(crate) audit: RwLock<ChainLog<AuditEvent>>,
    pub(crate) admin: RwLock<ChainLog<AdminActionEvent>>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            identities: RwLock::new(IdentitySnapshot::default()),
            sales: RwLock::new(BTreeMap::new()),
            audit: RwLock::new(ChainLog::new(AUDIT_LOG)),
            admin: RwLock::new(ChainLog::new(ADMIN_LOG)),
        }
    }

    /// Rebuild a store from a snapshot, verifying both hash chains.
    ///
    /// Fails with `IntegrityViolation` if either chain was altered, if two
    /// sales records share a key, if an address has more than one identity
    /// record, or if a non-empty identity table holds no admin.
    pub fn from_snapshot(snapshot: StoreSnapshot) -> LedgerResult<Self> {
        let audit = ChainLog::restore(AUDIT_LOG, snapshot.audit_log)?;
        let admin = ChainLog::restore(ADMIN_LOG, snapshot.admin_log)?;

        check_identities(&snapshot.identities)?;

        let mut sales = BTreeMap::new();
        for record in snapshot.sales {
            let key = record.key.clone();
            if sales.insert(key.clone(), record).is_some() {
                return Err(LedgerError::IntegrityViolation {
                    reason: format!("snapshot holds two sales records for {key}"),
                });
            }
        }

        info!(
            identities = snapshot.identities.records.len(),
            sales = sales.len(),
            audit_events = audit.entries.len(),
            admin_actions = admin.entries.len(),
            "store restored from snapshot"
        );

        Ok(Self {
            identities: RwLock::new(snapshot.identities),
            sales: RwLock::new(sales),
            audit: RwLock::new(audit),
            admin: RwLock::new(admin),
        })
    }

    /// Copy the whole store into a serializable snapshot.
    ///
    /// Tables are read one after another, so a snapshot taken under
    /// concurrent writes may reflect different instants per table.
    pub fn export_snapshot(&self) -> LedgerResult<StoreSnapshot> {
        Ok(StoreSnapshot {
            identities: read(&self.identities)?.clone(),
            sales: read(&self.sales)?.values().cloned().collect(),
            audit_log: read(&self.audit)?.entries.clone(),
            admin_log: read(&self.admin)?.entries.clone(),
            exported_at: Utc::now(),
        })
    }

    pub fn to_json(&self) -> LedgerResult<Vec<u8>> {
        serde_json::to_vec_pretty(&self.export_snapshot()?).map_err(|e| LedgerError::Storage {
            reason: format!("failed to encode snapshot: {}", e),
        })
    }

    pub fn from_json(bytes: &[u8]) -> LedgerResult<Self> {
        let snapshot: StoreSnapshot =
            serde_json::from_slice(bytes).map_err(|e| LedgerError::Storage {
                reason: format!("failed to decode snapshot: {}", e),
            })?;
        Self::from_snapshot(snapshot)
    }

    /// Write the snapshot to `path` as JSON.
    pub fn save_to(&self, path: &Path) -> LedgerResult<()> {
        let bytes = self.to_json()?;
        std::fs::write(path, &bytes).map_err(|e| LedgerError::Storage {
            reason: format!("failed to write snapshot '{}': {}", path.display(), e),
        })?;
        debug!(path = %path.display(), bytes = bytes.len(), "snapshot saved");
        Ok(())
    }

    /// Read and verify a JSON snapshot written by `save_to`.
    pub fn load_from(path: &Path) -> LedgerResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| LedgerError::Storage {
            reason: format!("failed to read snapshot '{}': {}", path.display(), e),
        })?;
        Self::from_json(&bytes)
    }

    /// The verification trail with its chain metadata.
    pub fn audit_log(&self) -> LedgerResult<Vec<LogEntry<AuditEvent>>> {
        Ok(read(&self.audit)?.entries.clone())
    }

    /// The admin action log with its chain metadata.
    pub fn admin_log(&self) -> LedgerResult<Vec<LogEntry<AdminActionEvent>>> {
        Ok(read(&self.admin)?.entries.clone())
    }

    /// Check both hash chains. A poisoned lock counts as a failure.
    pub fn verify_integrity(&self) -> bool {
        let audit_ok = read(&self.audit).map(|log| log.verify()).unwrap_or(false);
        let admin_ok = read(&self.admin).map(|log| log.verify()).unwrap_or(false);
        if !(audit_ok && admin_ok) {
            warn!(audit_ok, admin_ok, "hash chain verification failed");
        }
        audit_ok && admin_ok
    }
}

// ── LedgerStore impl ──────────────────────────────────────────────────────────

impl LedgerStore for InMemoryStore {
    fn identities(&self) -> LedgerResult<IdentitySnapshot> {
        Ok(read(&self.identities)?.clone())
    }

    fn identity(&self, address: &Address) -> LedgerResult<Option<IdentityRecord>> {
        Ok(read(&self.identities)?.get(address).cloned())
    }

    fn cas_identities(
        &self,
        expected_version: u64,
        change: IdentityChange,
    ) -> LedgerResult<CasOutcome> {
        let mut table = write(&self.identities)?;
        if table.version != expected_version {
            return Ok(CasOutcome::Conflict {
                current_version: table.version,
            });
        }

        match change {
            IdentityChange::Upsert(record) => {
                match table.records.iter_mut().find(|r| r.address == record.address) {
                    Some(slot) => *slot = record,
                    None => table.records.push(record),
                }
            }
            IdentityChange::Remove(address) => {
                table.records.retain(|r| r.address != address);
            }
        }

        table.version += 1;
        Ok(CasOutcome::Applied {
            version: table.version,
        })
    }

    fn compare_and_insert_sale(&self, record: SalesRecord) -> LedgerResult<InsertOutcome> {
        let mut sales = write(&self.sales)?;
        if let Some(existing) = sales.get(&record.key) {
            return Ok(InsertOutcome::Exists(existing.clone()));
        }
        sales.insert(record.key.clone(), record);
        Ok(InsertOutcome::Inserted)
    }

    fn sale(&self, key: &SalesKey) -> LedgerResult<Option<SalesRecord>> {
        Ok(read(&self.sales)?.get(key).cloned())
    }

    fn sales(&self) -> LedgerResult<Vec<SalesRecord>> {
        Ok(read(&self.sales)?.values().cloned().collect())
    }

    fn append_audit_event(&self, event: &AuditEvent) -> LedgerResult<u64> {
        write(&self.audit)?.append(event)
    }

    fn audit_events(&self) -> LedgerResult<Vec<AuditEvent>> {
        Ok(read(&self.audit)?.events())
    }

    fn append_admin_action(&self, event: &AdminActionEvent) -> LedgerResult<u64> {
        write(&self.admin)?.append(event)
    }

    fn admin_actions(&self) -> LedgerResult<Vec<AdminActionEvent>> {
        Ok(read(&self.admin)?.events())
    }
}

// ── Snapshot validation ───────────────────────────────────────────────────────

/// One record per address, and at least one admin once any identity exists.
fn check_identities(identities: &IdentitySnapshot) -> LedgerResult<()> {
    let mut seen = BTreeSet::new();
    for record in &identities.records {
        if !seen.insert(&record.address) {
            return Err(LedgerError::IntegrityViolation {
                reason: format!("snapshot holds two identity records for {}", record.address),
            });
        }
    }
    if !identities.records.is_empty() && identities.count(Role::Admin) == 0 {
        return Err(LedgerError::IntegrityViolation {
            reason: "snapshot identity table has no admin".to_string(),
        });
    }
    Ok(())
}

// ── Lock helpers ──────────────────────────────────────────────────────────────

fn read<T>(lock: &RwLock<T>) -> LedgerResult<RwLockReadGuard<'_, T>> {
    lock.read().map_err(|e| LedgerError::Storage {
        reason: format!("store lock poisoned: {}", e),
    })
}

fn write<T>(lock: &RwLock<T>) -> LedgerResult<RwLockWriteGuard<'_, T>> {
    lock.write().map_err(|e| LedgerError::Storage {
        reason: format!("store lock poisoned: {}", e),
    })
}
