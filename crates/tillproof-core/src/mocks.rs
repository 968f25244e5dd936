//! Test doubles for the core traits.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};

use tillproof_contracts::{
    error::{LedgerError, LedgerResult},
    events::{AdminActionEvent, AuditEvent},
    identity::{Address, IdentityRecord, Role},
    sales::{Digest, SalesKey, SalesRecord},
};

use crate::ledger::Ledger;
use crate::traits::{
    Authorizer, CasOutcome, Clock, ContentDigest, IdentityChange, IdentitySnapshot,
    InsertOutcome, LedgerStore,
};

pub fn addr(name: &str) -> Address {
    Address::new(name)
}

/// A fresh ledger seeded with admin `"admin"` and a clock fixed at
/// 2024-01-15 12:00 UTC.
pub fn ledger_with_admin() -> (Ledger, Address) {
    let (ledger, admin, _) = ledger_with_clock(Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap());
    (ledger, admin)
}

pub fn ledger_with_clock(start: DateTime<Utc>) -> (Ledger, Address, MockClock) {
    let (ledger, admin, clock, _) = ledger_with_store(start);
    (ledger, admin, clock)
}

/// Like [`ledger_with_clock`], also handing back the store.
pub fn ledger_with_store(start: DateTime<Utc>) -> (Ledger, Address, MockClock, Arc<MockStore>) {
    let clock = MockClock::at(start);
    let admin = addr("admin");
    let store = Arc::new(MockStore::default());
    let ledger = Ledger::genesis(
        Box::new(Arc::clone(&store)),
        Box::new(MockGuard),
        Box::new(MockDigest),
        Box::new(clock.clone()),
        &admin,
    )
    .unwrap();
    (ledger, admin, clock, store)
}

// ── Store ────────────────────────────────────────────────────────────────────

#[derive(Default)]
struct MockState {
    identities: IdentitySnapshot,
    sales: BTreeMap<SalesKey, SalesRecord>,
    audit: Vec<AuditEvent>,
    admin: Vec<AdminActionEvent>,
}

/// Everything behind one mutex. Enough to make each call atomic.
#[derive(Default)]
pub struct MockStore {
    state: Mutex<MockState>,
    fail_admin_appends: AtomicBool,
}

impl MockStore {
    /// Make every later `append_admin_action` fail with `Storage`.
    pub fn break_admin_log(&self) {
        self.fail_admin_appends.store(true, Ordering::SeqCst);
    }

    fn lock(&self) -> LedgerResult<std::sync::MutexGuard<'_, MockState>> {
        self.state.lock().map_err(|e| LedgerError::Storage {
            reason: e.to_string(),
        })
    }
}

impl LedgerStore for MockStore {
    fn identities(&self) -> LedgerResult<IdentitySnapshot> {
        Ok(self.lock()?.identities.clone())
    }

    fn identity(&self, address: &Address) -> LedgerResult<Option<IdentityRecord>> {
        Ok(self.lock()?.identities.get(address).cloned())
    }

    fn cas_identities(
        &self,
        expected_version: u64,
        change: IdentityChange,
    ) -> LedgerResult<CasOutcome> {
        let mut state = self.lock()?;
        let table = &mut state.identities;
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
            IdentityChange::Remove(address) => table.records.retain(|r| r.address != address),
        }
        table.version += 1;
        Ok(CasOutcome::Applied {
            version: table.version,
        })
    }

    fn compare_and_insert_sale(&self, record: SalesRecord) -> LedgerResult<InsertOutcome> {
        let mut state = self.lock()?;
        if let Some(existing) = state.sales.get(&record.key) {
            return Ok(InsertOutcome::Exists(existing.clone()));
        }
        state.sales.insert(record.key.clone(), record);
        Ok(InsertOutcome::Inserted)
    }

    fn sale(&self, key: &SalesKey) -> LedgerResult<Option<SalesRecord>> {
        Ok(self.lock()?.sales.get(key).cloned())
    }

    fn sales(&self) -> LedgerResult<Vec<SalesRecord>> {
        Ok(self.lock()?.sales.values().cloned().collect())
    }

    fn append_audit_event(&self, event: &AuditEvent) -> LedgerResult<u64> {
        let mut state = self.lock()?;
        state.audit.push(event.clone());
        Ok(state.audit.len() as u64 - 1)
    }

    fn audit_events(&self) -> LedgerResult<Vec<AuditEvent>> {
        Ok(self.lock()?.audit.clone())
    }

    fn append_admin_action(&self, event: &AdminActionEvent) -> LedgerResult<u64> {
        if self.fail_admin_appends.load(Ordering::SeqCst) {
            return Err(LedgerError::Storage {
                reason: "admin log unavailable".to_string(),
            });
        }
        let mut state = self.lock()?;
        state.admin.push(event.clone());
        Ok(state.admin.len() as u64 - 1)
    }

    fn admin_actions(&self) -> LedgerResult<Vec<AdminActionEvent>> {
        Ok(self.lock()?.admin.clone())
    }
}

// ── Guard, digest, clock ─────────────────────────────────────────────────────

/// Exact-match guard, same decision table as the production guard.
pub struct MockGuard;

impl Authorizer for MockGuard {
    fn authorize(&self, address: &Address, held: Option<Role>, required: Role) -> LedgerResult<()> {
        match held {
            None => Err(LedgerError::Unauthenticated {
                address: address.to_string(),
            }),
            Some(role) if role == required => Ok(()),
            Some(role) => Err(LedgerError::Forbidden {
                address: address.to_string(),
                held: role,
                required,
            }),
        }
    }
}

/// Hex-encodes the raw bytes. Deterministic and injective, not a hash.
pub struct MockDigest;

impl ContentDigest for MockDigest {
    fn digest(&self, bytes: &[u8]) -> Digest {
        Digest::new(bytes.iter().map(|b| format!("{b:02x}")).collect::<String>())
    }
}

/// A clock the test can move.
#[derive(Clone)]
pub struct MockClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl MockClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap() = now;
    }
}

impl Clock for MockClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}
