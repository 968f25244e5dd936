//! The Tillproof ledger: the role-gated service over identities, sales, and
//! audit logs.
//!
//! Every mutating operation runs in the same order:
//!
//!   Resolve role → Authorize → Validate → Atomic store call → Log
//!
//! Nothing is written unless the authorizer returns `Ok`. Public reads
//! (`lookup`, `role_of`, `has_role`, `identities`) skip the guard entirely.

use tracing::{debug, info, warn};

use tillproof_contracts::{
    error::{LedgerError, LedgerResult},
    events::{AdminAction, AdminActionEvent, AuditEvent, EventId},
    identity::{Address, IdentityRecord, Role},
    sales::{Digest, FileMetadata, SalesKey, SalesRecord},
};

use crate::traits::{
    Authorizer, CasOutcome, Clock, ContentDigest, IdentityChange, InsertOutcome, LedgerStore,
};

/// Upper bound on optimistic retries of an identity mutation.
const MAX_CAS_ATTEMPTS: usize = 32;

/// The ledger service.
///
/// Construct one per deployment and share it by reference. It owns the
/// trusted components and enforces authorization on every mutating call.
pub struct Ledger {
    store: Box<dyn LedgerStore>,
    guard: Box<dyn Authorizer>,
    digester: Box<dyn ContentDigest>,
    clock: Box<dyn Clock>,
}

impl Ledger {
    /// Assemble a ledger over an existing store without seeding anything.
    ///
    /// Use this when the store was restored from a snapshot that already
    /// holds an admin. For a fresh deployment use [`Ledger::genesis`].
    pub fn new(
        store: Box<dyn LedgerStore>,
        guard: Box<dyn Authorizer>,
        digester: Box<dyn ContentDigest>,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            store,
            guard,
            digester,
            clock,
        }
    }

    /// Assemble a ledger and seed `deployer` as admin if the store has none.
    ///
    /// The genesis admin is recorded as granted by itself. Seeding is not an
    /// admin action and does not appear in the admin log.
    pub fn genesis(
        store: Box<dyn LedgerStore>,
        guard: Box<dyn Authorizer>,
        digester: Box<dyn ContentDigest>,
        clock: Box<dyn Clock>,
        deployer: &Address,
    ) -> LedgerResult<Self> {
        let ledger = Self::new(store, guard, digester, clock);
        ledger.seed_admin(deployer)?;
        Ok(ledger)
    }

    fn seed_admin(&self, deployer: &Address) -> LedgerResult<()> {
        for _ in 0..MAX_CAS_ATTEMPTS {
            let snapshot = self.store.identities()?;
            if snapshot.count(Role::Admin) > 0 {
                debug!(deployer = %deployer, "admin already present, genesis seed skipped");
                return Ok(());
            }

            let record = IdentityRecord {
                address: deployer.clone(),
                role: Role::Admin,
                added_by: deployer.clone(),
                granted_at: self.clock.now(),
            };
            match self
                .store
                .cas_identities(snapshot.version, IdentityChange::Upsert(record))?
            {
                CasOutcome::Applied { .. } => {
                    info!(deployer = %deployer, "genesis admin seeded");
                    return Ok(());
                }
                CasOutcome::Conflict { .. } => continue,
            }
        }
        Err(contention("genesis seed"))
    }

    // ── Authorization guard ──────────────────────────────────────────────────

    /// Check that `address` currently holds exactly `required`.
    ///
    /// Fails with `Unauthenticated` when the address has no role and with
    /// `Forbidden` when it holds a different one.
    pub fn authorize(&self, address: &Address, required: Role) -> LedgerResult<()> {
        let held = self.store.identity(address)?.map(|r| r.role);
        self.guard.authorize(address, held, required)
    }

    // ── Identity store ───────────────────────────────────────────────────────

    /// Give `target` the role `role`, replacing any role it held.
    ///
    /// `actor` must be an admin. Demoting the only admin is rejected with
    /// `LastAdmin`. On success an admin `grant` event is logged.
    ///
    /// The role change and the log append are separate store calls. If the
    /// append fails the new role stays in place, no event is logged, and
    /// the append error is returned.
    pub fn grant(
        &self,
        target: &Address,
        role: Role,
        actor: &Address,
    ) -> LedgerResult<IdentityRecord> {
        for attempt in 0..MAX_CAS_ATTEMPTS {
            let snapshot = self.store.identities()?;
            self.guard
                .authorize(actor, snapshot.role_of(actor), Role::Admin)?;

            if let Some(existing) = snapshot.get(target) {
                if existing.role == Role::Admin
                    && role != Role::Admin
                    && snapshot.count(Role::Admin) == 1
                {
                    warn!(actor = %actor, target = %target, "refusing to demote the last admin");
                    return Err(LedgerError::LastAdmin {
                        address: target.to_string(),
                    });
                }
            }

            let record = IdentityRecord {
                address: target.clone(),
                role,
                added_by: actor.clone(),
                granted_at: self.clock.now(),
            };

            match self
                .store
                .cas_identities(snapshot.version, IdentityChange::Upsert(record.clone()))?
            {
                CasOutcome::Applied { version } => {
                    info!(
                        actor = %actor,
                        target = %target,
                        role = %role,
                        version,
                        "role granted"
                    );
                    if let Err(err) =
                        self.log_admin_action(AdminAction::Grant, actor, target, Some(role))
                    {
                        warn!(
                            actor = %actor,
                            target = %target,
                            role = %role,
                            error = %err,
                            "grant applied but admin log append failed"
                        );
                        return Err(err);
                    }
                    return Ok(record);
                }
                CasOutcome::Conflict { current_version } => {
                    debug!(attempt, current_version, "identity table changed, retrying grant");
                }
            }
        }
        Err(contention("grant"))
    }

    /// Remove `target`'s identity record.
    ///
    /// `actor` must be an admin. An unknown target is `NotFound`; removing
    /// the only admin is `LastAdmin`. On success an admin `revoke` event is
    /// logged.
    ///
    /// As with [`Ledger::grant`], a failed log append leaves the removal in
    /// place and returns the append error.
    pub fn revoke(&self, target: &Address, actor: &Address) -> LedgerResult<()> {
        for attempt in 0..MAX_CAS_ATTEMPTS {
            let snapshot = self.store.identities()?;
            self.guard
                .authorize(actor, snapshot.role_of(actor), Role::Admin)?;

            let revoked_role = match snapshot.get(target) {
                Some(existing) => existing.role,
                None => {
                    return Err(LedgerError::NotFound {
                        address: target.to_string(),
                    })
                }
            };

            if revoked_role == Role::Admin && snapshot.count(Role::Admin) == 1 {
                warn!(actor = %actor, target = %target, "refusing to revoke the last admin");
                return Err(LedgerError::LastAdmin {
                    address: target.to_string(),
                });
            }

            match self
                .store
                .cas_identities(snapshot.version, IdentityChange::Remove(target.clone()))?
            {
                CasOutcome::Applied { version } => {
                    info!(
                        actor = %actor,
                        target = %target,
                        role = %revoked_role,
                        version,
                        "role revoked"
                    );
                    if let Err(err) = self.log_admin_action(
                        AdminAction::Revoke,
                        actor,
                        target,
                        Some(revoked_role),
                    ) {
                        warn!(
                            actor = %actor,
                            target = %target,
                            role = %revoked_role,
                            error = %err,
                            "revoke applied but admin log append failed"
                        );
                        return Err(err);
                    }
                    return Ok(());
                }
                CasOutcome::Conflict { current_version } => {
                    debug!(attempt, current_version, "identity table changed, retrying revoke");
                }
            }
        }
        Err(contention("revoke"))
    }

    pub fn role_of(&self, address: &Address) -> LedgerResult<Option<Role>> {
        Ok(self.store.identity(address)?.map(|r| r.role))
    }

    pub fn has_role(&self, address: &Address, role: Role) -> LedgerResult<bool> {
        Ok(self.role_of(address)? == Some(role))
    }

    /// Every identity record, in insertion order.
    pub fn identities(&self) -> LedgerResult<Vec<IdentityRecord>> {
        Ok(self.store.identities()?.records)
    }

    // ── Sales record ledger ──────────────────────────────────────────────────

    /// Record the digest of a day's sales for a store.
    ///
    /// `submitter` must be a cashier. The first submission for a key wins;
    /// any later one fails with `DuplicateKey` whatever its digest.
    pub fn submit(
        &self,
        store_id: &str,
        date: &str,
        digest: Digest,
        submitter: &Address,
    ) -> LedgerResult<SalesRecord> {
        self.submit_with_metadata(store_id, date, digest, FileMetadata::default(), submitter)
    }

    /// Same as [`Ledger::submit`], carrying descriptive file metadata.
    pub fn submit_with_metadata(
        &self,
        store_id: &str,
        date: &str,
        digest: Digest,
        file: FileMetadata,
        submitter: &Address,
    ) -> LedgerResult<SalesRecord> {
        self.authorize(submitter, Role::Cashier)?;
        require_fields(&[
            ("store_id", store_id),
            ("date", date),
            ("digest", digest.as_str()),
        ])?;

        let record = SalesRecord {
            key: SalesKey::new(store_id, date),
            digest,
            submitted_by: submitter.clone(),
            submitted_at: self.clock.now(),
            file,
        };

        match self.store.compare_and_insert_sale(record.clone())? {
            InsertOutcome::Inserted => {
                info!(
                    store_id = %store_id,
                    date = %date,
                    digest = %record.digest,
                    submitter = %submitter,
                    "sales record submitted"
                );
                Ok(record)
            }
            InsertOutcome::Exists(existing) => {
                warn!(
                    store_id = %store_id,
                    date = %date,
                    submitter = %submitter,
                    original_submitter = %existing.submitted_by,
                    "duplicate sales submission rejected"
                );
                Err(LedgerError::DuplicateKey {
                    store_id: store_id.to_string(),
                    date: date.to_string(),
                })
            }
        }
    }

    /// Hash `bytes` and submit the resulting digest.
    pub fn submit_file(
        &self,
        store_id: &str,
        date: &str,
        bytes: &[u8],
        file: FileMetadata,
        submitter: &Address,
    ) -> LedgerResult<SalesRecord> {
        let digest = self.digester.digest(bytes);
        self.submit_with_metadata(store_id, date, digest, file, submitter)
    }

    /// Public read of one sales record.
    pub fn lookup(&self, store_id: &str, date: &str) -> LedgerResult<Option<SalesRecord>> {
        self.store.sale(&SalesKey::new(store_id, date))
    }

    /// Every sales record, regardless of submitter. Admin only.
    pub fn list_all(&self, requester: &Address) -> LedgerResult<Vec<SalesRecord>> {
        self.authorize(requester, Role::Admin)?;
        self.store.sales()
    }

    /// Sales records submitted by `address`, oldest first.
    pub fn submissions_by(&self, address: &Address) -> LedgerResult<Vec<SalesRecord>> {
        let mut records: Vec<SalesRecord> = self
            .store
            .sales()?
            .into_iter()
            .filter(|r| &r.submitted_by == address)
            .collect();
        records.sort_by(|a, b| a.submitted_at.cmp(&b.submitted_at));
        Ok(records)
    }

    // ── Audit trail ──────────────────────────────────────────────────────────

    /// Compare an auditor's freshly computed digest against the record on
    /// file and append the outcome to the audit trail.
    ///
    /// A mismatch is a successful call with `hash_match = false`. Calling
    /// twice appends two events. A missing record is `RecordNotFound` and
    /// nothing is created.
    pub fn record_verification(
        &self,
        store_id: &str,
        date: &str,
        uploaded_digest: Digest,
        auditor: &Address,
    ) -> LedgerResult<AuditEvent> {
        self.authorize(auditor, Role::Auditor)?;

        let record = self
            .lookup(store_id, date)?
            .ok_or_else(|| LedgerError::RecordNotFound {
                store_id: store_id.to_string(),
                date: date.to_string(),
            })?;

        let hash_match = uploaded_digest == record.digest;

        let event = AuditEvent {
            id: EventId::new(),
            key: record.key,
            uploaded_digest,
            stored_digest: record.digest,
            hash_match,
            submitted_by: record.submitted_by,
            submitted_at: record.submitted_at,
            auditor: auditor.clone(),
            verified_at: self.clock.now(),
        };

        let sequence = self.store.append_audit_event(&event)?;

        if hash_match {
            info!(
                store_id = %store_id,
                date = %date,
                auditor = %auditor,
                sequence,
                "verification passed"
            );
        } else {
            warn!(
                store_id = %store_id,
                date = %date,
                auditor = %auditor,
                uploaded = %event.uploaded_digest,
                stored = %event.stored_digest,
                sequence,
                "verification mismatch recorded"
            );
        }

        Ok(event)
    }

    /// Hash `bytes` and record a verification of the resulting digest.
    pub fn verify_file(
        &self,
        store_id: &str,
        date: &str,
        bytes: &[u8],
        auditor: &Address,
    ) -> LedgerResult<AuditEvent> {
        let digest = self.digester.digest(bytes);
        self.record_verification(store_id, date, digest, auditor)
    }

    /// Every verification recorded against one key, oldest first.
    pub fn verifications_for(&self, store_id: &str, date: &str) -> LedgerResult<Vec<AuditEvent>> {
        let key = SalesKey::new(store_id, date);
        Ok(self
            .store
            .audit_events()?
            .into_iter()
            .filter(|e| e.key == key)
            .collect())
    }

    // ── Admin action log ─────────────────────────────────────────────────────

    fn log_admin_action(
        &self,
        action: AdminAction,
        actor: &Address,
        target: &Address,
        role: Option<Role>,
    ) -> LedgerResult<AdminActionEvent> {
        let event = AdminActionEvent {
            id: EventId::new(),
            action,
            actor: actor.clone(),
            target: target.clone(),
            role,
            timestamp: self.clock.now(),
        };
        self.store.append_admin_action(&event)?;
        Ok(event)
    }

    /// The admin action log, newest first. Admin only.
    pub fn admin_actions(&self, requester: &Address) -> LedgerResult<Vec<AdminActionEvent>> {
        self.authorize(requester, Role::Admin)?;
        let mut events = self.store.admin_actions()?;
        events.reverse();
        Ok(events)
    }

    pub(crate) fn store(&self) -> &dyn LedgerStore {
        self.store.as_ref()
    }

    pub(crate) fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }
}

/// Fail with `MissingFields` naming every blank entry.
fn require_fields(fields: &[(&str, &str)]) -> LedgerResult<()> {
    let missing: Vec<String> = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| (*name).to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(LedgerError::MissingFields { fields: missing })
    }
}

fn contention(operation: &str) -> LedgerError {
    LedgerError::Storage {
        reason: format!(
            "{operation} gave up after {MAX_CAS_ATTEMPTS} conflicting identity updates"
        ),
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
