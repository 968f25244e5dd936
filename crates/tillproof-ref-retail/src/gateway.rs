//! The point-of-sale boundary in front of the ledger.
//!
//! `PosGateway` plays the part of the route handlers: it takes raw strings
//! and uploaded files, applies the structural checks from `LedgerConfig`
//! (address shape, upload size and extension, role names), calls the
//! ledger, and folds every outcome into an `ApiResponse` with an HTTP-style
//! status. No business rule is decided here.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use tillproof_audit::InMemoryStore;
use tillproof_contracts::{
    error::{LedgerError, LedgerResult},
    events::{AdminActionEvent, AuditEvent},
    identity::{Address, IdentityRecord, Role},
    sales::{FileMetadata, SalesRecord},
    stats::LedgerStatistics,
};
use tillproof_core::{
    traits::{Clock, SystemClock},
    Ledger,
};
use tillproof_policy::{ExactRoleGuard, LedgerConfig};
use tillproof_verify::Sha256Digester;

/// A file as received from the upload transport.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    fn metadata(&self) -> FileMetadata {
        FileMetadata {
            file_name: Some(self.file_name.clone()),
            file_size: Some(self.bytes.len() as u64),
        }
    }
}

/// The `{ success, message, data }` body every boundary call returns.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    #[serde(skip)]
    pub status: u16,
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            status: 200,
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }

    fn failed(err: &LedgerError) -> Self {
        Self {
            status: status_for(err),
            success: false,
            message: err.to_string(),
            data: None,
        }
    }

    fn from_result(result: LedgerResult<T>, message: impl Into<String>) -> Self {
        match result {
            Ok(data) => Self::ok(message, data),
            Err(err) => {
                let response = Self::failed(&err);
                if response.status >= 500 {
                    warn!(status = response.status, error = %err, "request failed");
                } else {
                    debug!(status = response.status, error = %err, "request rejected");
                }
                response
            }
        }
    }
}

/// The HTTP status the boundary reports for each error.
pub fn status_for(err: &LedgerError) -> u16 {
    match err {
        LedgerError::InvalidRole { .. }
        | LedgerError::InvalidAddressFormat { .. }
        | LedgerError::MissingFields { .. }
        | LedgerError::FileTooLarge { .. }
        | LedgerError::UnsupportedFileType { .. }
        | LedgerError::LastAdmin { .. } => 400,
        LedgerError::Unauthenticated { .. } => 401,
        LedgerError::Forbidden { .. } => 403,
        LedgerError::RecordNotFound { .. } | LedgerError::NotFound { .. } => 404,
        LedgerError::DuplicateKey { .. } => 409,
        LedgerError::Storage { .. }
        | LedgerError::IntegrityViolation { .. }
        | LedgerError::ConfigError { .. } => 500,
    }
}

pub struct PosGateway {
    ledger: Ledger,
    store: Arc<InMemoryStore>,
    config: LedgerConfig,
}

impl PosGateway {
    /// A gateway over a fresh in-memory store, seeded with the configured
    /// genesis admin and using the system clock.
    pub fn new(config: LedgerConfig) -> LedgerResult<Self> {
        Self::with_store(config, Arc::new(InMemoryStore::new()), Box::new(SystemClock))
    }

    /// A gateway over an existing store. The genesis admin is seeded only if
    /// the store holds no admin.
    pub fn with_store(
        config: LedgerConfig,
        store: Arc<InMemoryStore>,
        clock: Box<dyn Clock>,
    ) -> LedgerResult<Self> {
        let deployer = config.genesis_address()?;
        let ledger = Ledger::genesis(
            Box::new(Arc::clone(&store)),
            Box::new(ExactRoleGuard),
            Box::new(Sha256Digester),
            clock,
            &deployer,
        )?;
        Ok(Self {
            ledger,
            store,
            config,
        })
    }

    /// Restore from a snapshot file written by [`PosGateway::save_snapshot`].
    pub fn restore(config: LedgerConfig, path: &Path) -> LedgerResult<Self> {
        let store = Arc::new(InMemoryStore::load_from(path)?);
        Self::with_store(config, store, Box::new(SystemClock))
    }

    pub fn save_snapshot(&self, path: &Path) -> LedgerResult<()> {
        self.store.save_to(path)
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn store(&self) -> &InMemoryStore {
        &self.store
    }

    fn address(&self, raw: &str) -> LedgerResult<Address> {
        self.config.address.parse(raw)
    }

    fn check_upload(&self, upload: &Upload) -> LedgerResult<()> {
        self.config
            .upload
            .check(&upload.file_name, upload.bytes.len() as u64)
    }

    // ── Role management ──────────────────────────────────────────────────────

    pub fn add_user(&self, actor: &str, target: &str, role: &str) -> ApiResponse<IdentityRecord> {
        ApiResponse::from_result(self.try_add_user(actor, target, role), "role granted")
    }

    fn try_add_user(&self, actor: &str, target: &str, role: &str) -> LedgerResult<IdentityRecord> {
        let actor = self.address(actor)?;
        let target = self.address(target)?;
        let role: Role = role.parse()?;
        self.ledger.grant(&target, role, &actor)
    }

    pub fn remove_user(&self, actor: &str, target: &str) -> ApiResponse<()> {
        ApiResponse::from_result(self.try_remove_user(actor, target), "role revoked")
    }

    fn try_remove_user(&self, actor: &str, target: &str) -> LedgerResult<()> {
        let actor = self.address(actor)?;
        let target = self.address(target)?;
        self.ledger.revoke(&target, &actor)
    }

    pub fn role_of(&self, address: &str) -> ApiResponse<Option<Role>> {
        let result = self.address(address).and_then(|a| self.ledger.role_of(&a));
        ApiResponse::from_result(result, "role lookup")
    }

    pub fn has_role(&self, address: &str, role: &str) -> ApiResponse<bool> {
        ApiResponse::from_result(self.try_has_role(address, role), "role check")
    }

    fn try_has_role(&self, address: &str, role: &str) -> LedgerResult<bool> {
        let address = self.address(address)?;
        let role: Role = role.parse()?;
        self.ledger.has_role(&address, role)
    }

    pub fn users(&self) -> ApiResponse<Vec<IdentityRecord>> {
        ApiResponse::from_result(self.ledger.identities(), "users listed")
    }

    pub fn admin_log(&self, actor: &str) -> ApiResponse<Vec<AdminActionEvent>> {
        let result = self.address(actor).and_then(|a| self.ledger.admin_actions(&a));
        ApiResponse::from_result(result, "admin log")
    }

    // ── Sales ────────────────────────────────────────────────────────────────

    pub fn submit_sales(
        &self,
        actor: &str,
        store_id: &str,
        date: &str,
        upload: &Upload,
    ) -> ApiResponse<SalesRecord> {
        ApiResponse::from_result(
            self.try_submit_sales(actor, store_id, date, upload),
            "sales data submitted",
        )
    }

    fn try_submit_sales(
        &self,
        actor: &str,
        store_id: &str,
        date: &str,
        upload: &Upload,
    ) -> LedgerResult<SalesRecord> {
        let actor = self.address(actor)?;
        self.check_upload(upload)?;
        self.ledger
            .submit_file(store_id, date, &upload.bytes, upload.metadata(), &actor)
    }

    pub fn sales_hash(&self, store_id: &str, date: &str) -> ApiResponse<Option<SalesRecord>> {
        ApiResponse::from_result(self.ledger.lookup(store_id, date), "sales lookup")
    }

    /// The caller's own submissions. Only cashiers have a history.
    pub fn submission_history(&self, actor: &str) -> ApiResponse<Vec<SalesRecord>> {
        ApiResponse::from_result(self.try_submission_history(actor), "submission history")
    }

    fn try_submission_history(&self, actor: &str) -> LedgerResult<Vec<SalesRecord>> {
        let actor = self.address(actor)?;
        self.ledger.authorize(&actor, Role::Cashier)?;
        self.ledger.submissions_by(&actor)
    }

    pub fn all_sales(&self, actor: &str) -> ApiResponse<Vec<SalesRecord>> {
        let result = self.address(actor).and_then(|a| self.ledger.list_all(&a));
        ApiResponse::from_result(result, "all sales")
    }

    // ── Audits ───────────────────────────────────────────────────────────────

    pub fn audit_sales(
        &self,
        actor: &str,
        store_id: &str,
        date: &str,
        upload: &Upload,
    ) -> ApiResponse<AuditEvent> {
        let result = self.try_audit_sales(actor, store_id, date, upload);
        let message = match &result {
            Ok(event) if event.hash_match => "hash matches the submitted record",
            Ok(_) => "hash does not match the submitted record",
            Err(_) => "",
        };
        ApiResponse::from_result(result, message)
    }

    fn try_audit_sales(
        &self,
        actor: &str,
        store_id: &str,
        date: &str,
        upload: &Upload,
    ) -> LedgerResult<AuditEvent> {
        let actor = self.address(actor)?;
        self.check_upload(upload)?;
        self.ledger.verify_file(store_id, date, &upload.bytes, &actor)
    }

    pub fn audit_trail(&self, store_id: &str, date: &str) -> ApiResponse<Vec<AuditEvent>> {
        ApiResponse::from_result(self.ledger.verifications_for(store_id, date), "audit trail")
    }

    pub fn statistics(&self) -> ApiResponse<LedgerStatistics> {
        ApiResponse::from_result(self.ledger.statistics(), "statistics")
    }
}
