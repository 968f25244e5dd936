//! Append-only event types.
//!
//! `AuditEvent` records one verification attempt by an auditor.
//! `AdminActionEvent` records one successful role change by an admin.
//! Neither is ever mutated once written.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    identity::{Address, Role},
    sales::{Digest, SalesKey},
};

/// Unique identifier of a single logged event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub uuid::Uuid);

impl EventId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

/// The outcome of re-checking an uploaded file against a stored submission.
///
/// A mismatch is still a successfully recorded event: `hash_match = false`
/// is the finding, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub id: EventId,
    /// The sales record this verification refers to.
    pub key: SalesKey,
    /// Digest of the file the auditor just uploaded.
    pub uploaded_digest: Digest,
    /// Digest on file for `key` at verification time.
    pub stored_digest: Digest,
    pub hash_match: bool,
    /// Cashier who made the original submission.
    pub submitted_by: Address,
    pub submitted_at: DateTime<Utc>,
    pub auditor: Address,
    pub verified_at: DateTime<Utc>,
}

/// The kind of role-management action an admin performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdminAction {
    Grant,
    Revoke,
}

/// One entry in the admin action log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminActionEvent {
    pub id: EventId,
    pub action: AdminAction,
    pub actor: Address,
    pub target: Address,
    /// Granted role for `Grant`; the role the target held for `Revoke`.
    pub role: Option<Role>,
    pub timestamp: DateTime<Utc>,
}
