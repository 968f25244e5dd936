//! Identity types: wallet addresses, roles, and the records binding them.
//!
//! An address is whatever string the caller presents. Tillproof checks its
//! structural shape at the boundary but never proves ownership of it.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// A caller-supplied wallet address, e.g. `Address("0xab12…".into())`.
///
/// Comparison is exact and case-sensitive. No normalization is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Address(pub String);

impl Address {
    /// Construct an address from any string-like value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The closed set of roles an address may hold.
///
/// There is no hierarchy: `Admin` does not satisfy a `Cashier` check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Auditor,
    Cashier,
}

impl Role {
    /// Every role, in display order.
    pub const ALL: [Role; 3] = [Role::Admin, Role::Auditor, Role::Cashier];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Auditor => "auditor",
            Role::Cashier => "cashier",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Role {
    type Err = LedgerError;

    /// Parse a role name. Matching is exact: `"Admin"` is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "auditor" => Ok(Role::Auditor),
            "cashier" => Ok(Role::Cashier),
            other => Err(LedgerError::InvalidRole {
                role: other.to_string(),
            }),
        }
    }
}

/// One address and the single role it currently holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRecord {
    pub address: Address,
    pub role: Role,
    /// The admin who granted the role. The genesis admin grants itself.
    pub added_by: Address,
    pub granted_at: DateTime<Utc>,
}
