//! Exact-role authorization guard.
//!
//! `ExactRoleGuard` implements the `Authorizer` trait from tillproof-core.
//!
//! Decision table:
//!
//! | held role        | outcome            |
//! |------------------|--------------------|
//! | none             | `Unauthenticated`  |
//! | == required      | allow              |
//! | any other role   | `Forbidden`        |
//!
//! There is no role hierarchy. An admin asking to submit sales is refused
//! exactly like an auditor would be.

use tracing::{debug, warn};

use tillproof_contracts::{
    error::{LedgerError, LedgerResult},
    identity::{Address, Role},
};
use tillproof_core::traits::Authorizer;

#[derive(Debug, Clone, Copy, Default)]
pub struct ExactRoleGuard;

impl Authorizer for ExactRoleGuard {
    fn authorize(&self, address: &Address, held: Option<Role>, required: Role) -> LedgerResult<()> {
        match held {
            None => {
                warn!(address = %address, required = %required, "unregistered address refused");
                Err(LedgerError::Unauthenticated {
                    address: address.to_string(),
                })
            }
            Some(role) if role == required => {
                debug!(address = %address, role = %role, "authorized");
                Ok(())
            }
            Some(role) => {
                warn!(
                    address = %address,
                    held = %role,
                    required = %required,
                    "role mismatch, access forbidden"
                );
                Err(LedgerError::Forbidden {
                    address: address.to_string(),
                    held: role,
                    required,
                })
            }
        }
    }
}
