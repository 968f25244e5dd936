//! Retail reference runtime demo scenarios.
//!
//! Each scenario builds its own `PosGateway` from the given configuration,
//! drives it with mock till data and prints what the ledger decided.

pub mod auditor_verification;
pub mod cashier_submission;
pub mod role_management;

use tillproof_contracts::error::{LedgerError, LedgerResult};

use crate::gateway::ApiResponse;

/// Unwrap a response the scenario expects to succeed.
pub(crate) fn expect_ok<T>(step: &str, response: ApiResponse<T>) -> LedgerResult<T> {
    match (response.success, response.data) {
        (true, Some(data)) => Ok(data),
        _ => Err(LedgerError::IntegrityViolation {
            reason: format!("{step}: unexpected failure ({}): {}", response.status, response.message),
        }),
    }
}

/// Check that a response failed with the expected status.
pub(crate) fn expect_status<T>(step: &str, response: &ApiResponse<T>, status: u16) -> LedgerResult<()> {
    if response.status == status && !response.success {
        return Ok(());
    }
    Err(LedgerError::IntegrityViolation {
        reason: format!(
            "{step}: expected status {status}, got {} ({})",
            response.status, response.message
        ),
    })
}
