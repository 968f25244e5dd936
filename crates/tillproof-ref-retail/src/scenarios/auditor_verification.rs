//! Scenario B: Auditor Verification
//!
//! Head office re-uploads a store's export and asks the ledger whether it is
//! the file the cashier submitted. Every attempt, pass or fail, lands in the
//! hash-chained verification trail.
//!
//! Walk-through:
//!   1. Cashier submits the genuine export for (S1, 2024-01-01)
//!   2. Auditor uploads the same bytes → hash_match = true
//!   3. Auditor uploads an export with one quantity altered → hash_match = false
//!   4. Auditor asks about a date nobody submitted → 404, nothing recorded
//!   5. Cashier attempts a verification → 403
//!   6. Trail holds two events and its hash chain verifies

use tillproof_contracts::error::{LedgerError, LedgerResult};
use tillproof_policy::LedgerConfig;

use crate::gateway::{PosGateway, Upload};
use crate::mock_data::{daily_sales_csv, tampered_sales_csv, AUDITOR_ADDRESS, CASHIER_ADDRESS};

use super::{expect_ok, expect_status};

const STORE_ID: &str = "S1";
const BUSINESS_DATE: &str = "2024-01-01";

/// Run Scenario B against a fresh gateway built from `config`.
pub fn run_scenario(config: &LedgerConfig) -> LedgerResult<()> {
    println!("=== Scenario B: Auditor Verification ===");
    println!();

    let gateway = PosGateway::new(config.clone())?;
    let admin = config.genesis_admin.as_str();

    expect_ok("grant cashier", gateway.add_user(admin, CASHIER_ADDRESS, "cashier"))?;
    expect_ok("grant auditor", gateway.add_user(admin, AUDITOR_ADDRESS, "auditor"))?;

    let genuine = Upload::new("S1-2024-01-01.csv", daily_sales_csv(STORE_ID, BUSINESS_DATE));
    let record = expect_ok(
        "submit export",
        gateway.submit_sales(CASHIER_ADDRESS, STORE_ID, BUSINESS_DATE, &genuine),
    )?;
    println!("  Submitted digest:       {}", record.digest);
    println!();

    // ── Matching upload ───────────────────────────────────────────────────────

    let response = gateway.audit_sales(AUDITOR_ADDRESS, STORE_ID, BUSINESS_DATE, &genuine);
    let message = response.message.clone();
    let passed = expect_ok("verify genuine export", response)?;
    println!("  Genuine export:         hash_match = {} ({})", passed.hash_match, message);

    // ── Altered upload ────────────────────────────────────────────────────────

    let altered = Upload::new("S1-2024-01-01.csv", tampered_sales_csv(STORE_ID, BUSINESS_DATE));
    let response = gateway.audit_sales(AUDITOR_ADDRESS, STORE_ID, BUSINESS_DATE, &altered);
    let message = response.message.clone();
    let failed = expect_ok("verify altered export", response)?;
    println!("  Altered export:         hash_match = {} ({})", failed.hash_match, message);
    println!("    uploaded digest:      {}", failed.uploaded_digest);
    println!("    stored digest:        {}", failed.stored_digest);

    if !passed.hash_match || failed.hash_match {
        return Err(LedgerError::IntegrityViolation {
            reason: "verification outcomes do not reflect the uploads".to_string(),
        });
    }

    // ── Refused verifications ─────────────────────────────────────────────────

    let missing = gateway.audit_sales(AUDITOR_ADDRESS, STORE_ID, "2024-01-02", &genuine);
    expect_status("unknown record", &missing, 404)?;
    println!("  Unknown record:         {} {}", missing.status, missing.message);

    let cashier = gateway.audit_sales(CASHIER_ADDRESS, STORE_ID, BUSINESS_DATE, &genuine);
    expect_status("cashier verification", &cashier, 403)?;
    println!("  Cashier verification:   {} {}", cashier.status, cashier.message);
    println!();

    // ── Trail integrity ───────────────────────────────────────────────────────

    let trail = expect_ok("audit trail", gateway.audit_trail(STORE_ID, BUSINESS_DATE))?;
    let integrity_ok = gateway.store().verify_integrity();
    let log = gateway.store().audit_log()?;

    println!(
        "  Verification trail:     {} ({} event(s) in chain)",
        if integrity_ok { "VERIFIED" } else { "FAILED" },
        trail.len()
    );
    if let Some(last) = log.last() {
        println!("  Chain head:             {}", last.this_hash);
    }
    println!();
    println!("  Scenario B complete.");
    println!();

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
