//! Scenario A: Cashier Submission
//!
//! A cashier uploads the end-of-day export for store S1. The boundary checks
//! the upload, the ledger hashes it and records the digest under
//! `(S1, 2024-01-01)`.
//!
//! Walk-through:
//!   1. Admin grants the cashier role to two till operators
//!   2. First cashier submits the export → 200, digest recorded
//!   3. Public lookup returns the same digest
//!   4. Second cashier submits for the same key → 409, first record kept
//!   5. Unregistered address submits → 401
//!   6. A `.pdf` upload is refused at the boundary → 400

use tillproof_contracts::error::{LedgerError, LedgerResult};
use tillproof_core::traits::ContentDigest;
use tillproof_policy::LedgerConfig;
use tillproof_verify::{engine::is_well_formed, Sha256Digester};

use crate::gateway::{PosGateway, Upload};
use crate::mock_data::{
    daily_sales_csv, tampered_sales_csv, CASHIER_ADDRESS, SECOND_CASHIER_ADDRESS,
    STRANGER_ADDRESS,
};

use super::{expect_ok, expect_status};

const STORE_ID: &str = "S1";
const BUSINESS_DATE: &str = "2024-01-01";

/// Run Scenario A against a fresh gateway built from `config`.
pub fn run_scenario(config: &LedgerConfig) -> LedgerResult<()> {
    println!("=== Scenario A: Cashier Submission ===");
    println!();

    let gateway = PosGateway::new(config.clone())?;
    let admin = config.genesis_admin.as_str();

    expect_ok("grant cashier", gateway.add_user(admin, CASHIER_ADDRESS, "cashier"))?;
    expect_ok(
        "grant second cashier",
        gateway.add_user(admin, SECOND_CASHIER_ADDRESS, "cashier"),
    )?;
    println!("  Cashiers registered:    {}, {}", CASHIER_ADDRESS, SECOND_CASHIER_ADDRESS);

    // ── First submission ──────────────────────────────────────────────────────

    let export = daily_sales_csv(STORE_ID, BUSINESS_DATE);
    let upload = Upload::new(format!("{STORE_ID}-{BUSINESS_DATE}.csv"), export.clone());

    let record = expect_ok(
        "submit export",
        gateway.submit_sales(CASHIER_ADDRESS, STORE_ID, BUSINESS_DATE, &upload),
    )?;
    println!("  Submitted:              {} ({} bytes)", record.key, export.len());
    println!("  Recorded digest:        {}", record.digest);

    if !is_well_formed(&record.digest) || record.digest != Sha256Digester.digest(&export) {
        return Err(LedgerError::IntegrityViolation {
            reason: "recorded digest differs from the SHA-256 of the export".to_string(),
        });
    }

    let stored = expect_ok("lookup", gateway.sales_hash(STORE_ID, BUSINESS_DATE))?;
    let lookup_matches = stored.as_ref() == Some(&record);
    println!(
        "  Public lookup:          {}",
        if lookup_matches { "MATCHES" } else { "DIFFERS" }
    );

    // ── Refused submissions ───────────────────────────────────────────────────

    let rival = Upload::new("rival.csv", tampered_sales_csv(STORE_ID, BUSINESS_DATE));
    let duplicate = gateway.submit_sales(SECOND_CASHIER_ADDRESS, STORE_ID, BUSINESS_DATE, &rival);
    expect_status("duplicate submission", &duplicate, 409)?;
    println!("  Duplicate submission:   {} {}", duplicate.status, duplicate.message);

    let stranger = gateway.submit_sales(STRANGER_ADDRESS, "S2", BUSINESS_DATE, &upload);
    expect_status("unregistered submitter", &stranger, 401)?;
    println!("  Unregistered submitter: {} {}", stranger.status, stranger.message);

    let pdf = Upload::new("export.pdf", export);
    let wrong_type = gateway.submit_sales(CASHIER_ADDRESS, "S3", BUSINESS_DATE, &pdf);
    expect_status("unsupported upload", &wrong_type, 400)?;
    println!("  Unsupported upload:     {} {}", wrong_type.status, wrong_type.message);

    let history = expect_ok("history", gateway.submission_history(CASHIER_ADDRESS))?;
    println!("  Cashier history:        {} record(s)", history.len());
    println!();
    println!("  Scenario A complete.");
    println!();

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
