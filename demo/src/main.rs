//! Tillproof Retail Reference Runtime: Demo CLI
//!
//! Runs one or all of the three point-of-sale scenarios against a fresh
//! in-memory ledger, or prints the SHA-256 digest the ledger would record
//! for a file.
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- cashier-submission
//!   cargo run -p demo -- auditor-verification
//!   cargo run -p demo -- role-management
//!   cargo run -p demo -- digest ./S1-2024-01-01.csv
//!   cargo run -p demo -- --config ledger.toml run-all

use std::fs::File;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use tillproof_contracts::error::{LedgerError, LedgerResult};
use tillproof_policy::LedgerConfig;
use tillproof_ref_retail::scenarios::{auditor_verification, cashier_submission, role_management};
use tillproof_verify::Sha256Digester;

// ── CLI definition ────────────────────────────────────────────────────────────

/// Tillproof: role-gated audit ledger for point-of-sale exports.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "Tillproof retail reference runtime demo",
    long_about = "Runs Tillproof retail demo scenarios showing role checks,\n\
                  first-write-wins submissions, digest verification, and\n\
                  hash-chained audit trails."
)]
struct Cli {
    /// Ledger configuration file (TOML). Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run all three retail scenarios in sequence.
    RunAll,
    /// Scenario A: Cashier Submission (first-write-wins, boundary checks).
    CashierSubmission,
    /// Scenario B: Auditor Verification (match, mismatch, trail integrity).
    AuditorVerification,
    /// Scenario C: Role Management (401 / 403 / last admin).
    RoleManagement,
    /// Print the SHA-256 digest of a file as the ledger would record it.
    Digest {
        /// File to hash.
        file: PathBuf,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Set RUST_LOG=info to see ledger decisions as they happen.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let result = load_config(cli.config.as_deref()).and_then(|config| run(cli.command, &config));

    if let Err(e) = result {
        eprintln!("Demo error: {}", e);
        std::process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> LedgerResult<LedgerConfig> {
    match path {
        Some(path) => {
            let config = LedgerConfig::from_file(path)?;
            info!(path = %path.display(), "configuration loaded");
            Ok(config)
        }
        None => Ok(LedgerConfig::default()),
    }
}

// ── Scenario dispatch ─────────────────────────────────────────────────────────

type Scenario = fn(&LedgerConfig) -> LedgerResult<()>;

fn run(command: Command, config: &LedgerConfig) -> LedgerResult<()> {
    let scenarios: Vec<Scenario> = match command {
        Command::Digest { file } => return print_digest(&file),
        Command::RunAll => vec![
            cashier_submission::run_scenario as Scenario,
            auditor_verification::run_scenario as Scenario,
            role_management::run_scenario as Scenario,
        ],
        Command::CashierSubmission => vec![cashier_submission::run_scenario as Scenario],
        Command::AuditorVerification => vec![auditor_verification::run_scenario as Scenario],
        Command::RoleManagement => vec![role_management::run_scenario as Scenario],
    };

    print_banner();
    for scenario in scenarios {
        scenario(config)?;
    }
    println!("All selected scenarios completed successfully.");
    Ok(())
}

fn print_digest(path: &Path) -> LedgerResult<()> {
    let file = File::open(path).map_err(|e| LedgerError::Storage {
        reason: format!("failed to open '{}': {}", path.display(), e),
    })?;
    let digest = Sha256Digester.digest_reader(file)?;
    println!("{}  {}", digest, path.display());
    Ok(())
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("Tillproof: Role-gated POS Audit Ledger");
    println!("Retail Reference Demo");
    println!("======================================");
    println!();
    println!("Ledger pipeline per call:");
    println!("  [1] Boundary checks address shape, upload type and size");
    println!("  [2] Guard: caller must hold exactly the required role");
    println!("  [3] Upload hashed with SHA-256 (lowercase hex)");
    println!("  [4] Sales record inserted once per (store, date); later writes refused");
    println!("  [5] Verifications and role changes appended to SHA-256 hash chains");
    println!();
}

// ── Tests ─────────────────────────────────────────────────────────────────────
