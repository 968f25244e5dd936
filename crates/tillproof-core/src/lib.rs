//! # tillproof-core
//!
//! The role-gated ledger service for Tillproof.
//!
//! This crate provides:
//! - The four seam traits (`LedgerStore`, `Authorizer`, `ContentDigest`, `Clock`)
//! - The `Ledger` that wires them together in the correct trust order
//! - Aggregate statistics derived from the ledger's state
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tillproof_core::{Ledger, traits::SystemClock};
//!
//! let ledger = Ledger::genesis(store, guard, digester, Box::new(SystemClock), &deployer)?;
//! ledger.grant(&cashier, Role::Cashier, &deployer)?;
//! ```

pub mod ledger;
pub mod stats;
pub mod traits;

#[cfg(test)]
mod mocks;

pub use ledger::Ledger;
