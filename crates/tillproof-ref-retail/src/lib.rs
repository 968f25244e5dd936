//! # tillproof-ref-retail
//!
//! Retail reference runtime for the Tillproof audit ledger.
//!
//! Wires the real components (exact-role guard, SHA-256 digester, hash-chained
//! in-memory store) behind a point-of-sale style boundary and demonstrates
//! three flows with mock till exports:
//!
//! 1. **Cashier submission**: a daily export is hashed and recorded; a second
//!    submission for the same store and date is refused.
//! 2. **Auditor verification**: the genuine export verifies, an altered one
//!    is recorded as a mismatch, and the trail's hash chain is checked.
//! 3. **Role management**: non-admins are refused, the last admin cannot be
//!    removed, and unknown role names are rejected.
//!
//! All data is hardcoded and fictional.

pub mod gateway;
pub mod mock_data;
pub mod scenarios;

pub use gateway::{status_for, ApiResponse, PosGateway, Upload};
