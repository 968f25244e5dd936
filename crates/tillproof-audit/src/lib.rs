//! # tillproof-audit
//!
//! The reference persistence provider for the Tillproof ledger: an
//! in-memory store whose verification trail and admin action log are
//! append-only, SHA-256 hash-chained logs.
//!
//! ## Overview
//!
//! Each appended event is wrapped in a `LogEntry` that links to the previous
//! entry via its SHA-256 hash. Altering any stored event, even by a single
//! byte, breaks the chain and is detected by `verify_chain`. Snapshots that
//! fail verification are refused on load.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tillproof_audit::InMemoryStore;
//!
//! let store = Arc::new(InMemoryStore::new());
//! let ledger = Ledger::genesis(Box::new(Arc::clone(&store)), guard, digester, clock, &deployer)?;
//! // ... operate the ledger ...
//! assert!(store.verify_integrity());
//! store.save_to(Path::new("ledger.json"))?;
//! ```

pub mod chain;
pub mod event;
pub mod memory;

pub use chain::{hash_entry, verify_chain};
pub use event::{LogEntry, StoreSnapshot, ADMIN_LOG, AUDIT_LOG, GENESIS_HASH};
pub use memory::InMemoryStore;

// ── Tests ─────────────────────────────────────────────────────────────────────
