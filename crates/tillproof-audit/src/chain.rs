//! Hash-chain primitives: hashing and chain integrity verification.
//!
//! Both event logs (verification trail and admin actions) are chained the
//! same way. Every field that contributes to an entry's hash is listed
//! explicitly so nothing is accidentally omitted.
//!
//! Hash input layout (bytes, in order):
//!   1. log name as UTF-8 bytes ("audit" or "admin")
//!   2. sequence as 8-byte little-endian
//!   3. prev_hash as UTF-8 bytes (64 ASCII hex chars)
//!   4. canonical JSON of the event (serde_json, no pretty-printing)

use serde::Serialize;
use sha2::{Digest, Sha256};

use tillproof_contracts::error::{LedgerError, LedgerResult};

use crate::event::{LogEntry, GENESIS_HASH};

/// Compute the SHA-256 hash of one log entry.
///
/// The log name separates the two chains: the same event bytes at the same
/// position hash differently in the audit log and in the admin log.
///
/// Returns a lowercase 64-character hex string.
pub fn hash_entry<T: Serialize>(
    log: &str,
    sequence: u64,
    event: &T,
    prev_hash: &str,
) -> LedgerResult<String> {
    let event_json = serde_json::to_vec(event).map_err(|e| LedgerError::Storage {
        reason: format!("failed to serialize {log} log entry {sequence}: {e}"),
    })?;

    let mut hasher = Sha256::new();
    hasher.update(log.as_bytes());
    hasher.update(sequence.to_le_bytes());
    hasher.update(prev_hash.as_bytes());
    hasher.update(&event_json);

    Ok(hex::encode(hasher.finalize()))
}

/// Verify the integrity of a hash chain.
///
/// Returns `true` when every entry satisfies all three rules:
///
/// 1. **Position**: `sequence` equals the entry's index.
/// 2. **Prev-hash linkage**: `prev_hash` equals the preceding entry's
///    `this_hash` (or `GENESIS_HASH` for entry 0).
/// 3. **Hash correctness**: `this_hash` matches the value recomputed from
///    the entry's own fields.
///
/// An empty chain is valid.
pub fn verify_chain<T: Serialize>(log: &str, entries: &[LogEntry<T>]) -> bool {
    let mut expected_prev = GENESIS_HASH.to_string();

    for (index, entry) in entries.iter().enumerate() {
        if entry.sequence != index as u64 {
            return false;
        }

        if entry.prev_hash != expected_prev {
            return false;
        }

        match hash_entry(log, entry.sequence, &entry.event, &entry.prev_hash) {
            Ok(recomputed) if recomputed == entry.this_hash => {}
            _ => return false,
        }

        expected_prev = entry.this_hash.clone();
    }

    true
}
