//! SHA-256 content integrity engine.
//!
//! `Sha256Digester` implements the `ContentDigest` trait from
//! `tillproof-core`. Digests are the lowercase hex encoding of the SHA-256
//! of the raw bytes: always 64 characters, no prefix, no normalization of
//! the input (line endings, BOMs and trailing whitespace all count).

use std::io::Read;

use sha2::{Digest as _, Sha256};
use tracing::{debug, warn};

use tillproof_contracts::{
    error::{LedgerError, LedgerResult},
    sales::Digest,
};
use tillproof_core::traits::ContentDigest;

/// Length of a hex-encoded SHA-256 digest.
pub const DIGEST_HEX_LEN: usize = 64;

const READ_CHUNK: usize = 64 * 1024;

#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Digester;

impl Sha256Digester {
    /// Hash everything `reader` yields, in fixed-size chunks.
    ///
    /// Produces the same digest as `digest()` over the concatenated bytes.
    /// I/O failures surface as `LedgerError::Storage`.
    pub fn digest_reader<R: Read>(&self, mut reader: R) -> LedgerResult<Digest> {
        let mut hasher = Sha256::new();
        let mut buf = vec![0u8; READ_CHUNK];
        let mut total: u64 = 0;

        loop {
            let n = reader.read(&mut buf).map_err(|e| {
                warn!(error = %e, "read failed while hashing upload");
                LedgerError::Storage {
                    reason: format!("failed to read upload: {}", e),
                }
            })?;
            if n == 0 {
                break;
            }
            hasher.update(&buf[..n]);
            total += n as u64;
        }

        let digest = Digest::new(hex::encode(hasher.finalize()));
        debug!(bytes = total, digest = %digest, "streamed digest computed");
        Ok(digest)
    }
}

impl ContentDigest for Sha256Digester {
    fn digest(&self, bytes: &[u8]) -> Digest {
        Digest::new(hex::encode(Sha256::digest(bytes)))
    }
}

/// True if `digest` has the shape this engine produces: 64 lowercase hex
/// characters.
pub fn is_well_formed(digest: &Digest) -> bool {
    let s = digest.as_str();
    s.len() == DIGEST_HEX_LEN && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
