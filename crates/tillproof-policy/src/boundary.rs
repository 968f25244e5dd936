//! Structural checks applied at the boundary before a request reaches the
//! ledger: address shape and upload limits.
//!
//! These are shape checks only. A well-formed address proves nothing about
//! who sent the request.

use std::path::Path;

use serde::{Deserialize, Serialize};

use tillproof_contracts::{
    error::{LedgerError, LedgerResult},
    identity::Address,
};

/// Ten mebibytes.
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Expected shape of a wallet address: a fixed prefix and a fixed total
/// length, e.g. `0x` followed by 40 characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressFormat {
    pub prefix: String,
    /// Total length in characters, prefix included.
    pub length: usize,
}

impl Default for AddressFormat {
    fn default() -> Self {
        Self {
            prefix: "0x".to_string(),
            length: 42,
        }
    }
}

impl AddressFormat {
    /// Check `raw` against the format and wrap it as an `Address`.
    pub fn parse(&self, raw: &str) -> LedgerResult<Address> {
        if !raw.starts_with(&self.prefix) {
            return Err(LedgerError::InvalidAddressFormat {
                address: raw.to_string(),
                reason: format!("must start with '{}'", self.prefix),
            });
        }
        let length = raw.chars().count();
        if length != self.length {
            return Err(LedgerError::InvalidAddressFormat {
                address: raw.to_string(),
                reason: format!("must be {} characters, got {}", self.length, length),
            });
        }
        Ok(Address::new(raw))
    }
}

/// Size cap and extension allow-list for uploaded sales files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadLimits {
    pub max_bytes: u64,
    /// Lowercase extensions including the leading dot.
    pub allowed_extensions: Vec<String>,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            allowed_extensions: [".csv", ".json", ".txt", ".xlsx"]
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }
}

impl UploadLimits {
    /// Accept or reject an upload by name and size.
    ///
    /// The extension check is case-insensitive; a file without an
    /// extension is rejected.
    pub fn check(&self, file_name: &str, size: u64) -> LedgerResult<()> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e.to_lowercase()))
            .unwrap_or_default();

        if !self.allowed_extensions.iter().any(|a| a == &extension) {
            return Err(LedgerError::UnsupportedFileType {
                extension: if extension.is_empty() {
                    "(none)".to_string()
                } else {
                    extension
                },
            });
        }

        if size > self.max_bytes {
            return Err(LedgerError::FileTooLarge {
                size,
                limit: self.max_bytes,
            });
        }

        Ok(())
    }
}
