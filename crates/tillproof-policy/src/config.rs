//! TOML deployment configuration.
//!
//! ```toml
//! genesis_admin = "0x00000000000000000000000000000000000000a1"
//!
//! [address]
//! prefix = "0x"
//! length = 42
//!
//! [upload]
//! max_bytes = 10485760
//! allowed_extensions = [".csv", ".json", ".txt", ".xlsx"]
//! ```
//!
//! Every key is optional; missing keys take their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use tillproof_contracts::{
    error::{LedgerError, LedgerResult},
    identity::Address,
};

use crate::boundary::{AddressFormat, UploadLimits};

/// Address seeded as the first admin when none is configured.
pub const DEFAULT_GENESIS_ADMIN: &str = "0x00000000000000000000000000000000000000a1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// The deployer. Seeded as admin when the store holds no admin.
    pub genesis_admin: String,
    pub address: AddressFormat,
    pub upload: UploadLimits,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            genesis_admin: DEFAULT_GENESIS_ADMIN.to_string(),
            address: AddressFormat::default(),
            upload: UploadLimits::default(),
        }
    }
}

impl LedgerConfig {
    /// Parse `s` as TOML and validate the result.
    ///
    /// Returns `LedgerError::ConfigError` if the TOML is malformed, or if
    /// the genesis admin does not satisfy the configured address format.
    pub fn from_toml_str(s: &str) -> LedgerResult<Self> {
        let config: LedgerConfig = toml::from_str(s).map_err(|e| LedgerError::ConfigError {
            reason: format!("failed to parse ledger TOML: {}", e),
        })?;
        config.genesis_address()?;
        debug!(genesis_admin = %config.genesis_admin, "ledger configuration loaded");
        Ok(config)
    }

    /// Read the file at `path` and parse it as TOML ledger configuration.
    pub fn from_file(path: &Path) -> LedgerResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| LedgerError::ConfigError {
            reason: format!("failed to read config file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// The genesis admin, checked against the address format.
    pub fn genesis_address(&self) -> LedgerResult<Address> {
        self.address
            .parse(&self.genesis_admin)
            .map_err(|e| LedgerError::ConfigError {
                reason: format!("genesis_admin: {}", e),
            })
    }
}
