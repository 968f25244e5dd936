//! # tillproof-policy
//!
//! Authorization and boundary rules for the Tillproof ledger.
//!
//! ## Overview
//!
//! - [`ExactRoleGuard`] implements the
//!   [`Authorizer`](tillproof_core::traits::Authorizer) trait: an operation
//!   is allowed only when the caller holds exactly the required role.
//! - [`AddressFormat`] and [`UploadLimits`] are the structural checks the
//!   boundary layer applies before calling the ledger.
//! - [`LedgerConfig`] loads all of the above from TOML.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::path::Path;
//! use tillproof_policy::{ExactRoleGuard, LedgerConfig};
//!
//! let config = LedgerConfig::from_file(Path::new("tillproof.toml"))?;
//! let deployer = config.genesis_address()?;
//! // Pass `Box::new(ExactRoleGuard)` to `tillproof_core::Ledger::genesis(...)`.
//! ```

pub mod boundary;
pub mod config;
pub mod guard;

pub use boundary::{AddressFormat, UploadLimits};
pub use config::LedgerConfig;
pub use guard::ExactRoleGuard;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tillproof_contracts::{
        error::LedgerError,
        identity::{Address, Role},
    };
    use tillproof_core::traits::Authorizer;

    use crate::{AddressFormat, ExactRoleGuard, LedgerConfig, UploadLimits};

    fn who() -> Address {
        Address::new("0x00000000000000000000000000000000000000b2")
    }

    // ── 1. guard decision table ───────────────────────────────────────────────

    #[test]
    fn test_exact_role_allows() {
        for role in Role::ALL {
            assert!(ExactRoleGuard.authorize(&who(), Some(role), role).is_ok());
        }
    }

    #[test]
    fn test_no_role_is_unauthenticated() {
        match ExactRoleGuard.authorize(&who(), None, Role::Cashier) {
            Err(LedgerError::Unauthenticated { address }) => assert_eq!(address, who().0),
            other => panic!("expected Unauthenticated, got {:?}", other),
        }
    }

    /// Admin must not satisfy a cashier-only or auditor-only check.
    #[test]
    fn test_no_role_hierarchy() {
        for required in [Role::Cashier, Role::Auditor] {
            match ExactRoleGuard.authorize(&who(), Some(Role::Admin), required) {
                Err(LedgerError::Forbidden { held, required: r, .. }) => {
                    assert_eq!(held, Role::Admin);
                    assert_eq!(r, required);
                }
                other => panic!("expected Forbidden, got {:?}", other),
            }
        }
    }

    // ── 2. address format ─────────────────────────────────────────────────────

    #[test]
    fn test_address_format_accepts_well_formed() {
        let format = AddressFormat::default();
        let parsed = format.parse("0x00000000000000000000000000000000000000b2").unwrap();
        assert_eq!(parsed, who());
    }

    #[test]
    fn test_address_format_rejects_prefix_and_length() {
        let format = AddressFormat::default();

        match format.parse("1x00000000000000000000000000000000000000b2") {
            Err(LedgerError::InvalidAddressFormat { reason, .. }) => {
                assert!(reason.contains("0x"), "unexpected reason: {reason}");
            }
            other => panic!("expected InvalidAddressFormat, got {:?}", other),
        }

        match format.parse("0xabc") {
            Err(LedgerError::InvalidAddressFormat { reason, .. }) => {
                assert!(reason.contains("42"), "unexpected reason: {reason}");
            }
            other => panic!("expected InvalidAddressFormat, got {:?}", other),
        }
    }

    // ── 3. upload limits ──────────────────────────────────────────────────────

    #[test]
    fn test_upload_allows_listed_extensions_any_case() {
        let limits = UploadLimits::default();
        for name in ["sales.csv", "sales.JSON", "z.txt", "book.Xlsx"] {
            assert!(limits.check(name, 10).is_ok(), "{name} should be accepted");
        }
    }

    #[test]
    fn test_upload_rejects_unlisted_extension() {
        let limits = UploadLimits::default();
        match limits.check("payload.exe", 10) {
            Err(LedgerError::UnsupportedFileType { extension }) => assert_eq!(extension, ".exe"),
            other => panic!("expected UnsupportedFileType, got {:?}", other),
        }
        assert!(matches!(
            limits.check("README", 10),
            Err(LedgerError::UnsupportedFileType { .. })
        ));
    }

    #[test]
    fn test_upload_size_cap_is_inclusive() {
        let limits = UploadLimits::default();
        assert!(limits.check("a.csv", limits.max_bytes).is_ok());
        match limits.check("a.csv", limits.max_bytes + 1) {
            Err(LedgerError::FileTooLarge { size, limit }) => {
                assert_eq!(size, limit + 1);
            }
            other => panic!("expected FileTooLarge, got {:?}", other),
        }
    }

    // ── 4. configuration ──────────────────────────────────────────────────────

    #[test]
    fn test_empty_toml_yields_defaults() {
        let config = LedgerConfig::from_toml_str("").unwrap();
        assert_eq!(config, LedgerConfig::default());
        assert_eq!(config.upload.max_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn test_toml_overrides() {
        let toml = r#"
            genesis_admin = "acct-0001"

            [address]
            prefix = "acct-"
            length = 9

            [upload]
            max_bytes = 1024
            allowed_extensions = [".csv"]
        "#;

        let config = LedgerConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.genesis_address().unwrap(), Address::new("acct-0001"));
        assert_eq!(config.upload.max_bytes, 1024);
        assert!(config.upload.check("a.json", 1).is_err());
    }

    #[test]
    fn test_genesis_admin_must_match_format() {
        let toml = r#"genesis_admin = "not-an-address""#;
        match LedgerConfig::from_toml_str(toml) {
            Err(LedgerError::ConfigError { reason }) => {
                assert!(reason.contains("genesis_admin"), "unexpected reason: {reason}");
            }
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    #[test]
    fn test_toml_parse_error() {
        match LedgerConfig::from_toml_str("this is not valid toml ][[[") {
            Err(LedgerError::ConfigError { reason }) => {
                assert!(reason.contains("failed to parse ledger TOML"));
            }
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[upload]\nmax_bytes = 2048").unwrap();

        let config = LedgerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.upload.max_bytes, 2048);

        assert!(matches!(
            LedgerConfig::from_file(std::path::Path::new("/nonexistent/tillproof.toml")),
            Err(LedgerError::ConfigError { .. })
        ));
    }
}
