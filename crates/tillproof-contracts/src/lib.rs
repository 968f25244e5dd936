//! # tillproof-contracts
//!
//! Shared types and error contracts for the Tillproof audit ledger.
//!
//! Every crate in the workspace imports from here. No business logic lives
//! in this crate, only data definitions and the error type.

pub mod error;
pub mod events;
pub mod identity;
pub mod sales;
pub mod stats;

#[cfg(test)]
mod tests {
    use super::*;
    use error::LedgerError;
    use events::{AdminAction, EventId};
    use identity::Role;
    use sales::SalesKey;
    use stats::LedgerStatistics;

    // ── Role parsing ─────────────────────────────────────────────────────────

    #[test]
    fn role_parses_every_known_name() {
        for role in Role::ALL {
            let parsed: Role = role.as_str().parse().unwrap();
            assert_eq!(parsed, role);
        }
    }

    #[test]
    fn role_parse_is_case_sensitive() {
        match "Admin".parse::<Role>() {
            Err(LedgerError::InvalidRole { role }) => assert_eq!(role, "Admin"),
            other => panic!("expected InvalidRole, got {:?}", other),
        }
    }

    #[test]
    fn role_parse_rejects_unknown_name() {
        assert!(matches!(
            "manager".parse::<Role>(),
            Err(LedgerError::InvalidRole { .. })
        ));
        assert!(matches!("".parse::<Role>(), Err(LedgerError::InvalidRole { .. })));
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Auditor).unwrap(), "\"auditor\"");
        assert_eq!(
            serde_json::to_string(&AdminAction::Revoke).unwrap(),
            "\"revoke\""
        );
    }

    // ── Keys and ids ─────────────────────────────────────────────────────────

    #[test]
    fn sales_key_display_joins_store_and_date() {
        let key = SalesKey::new("S1", "2024-01-01");
        assert_eq!(key.to_string(), "S1/2024-01-01");
    }

    #[test]
    fn event_ids_are_unique() {
        let ids: std::collections::HashSet<String> =
            (0..100).map(|_| EventId::new().0.to_string()).collect();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn statistics_total_sums_roles() {
        let stats = LedgerStatistics {
            admins: 1,
            auditors: 2,
            cashiers: 4,
            ..Default::default()
        };
        assert_eq!(stats.total_identities(), 7);
    }

    // ── LedgerError display messages ─────────────────────────────────────────

    #[test]
    fn error_forbidden_display() {
        let err = LedgerError::Forbidden {
            address: "0xabc".to_string(),
            held: Role::Cashier,
            required: Role::Admin,
        };
        let msg = err.to_string();
        assert!(msg.contains("0xabc"));
        assert!(msg.contains("cashier"));
        assert!(msg.contains("admin"));
    }

    #[test]
    fn error_duplicate_key_display() {
        let err = LedgerError::DuplicateKey {
            store_id: "S1".to_string(),
            date: "2024-01-01".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("already exists"));
        assert!(msg.contains("S1"));
    }

    #[test]
    fn error_missing_fields_lists_every_field() {
        let err = LedgerError::MissingFields {
            fields: vec!["store_id".to_string(), "date".to_string()],
        };
        assert_eq!(err.to_string(), "missing required fields: store_id, date");
    }

    #[test]
    fn error_last_admin_display() {
        let err = LedgerError::LastAdmin {
            address: "0xdead".to_string(),
        };
        assert!(err.to_string().contains("last admin"));
    }
}
