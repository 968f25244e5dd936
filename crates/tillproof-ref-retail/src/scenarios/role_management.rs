//! Scenario C: Role Management
//!
//! Shows the identity store's guard rails. Only admins change roles, roles
//! are exact names, and the ledger never lets its last admin go.
//!
//! Walk-through:
//!   1. Unregistered address tries to grant a role → 401
//!   2. Cashier tries to grant a role → 403
//!   3. Sole admin tries to revoke itself → 400 (last admin)
//!   4. Sole admin tries to demote itself to cashier → 400 (last admin)
//!   5. Unknown role names ("manager", "Admin") → 400
//!   6. Malformed address → 400; revoking an unknown address → 404
//!   7. A second admin is appointed and removes the first → 200
//!   8. Admin log listed newest first

use tillproof_contracts::{
    error::{LedgerError, LedgerResult},
    events::AdminAction,
};
use tillproof_policy::LedgerConfig;

use crate::gateway::PosGateway;
use crate::mock_data::{AUDITOR_ADDRESS, CASHIER_ADDRESS, STRANGER_ADDRESS};

use super::{expect_ok, expect_status};

/// Appointed in step 7 to take over from the genesis admin.
const SUCCESSOR_ADDRESS: &str = "0x00000000000000000000000000000000000000a2";

/// Run Scenario C against a fresh gateway built from `config`.
pub fn run_scenario(config: &LedgerConfig) -> LedgerResult<()> {
    println!("=== Scenario C: Role Management ===");
    println!();

    let gateway = PosGateway::new(config.clone())?;
    let admin = config.genesis_admin.as_str();

    expect_ok("grant cashier", gateway.add_user(admin, CASHIER_ADDRESS, "cashier"))?;

    // ── Refusals ──────────────────────────────────────────────────────────────

    let cases = [
        ("unregistered actor", gateway.add_user(STRANGER_ADDRESS, AUDITOR_ADDRESS, "auditor"), 401),
        ("cashier as actor", gateway.add_user(CASHIER_ADDRESS, AUDITOR_ADDRESS, "auditor"), 403),
        ("unknown role", gateway.add_user(admin, AUDITOR_ADDRESS, "manager"), 400),
        ("role name case", gateway.add_user(admin, AUDITOR_ADDRESS, "Admin"), 400),
        ("malformed address", gateway.add_user(admin, "0x123", "auditor"), 400),
        ("self demotion", gateway.add_user(admin, admin, "cashier"), 400),
    ];
    for (step, response, status) in &cases {
        expect_status(step, response, *status)?;
        println!("  {:<22}{} {}", format!("{step}:"), response.status, response.message);
    }

    let self_revoke = gateway.remove_user(admin, admin);
    expect_status("last admin revoke", &self_revoke, 400)?;
    println!("  {:<22}{} {}", "last admin revoke:", self_revoke.status, self_revoke.message);

    let unknown = gateway.remove_user(admin, STRANGER_ADDRESS);
    expect_status("unknown target", &unknown, 404)?;
    println!("  {:<22}{} {}", "unknown target:", unknown.status, unknown.message);
    println!();

    // ── Handover ──────────────────────────────────────────────────────────────

    expect_ok("appoint successor", gateway.add_user(admin, SUCCESSOR_ADDRESS, "admin"))?;
    expect_ok("remove genesis admin", gateway.remove_user(SUCCESSOR_ADDRESS, admin))?;
    println!("  Handover:             {} -> {}", admin, SUCCESSOR_ADDRESS);

    let users = expect_ok("list users", gateway.users())?;
    for user in &users {
        println!("    {:<8} {}", user.role, user.address);
    }

    let log = expect_ok("admin log", gateway.admin_log(SUCCESSOR_ADDRESS))?;
    match log.first() {
        Some(newest) if newest.action == AdminAction::Revoke => {}
        _ => {
            return Err(LedgerError::IntegrityViolation {
                reason: "admin log does not end with the handover revoke".to_string(),
            })
        }
    }
    println!();
    println!("  Admin log ({} action(s), newest first):", log.len());
    for event in &log {
        let role = event.role.map(|r| r.to_string()).unwrap_or_default();
        println!("    {:?} {} {} by {}", event.action, role, event.target, event.actor);
    }
    println!();
    println!("  Scenario C complete.");
    println!();

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tillproof_contracts::identity::Role;

    #[test]
    fn test_scenario_runs_with_default_config() {
        run_scenario(&LedgerConfig::default()).unwrap();
    }

    #[test]
    fn test_refusals_leave_no_admin_log_entries() {
        let gateway = PosGateway::new(LedgerConfig::default()).unwrap();
        let admin = LedgerConfig::default().genesis_admin;

        gateway.add_user(STRANGER_ADDRESS, CASHIER_ADDRESS, "cashier");
        gateway.add_user(&admin, CASHIER_ADDRESS, "supervisor");
        gateway.remove_user(&admin, &admin);

        assert!(gateway.admin_log(&admin).data.unwrap().is_empty());
        assert_eq!(gateway.role_of(&admin).data.flatten(), Some(Role::Admin));
    }

    #[test]
    fn test_role_replacement_logs_grant() {
        let gateway = PosGateway::new(LedgerConfig::default()).unwrap();
        let admin = LedgerConfig::default().genesis_admin;

        gateway.add_user(&admin, CASHIER_ADDRESS, "cashier");
        gateway.add_user(&admin, CASHIER_ADDRESS, "auditor");

        assert_eq!(gateway.role_of(CASHIER_ADDRESS).data.flatten(), Some(Role::Auditor));
        assert_eq!(gateway.has_role(CASHIER_ADDRESS, "cashier").data, Some(false));
        let log = gateway.admin_log(&admin).data.unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].role, Some(Role::Auditor));
    }
}
