//! Aggregate statistics derived from the identity table, the sales ledger,
//! and the audit trail.
//!
//! The calendar month is evaluated in the time zone of the reference time.
//! `Ledger::statistics` uses the machine's local zone, so two hosts in
//! different zones can disagree near a month boundary. That is accepted
//! behavior.

use chrono::{DateTime, Datelike, Local, TimeZone};
use tracing::debug;

use tillproof_contracts::{error::LedgerResult, identity::Role, stats::LedgerStatistics};

use crate::ledger::Ledger;

impl Ledger {
    /// Statistics relative to the ledger clock's "now", in local time.
    pub fn statistics(&self) -> LedgerResult<LedgerStatistics> {
        let now = self.clock().now().with_timezone(&Local);
        self.statistics_at(&now)
    }

    /// Statistics relative to `now`, counting the month in `now`'s zone.
    pub fn statistics_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> LedgerResult<LedgerStatistics> {
        let identities = self.store().identities()?;
        let sales = self.store().sales()?;
        let audits = self.store().audit_events()?;

        let zone = now.timezone();
        let sales_this_month = sales
            .iter()
            .filter(|r| {
                let submitted = r.submitted_at.with_timezone(&zone);
                submitted.year() == now.year() && submitted.month() == now.month()
            })
            .count();

        let stats = LedgerStatistics {
            admins: identities.count(Role::Admin),
            auditors: identities.count(Role::Auditor),
            cashiers: identities.count(Role::Cashier),
            total_sales: sales.len(),
            sales_this_month,
            total_verifications: audits.len(),
            failed_verifications: audits.iter().filter(|e| !e.hash_match).count(),
        };

        debug!(
            identities = stats.total_identities(),
            total_sales = stats.total_sales,
            sales_this_month = stats.sales_this_month,
            "statistics computed"
        );

        Ok(stats)
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone, Utc};

    use tillproof_contracts::{identity::Role, sales::Digest};

    use crate::mocks::{addr, ledger_with_clock};

    #[test]
    fn test_counts_roles_sales_and_audits() {
        let (ledger, admin, _clock) =
            ledger_with_clock(Utc.with_ymd_and_hms(2024, 3, 10, 9, 0, 0).unwrap());
        let cashier = addr("cashier");
        let auditor = addr("auditor");
        ledger.grant(&cashier, Role::Cashier, &admin).unwrap();
        ledger.grant(&auditor, Role::Auditor, &admin).unwrap();

        ledger.submit("S1", "2024-03-09", Digest::new("aa"), &cashier).unwrap();
        ledger.submit("S1", "2024-03-10", Digest::new("bb"), &cashier).unwrap();
        ledger
            .record_verification("S1", "2024-03-09", Digest::new("aa"), &auditor)
            .unwrap();
        ledger
            .record_verification("S1", "2024-03-10", Digest::new("cc"), &auditor)
            .unwrap();

        let now = Utc.with_ymd_and_hms(2024, 3, 20, 0, 0, 0).unwrap();
        let stats = ledger.statistics_at(&now).unwrap();
        assert_eq!(stats.admins, 1);
        assert_eq!(stats.auditors, 1);
        assert_eq!(stats.cashiers, 1);
        assert_eq!(stats.total_identities(), 3);
        assert_eq!(stats.total_sales, 2);
        assert_eq!(stats.sales_this_month, 2);
        assert_eq!(stats.total_verifications, 2);
        assert_eq!(stats.failed_verifications, 1);
    }

    #[test]
    fn test_month_excludes_earlier_months() {
        let (ledger, admin, clock) =
            ledger_with_clock(Utc.with_ymd_and_hms(2024, 2, 10, 9, 0, 0).unwrap());
        let cashier = addr("cashier");
        ledger.grant(&cashier, Role::Cashier, &admin).unwrap();
        ledger.submit("S1", "2024-02-10", Digest::new("aa"), &cashier).unwrap();

        clock.set(Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap());
        ledger.submit("S1", "2024-03-01", Digest::new("bb"), &cashier).unwrap();

        let now = Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap();
        let stats = ledger.statistics_at(&now).unwrap();
        assert_eq!(stats.total_sales, 2);
        assert_eq!(stats.sales_this_month, 1);
    }

    #[test]
    fn test_month_boundary_follows_reference_zone() {
        // 2024-02-29 23:30 UTC is already March 1st in UTC+2.
        let (ledger, admin, _clock) =
            ledger_with_clock(Utc.with_ymd_and_hms(2024, 2, 29, 23, 30, 0).unwrap());
        let cashier = addr("cashier");
        ledger.grant(&cashier, Role::Cashier, &admin).unwrap();
        ledger.submit("S1", "2024-02-29", Digest::new("aa"), &cashier).unwrap();

        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        let march_in_plus_two = plus_two.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap();
        assert_eq!(ledger.statistics_at(&march_in_plus_two).unwrap().sales_this_month, 1);

        let march_in_utc = Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap();
        assert_eq!(ledger.statistics_at(&march_in_utc).unwrap().sales_this_month, 0);
    }

    #[test]
    fn test_statistics_uses_ledger_clock() {
        let (ledger, _admin, _clock) =
            ledger_with_clock(Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap());
        let stats = ledger.statistics().unwrap();
        assert_eq!(stats.admins, 1);
        assert_eq!(stats.total_sales, 0);
        assert_eq!(stats.sales_this_month, 0);
    }
}
