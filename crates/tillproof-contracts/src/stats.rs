//! Aggregate statistics over identities, sales, and audits.

use serde::{Deserialize, Serialize};

/// A point-in-time summary. Derived on demand; never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerStatistics {
    pub admins: usize,
    pub auditors: usize,
    pub cashiers: usize,
    pub total_sales: usize,
    /// Submissions whose `submitted_at` falls in the calendar month of the
    /// reference time, evaluated in the reference time's own zone.
    pub sales_this_month: usize,
    pub total_verifications: usize,
    pub failed_verifications: usize,
}

impl LedgerStatistics {
    pub fn total_identities(&self) -> usize {
        self.admins + self.auditors + self.cashiers
    }
}
