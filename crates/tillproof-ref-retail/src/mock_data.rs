//! Simulated point-of-sale data for the Tillproof reference runtime.
//!
//! All data in this module is hardcoded and fictional. It stands in for the
//! daily export a real till system would upload.

/// Deployer address, seeded as the genesis admin in the demo scenarios.
pub const ADMIN_ADDRESS: &str = "0x00000000000000000000000000000000000000a1";

/// Front-of-house cashier at store S1.
pub const CASHIER_ADDRESS: &str = "0x000000000000000000000000000000000000c001";

/// Second cashier, used for the duplicate-submission case.
pub const SECOND_CASHIER_ADDRESS: &str = "0x000000000000000000000000000000000000c002";

/// Head-office auditor.
pub const AUDITOR_ADDRESS: &str = "0x00000000000000000000000000000000000a0d17";

/// An address nobody has granted a role to.
pub const STRANGER_ADDRESS: &str = "0x000000000000000000000000000000000000beef";

/// One line of a till export.
struct SaleLine {
    sku: &'static str,
    description: &'static str,
    quantity: u32,
    unit_price_cents: u64,
}

const CATALOGUE: &[SaleLine] = &[
    SaleLine { sku: "GRO-0001", description: "Whole milk 1L", quantity: 42, unit_price_cents: 129 },
    SaleLine { sku: "GRO-0107", description: "Sourdough loaf", quantity: 18, unit_price_cents: 349 },
    SaleLine { sku: "BEV-0220", description: "Sparkling water 6pk", quantity: 11, unit_price_cents: 499 },
    SaleLine { sku: "HOU-0310", description: "Dish soap 500ml", quantity: 7, unit_price_cents: 275 },
];

/// Build the CSV export for one store and business date.
///
/// The output is deterministic: the same arguments always produce the same
/// bytes, so the same digest.
pub fn daily_sales_csv(store_id: &str, date: &str) -> Vec<u8> {
    let mut csv = String::from("store_id,date,sku,description,quantity,unit_price_cents,line_total_cents\n");
    let mut total: u64 = 0;

    for line in CATALOGUE {
        let line_total = u64::from(line.quantity) * line.unit_price_cents;
        total += line_total;
        csv.push_str(&format!(
            "{},{},{},{},{},{},{}\n",
            store_id, date, line.sku, line.description, line.quantity, line.unit_price_cents, line_total
        ));
    }

    csv.push_str(&format!("{},{},TOTAL,,,,{}\n", store_id, date, total));
    csv.into_bytes()
}

/// The same export with one line's quantity altered after submission.
pub fn tampered_sales_csv(store_id: &str, date: &str) -> Vec<u8> {
    let original = String::from_utf8_lossy(&daily_sales_csv(store_id, date)).into_owned();
    original
        .replacen("Sourdough loaf,18,", "Sourdough loaf,12,", 1)
        .into_bytes()
}
