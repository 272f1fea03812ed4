// Expiration extraction
//
// Pure derivation of ExpirationEvents from a loaded ledger. The reference
// day is passed in so one "today" covers the whole batch.

use chrono::NaiveDate;

use crate::dates;
use crate::types::{AssetLedger, AssetRow, ExpirationEvent, ExpiryType, RawDate, TrackedColumns};

/// Derive events from every row of the ledger.
///
/// Each tracked date field present in the source yields at most one event;
/// cells that fail normalization are skipped without aborting the row.
/// `days_remaining` may be negative here; window filtering happens later.
pub fn extract_events(ledger: &AssetLedger, today: NaiveDate) -> Vec<ExpirationEvent> {
    let mut events = Vec::new();
    for row in &ledger.rows {
        push_event(
            &mut events,
            row,
            ExpiryType::Warranty,
            &row.warranty_expiry,
            ledger.present,
            today,
        );
        push_event(
            &mut events,
            row,
            ExpiryType::Maintenance,
            &row.maintenance_expiry,
            ledger.present,
            today,
        );
    }
    events
}

fn push_event(
    events: &mut Vec<ExpirationEvent>,
    row: &AssetRow,
    expiry_type: ExpiryType,
    raw: &RawDate,
    present: TrackedColumns,
    today: NaiveDate,
) {
    if !present.contains(expiry_type) {
        return;
    }
    if let Some(expiry_date) = dates::normalize(raw) {
        events.push(ExpirationEvent {
            customer_name: row.customer_name.clone(),
            product: row.product.clone(),
            expiry_type,
            expiry_date,
            days_remaining: (expiry_date - today).num_days(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn row(warranty: RawDate, maintenance: RawDate) -> AssetRow {
        AssetRow {
            customer_name: "Acme".to_string(),
            product: "Router".to_string(),
            warranty_expiry: warranty,
            maintenance_expiry: maintenance,
        }
    }

    fn ledger(rows: Vec<AssetRow>, present: TrackedColumns) -> AssetLedger {
        AssetLedger {
            headers: vec![],
            rows,
            present,
        }
    }

    #[test]
    fn both_dates_absent_yields_no_events() {
        let ledger = ledger(
            vec![row(RawDate::Absent, RawDate::Absent)],
            TrackedColumns::all(),
        );
        assert!(extract_events(&ledger, date(2025, 6, 1)).is_empty());
    }

    #[test]
    fn one_event_per_non_null_date() {
        let ledger = ledger(
            vec![row(
                RawDate::Text("2025-06-11".to_string()),
                RawDate::Text("2025-07-01".to_string()),
            )],
            TrackedColumns::all(),
        );
        let events = extract_events(&ledger, date(2025, 6, 1));
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].expiry_type, ExpiryType::Warranty);
        assert_eq!(events[0].days_remaining, 10);
        assert_eq!(events[1].expiry_type, ExpiryType::Maintenance);
        assert_eq!(events[1].days_remaining, 30);
    }

    #[test]
    fn expiry_today_is_zero_days() {
        let today = date(2025, 6, 1);
        let ledger = ledger(
            vec![row(RawDate::Text("2025-06-01".to_string()), RawDate::Absent)],
            TrackedColumns::all(),
        );
        let events = extract_events(&ledger, today);
        assert_eq!(events[0].days_remaining, 0);
    }

    #[test]
    fn past_dates_yield_negative_days_without_failing() {
        let ledger = ledger(
            vec![row(RawDate::Text("2025-05-31".to_string()), RawDate::Absent)],
            TrackedColumns::all(),
        );
        let events = extract_events(&ledger, date(2025, 6, 1));
        assert_eq!(events[0].days_remaining, -1);
    }

    #[test]
    fn missing_tracked_column_suppresses_that_expiry_type() {
        let present = TrackedColumns {
            warranty: true,
            maintenance: false,
        };
        let ledger = ledger(
            vec![row(
                RawDate::Text("2025-06-11".to_string()),
                // Cell present but the column was not in the source header
                RawDate::Text("2025-07-01".to_string()),
            )],
            present,
        );
        let events = extract_events(&ledger, date(2025, 6, 1));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].expiry_type, ExpiryType::Warranty);
    }

    #[test]
    fn unparseable_cell_skips_event_but_not_row() {
        let ledger = ledger(
            vec![row(
                RawDate::Text("no idea".to_string()),
                RawDate::Serial(45000.0),
            )],
            TrackedColumns::all(),
        );
        let events = extract_events(&ledger, date(2023, 3, 1));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].expiry_type, ExpiryType::Maintenance);
    }
}
