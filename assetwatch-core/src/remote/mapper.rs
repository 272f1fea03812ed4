// Column mapping for the classifier exchange
//
// The strict counterpart of the lenient loader: the full required column
// set must be present, exact and case-sensitive, or the run aborts before
// any row is sent anywhere.

use crate::dates;
use crate::loader::{LedgerError, REQUIRED_COLUMNS};
use crate::types::{AssetLedger, MappedRow, RawDate};

/// Validate that every required header is present in the ledger.
pub fn validate_columns(headers: &[String]) -> Result<(), LedgerError> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|required| !headers.iter().any(|h| h == *required))
        .map(|c| c.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(LedgerError::SchemaValidation {
            missing,
            required: REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect(),
        })
    }
}

fn iso_date(raw: &RawDate) -> Option<String> {
    dates::normalize(raw).map(|d| d.format("%Y-%m-%d").to_string())
}

/// Validate the schema and rename rows into the canonical wire shape.
/// 'Warranty Expiry' becomes `expiry_date`, the primary filter field;
/// unparseable dates become null, non-fatal per cell.
pub fn map_rows(ledger: &AssetLedger) -> Result<Vec<MappedRow>, LedgerError> {
    validate_columns(&ledger.headers)?;

    Ok(ledger
        .rows
        .iter()
        .map(|row| MappedRow {
            company: row.customer_name.clone(),
            name: row.product.clone(),
            expiry_date: iso_date(&row.warranty_expiry),
            service_expiry_date: iso_date(&row.maintenance_expiry),
        })
        .collect())
}
