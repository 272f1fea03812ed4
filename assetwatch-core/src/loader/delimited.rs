use std::path::Path;

use csv::{ReaderBuilder, Trim};
use once_cell::sync::Lazy;
use regex::Regex;

use super::{
    LedgerError, LedgerSource, CUSTOMER_COLUMN, MAINTENANCE_COLUMN, PRODUCT_COLUMN,
    WARRANTY_COLUMN,
};
use crate::types::{AssetLedger, AssetRow, RawDate, TrackedColumns};

/// Integer or float cell, read as a spreadsheet serial day count.
static SERIAL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?\d+(\.\d+)?$").expect("serial pattern is valid"));

/// Delimited-text ledger source built on the csv crate.
///
/// Lenient by design: header whitespace is trimmed, a missing tracked
/// expiry column marks that expiry type as absent rather than failing, and
/// short rows read as empty cells.
pub struct DelimitedLoader {
    delimiter: u8,
}

impl Default for DelimitedLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DelimitedLoader {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }
}

/// Type a single cell into its RawDate variant.
pub fn classify_cell(cell: &str) -> RawDate {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return RawDate::Absent;
    }
    if SERIAL_PATTERN.is_match(trimmed) {
        if let Ok(value) = trimmed.parse::<f64>() {
            return RawDate::Serial(value);
        }
    }
    RawDate::Text(trimmed.to_string())
}

fn cell_at(record: &csv::StringRecord, index: Option<usize>) -> &str {
    index.and_then(|i| record.get(i)).unwrap_or("")
}

impl LedgerSource for DelimitedLoader {
    fn load_bytes(&self, bytes: &[u8]) -> Result<AssetLedger, LedgerError> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true)
            .trim(Trim::Headers)
            .from_reader(bytes);

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| LedgerError::FileRead {
                path: "<bytes>".to_string(),
                cause: e.to_string(),
            })?
            .iter()
            .map(str::to_string)
            .collect();

        let position = |name: &str| headers.iter().position(|h| h == name);
        let customer_idx = position(CUSTOMER_COLUMN);
        let product_idx = position(PRODUCT_COLUMN);
        let warranty_idx = position(WARRANTY_COLUMN);
        let maintenance_idx = position(MAINTENANCE_COLUMN);

        let present = TrackedColumns {
            warranty: warranty_idx.is_some(),
            maintenance: maintenance_idx.is_some(),
        };

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| LedgerError::FileRead {
                path: "<bytes>".to_string(),
                cause: e.to_string(),
            })?;

            rows.push(AssetRow {
                customer_name: cell_at(&record, customer_idx).trim().to_string(),
                product: cell_at(&record, product_idx).trim().to_string(),
                warranty_expiry: classify_cell(cell_at(&record, warranty_idx)),
                maintenance_expiry: classify_cell(cell_at(&record, maintenance_idx)),
            });
        }

        Ok(AssetLedger {
            headers,
            rows,
            present,
        })
    }

    fn name(&self) -> &str {
        "delimited-text"
    }

    fn supports_file_type(&self, path: &Path) -> bool {
        matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("csv") | Some("tsv") | Some("txt")
        )
    }
}
