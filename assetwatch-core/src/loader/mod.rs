// Ledger loading
//
// This module defines the boundary between source decoding (file bytes ->
// AssetLedger) and the analysis pipeline. The source abstraction allows for
// different ledger formats while everything downstream works with
// AssetLedger and stays format-agnostic.

pub mod delimited;
pub mod source;

pub use delimited::DelimitedLoader;
pub use source::LedgerSource;

use thiserror::Error;

/// Tracked column headers, exact and case-sensitive after whitespace trim.
pub const CUSTOMER_COLUMN: &str = "Customer Name";
pub const PRODUCT_COLUMN: &str = "Product";
pub const WARRANTY_COLUMN: &str = "Warranty Expiry";
pub const MAINTENANCE_COLUMN: &str = "Maintenance Expiry";

/// The full required set for the strict (classifier) pipeline.
pub const REQUIRED_COLUMNS: [&str; 4] = [
    CUSTOMER_COLUMN,
    PRODUCT_COLUMN,
    WARRANTY_COLUMN,
    MAINTENANCE_COLUMN,
];

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Failed to read ledger {path}: {cause}")]
    FileRead { path: String, cause: String },

    #[error(
        "File validation failed. Missing required columns: {}. The ledger must contain these exact column headers: {}",
        .missing.join(", "),
        .required.join(", ")
    )]
    SchemaValidation {
        missing: Vec<String>,
        required: Vec<String>,
    },
}
