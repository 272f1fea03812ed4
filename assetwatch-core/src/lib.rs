// Assetwatch Core Library
//
// Ledger loading, date normalization and expiring-asset report derivation.
// Main interface for turning customer asset ledgers into expiration
// reports, locally or via a hosted classifier.

pub mod config;
pub mod dates;
pub mod extract;
pub mod loader;
pub mod processor;
pub mod remote;
pub mod report;
pub mod types;

// Re-export main types and functions for easy use
pub use config::{AnalyzerConfig, ClassifierConfig, MAX_WINDOW_DAYS, MIN_WINDOW_DAYS};
pub use loader::{DelimitedLoader, LedgerError, LedgerSource};
pub use processor::AssetProcessor;
pub use report::{build_report, ReportFilterState};
pub use types::*;
