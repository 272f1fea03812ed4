use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type ReportId = Uuid;

// ===== RAW INPUT TYPES =====
// These types implement the ledger model. A RawDate is a cell as the source
// delivered it; normalization to a calendar date happens in `dates` and is
// total over this closed set of cases.

/// One raw date cell before normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RawDate {
    /// Empty or whitespace-only cell
    Absent,
    /// Spreadsheet serial day count (1900 date system, day 0 = 1899-12-30)
    Serial(f64),
    /// Anything else, handed to the calendar-string parser
    Text(String),
    /// A source that decodes typed date cells hands them over directly
    AlreadyDate(NaiveDate),
}

/// One input record. Parsed once from the uploaded file, immutable after.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetRow {
    pub customer_name: String,
    pub product: String,
    pub warranty_expiry: RawDate,
    pub maintenance_expiry: RawDate,
}

/// The two contract dates tracked per asset row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpiryType {
    Warranty,
    Maintenance,
}

impl ExpiryType {
    pub fn label(&self) -> &'static str {
        match self {
            ExpiryType::Warranty => "Warranty",
            ExpiryType::Maintenance => "Maintenance",
        }
    }
}

/// Which tracked expiry columns the source actually provided.
/// The local pipeline skips an expiry type whose column is missing;
/// the strict column mapper rejects the ledger instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackedColumns {
    pub warranty: bool,
    pub maintenance: bool,
}

impl TrackedColumns {
    pub fn all() -> Self {
        Self {
            warranty: true,
            maintenance: true,
        }
    }

    pub fn contains(&self, expiry_type: ExpiryType) -> bool {
        match expiry_type {
            ExpiryType::Warranty => self.warranty,
            ExpiryType::Maintenance => self.maintenance,
        }
    }
}

/// A loaded batch: trimmed source headers, decoded rows, and the tracked
/// columns present in the source.
#[derive(Debug, Clone)]
pub struct AssetLedger {
    pub headers: Vec<String>,
    pub rows: Vec<AssetRow>,
    pub present: TrackedColumns,
}

// ===== DERIVED REPORT TYPES =====

/// One upcoming (or past) expiration derived from an asset row.
/// `days_remaining` may be negative; already-expired events are excluded
/// by the window filter, never by the extractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpirationEvent {
    pub customer_name: String,
    pub product: String,
    pub expiry_type: ExpiryType,
    pub expiry_date: NaiveDate,
    pub days_remaining: i64,
}

/// The filtered, sorted local-pipeline report. Carries the fixed `today`
/// the whole batch was computed against.
#[derive(Debug, Clone, Serialize)]
pub struct ExpirationReport {
    pub report_id: ReportId,
    pub generated_at: DateTime<Utc>,
    pub today: NaiveDate,
    pub window_days: i64,
    pub events: Vec<ExpirationEvent>,
}

// ===== LLM PIPELINE TYPES =====

/// One row in the canonical shape the classifier exchange uses.
/// Field names match the wire format; dates are `YYYY-MM-DD` or null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappedRow {
    pub company: String,
    pub name: String,
    pub expiry_date: Option<String>,
    pub service_expiry_date: Option<String>,
}

/// One expiring asset as echoed back by the classifier. All fields are
/// nullable since the classifier may drop any of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpiringRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub expiry_date: Option<String>,
    #[serde(default)]
    pub service_expiry_date: Option<String>,
}

/// Result of one LLM-delegated report generation. When the classifier text
/// could not be parsed, `records` is empty and `diagnostic` holds the raw
/// text for inspection.
#[derive(Debug, Clone, Serialize)]
pub struct RemoteReport {
    pub report_id: ReportId,
    pub generated_at: DateTime<Utc>,
    pub threshold_days: i64,
    pub records: Vec<ExpiringRecord>,
    pub diagnostic: Option<String>,
}
