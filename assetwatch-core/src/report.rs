// Window filtering and report assembly
//
// The report invariant: events with 0 <= days_remaining <= window_days,
// intersected with the selected filters, sorted by (days_remaining,
// customer_name) ascending. The CSV export carries the same columns in the
// same order as the rendered table.

use anyhow::{anyhow, Result};
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::config::{MAX_WINDOW_DAYS, MIN_WINDOW_DAYS};
use crate::remote::ALERT_THRESHOLD_DAYS;
use crate::types::{
    ExpirationEvent, ExpirationReport, ExpiringRecord, ExpiryType, RemoteReport,
};

/// Column headers for the local report table and its CSV export.
pub const REPORT_COLUMNS: [&str; 5] = [
    "Customer Name",
    "Product",
    "Expiry Type",
    "Expiry Date",
    "Days Remaining",
];

/// Column headers for the classifier report, display names restored.
pub const REMOTE_REPORT_COLUMNS: [&str; 4] = [
    "Customer Name",
    "Product",
    "Warranty Expiry",
    "Maintenance Expiry",
];

/// User-selected report filters. Recomputed per query, never persisted.
#[derive(Debug, Clone)]
pub struct ReportFilterState {
    pub window_days: i64,
    pub customer_filter: Option<String>,
    pub product_filter: Option<String>,
    pub type_filter: Vec<ExpiryType>,
}

impl ReportFilterState {
    /// Window is clamped into [MIN_WINDOW_DAYS, MAX_WINDOW_DAYS]; both
    /// expiry types selected.
    pub fn new(window_days: i64) -> Self {
        Self {
            window_days: window_days.clamp(MIN_WINDOW_DAYS, MAX_WINDOW_DAYS),
            customer_filter: None,
            product_filter: None,
            type_filter: vec![ExpiryType::Warranty, ExpiryType::Maintenance],
        }
    }

    fn matches(&self, event: &ExpirationEvent) -> bool {
        if event.days_remaining < 0 || event.days_remaining > self.window_days {
            return false;
        }
        if let Some(customer) = &self.customer_filter {
            if &event.customer_name != customer {
                return false;
            }
        }
        if let Some(product) = &self.product_filter {
            if &event.product != product {
                return false;
            }
        }
        self.type_filter.contains(&event.expiry_type)
    }
}

/// Filter, sort and assemble the local report for one run.
pub fn build_report(
    events: &[ExpirationEvent],
    filter: &ReportFilterState,
    today: NaiveDate,
) -> ExpirationReport {
    let mut rows: Vec<ExpirationEvent> = events
        .iter()
        .filter(|event| filter.matches(event))
        .cloned()
        .collect();

    rows.sort_by(|a, b| {
        a.days_remaining
            .cmp(&b.days_remaining)
            .then_with(|| a.customer_name.cmp(&b.customer_name))
    });

    ExpirationReport {
        report_id: Uuid::new_v4(),
        generated_at: Utc::now(),
        today,
        window_days: filter.window_days,
        events: rows,
    }
}

fn render_table(columns: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = columns.iter().map(|c| c.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if cell.len() > widths[i] {
                widths[i] = cell.len();
            }
        }
    }

    let format_row = |cells: &[String]| -> String {
        cells
            .iter()
            .enumerate()
            .map(|(i, cell)| format!("{:<width$}", cell, width = widths[i]))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let header: Vec<String> = columns.iter().map(|c| c.to_string()).collect();
    let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();

    let mut lines = vec![format_row(&header), format_row(&separator)];
    lines.extend(rows.iter().map(|row| format_row(row)));
    lines.join("\n")
}

fn write_csv(columns: &[&str], rows: &[Vec<String>]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(columns)?;
    for row in rows {
        writer.write_record(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow!("Failed to flush CSV writer: {e}"))?;
    Ok(String::from_utf8(bytes)?)
}

impl ExpirationReport {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    fn table_rows(&self) -> Vec<Vec<String>> {
        self.events
            .iter()
            .map(|event| {
                vec![
                    event.customer_name.clone(),
                    event.product.clone(),
                    event.expiry_type.label().to_string(),
                    event.expiry_date.format("%Y-%m-%d").to_string(),
                    event.days_remaining.to_string(),
                ]
            })
            .collect()
    }

    /// Plain-text table in REPORT_COLUMNS order. An empty result renders an
    /// explicit message, never a bare header.
    pub fn render_text(&self) -> String {
        if self.is_empty() {
            return format!(
                "No assets are set to expire within the next {} days. All clear!",
                self.window_days
            );
        }
        render_table(&REPORT_COLUMNS, &self.table_rows())
    }

    /// CSV export, identical content and column order to the table.
    pub fn to_csv(&self) -> Result<String> {
        write_csv(&REPORT_COLUMNS, &self.table_rows())
    }

    pub fn save_csv(&self, path: &str) -> Result<()> {
        std::fs::write(path, self.to_csv()?)?;
        Ok(())
    }
}

impl RemoteReport {
    /// Empty report for the no-input and parse-failure paths.
    pub fn empty(diagnostic: Option<String>) -> Self {
        Self {
            report_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            threshold_days: ALERT_THRESHOLD_DAYS,
            records: Vec::new(),
            diagnostic,
        }
    }

    pub fn from_records(records: Vec<ExpiringRecord>) -> Self {
        Self {
            report_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            threshold_days: ALERT_THRESHOLD_DAYS,
            records,
            diagnostic: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn table_rows(&self) -> Vec<Vec<String>> {
        self.records
            .iter()
            .map(|record| {
                vec![
                    record.company.clone().unwrap_or_default(),
                    record.name.clone().unwrap_or_default(),
                    record.expiry_date.clone().unwrap_or_default(),
                    record.service_expiry_date.clone().unwrap_or_default(),
                ]
            })
            .collect()
    }

    pub fn render_text(&self) -> String {
        if self.is_empty() {
            return format!(
                "No assets are set to expire within the {} day threshold. All clear!",
                self.threshold_days
            );
        }
        render_table(&REMOTE_REPORT_COLUMNS, &self.table_rows())
    }

    pub fn to_csv(&self) -> Result<String> {
        write_csv(&REMOTE_REPORT_COLUMNS, &self.table_rows())
    }

    pub fn save_csv(&self, path: &str) -> Result<()> {
        std::fs::write(path, self.to_csv()?)?;
        Ok(())
    }
}
