use anyhow::Result;
use chrono::{Duration, NaiveDate};

use super::ALERT_THRESHOLD_DAYS;
use crate::types::MappedRow;

/// Build the classifier instruction and the serialized row batch.
///
/// Returns `(system instruction, user message)`. The window is the fixed
/// alert threshold, anchored at the single `today` of this run.
pub fn build_classifier_prompt(rows: &[MappedRow], today: NaiveDate) -> Result<(String, String)> {
    let window_start = today.format("%Y-%m-%d");
    let window_end = (today + Duration::days(ALERT_THRESHOLD_DAYS)).format("%Y-%m-%d");

    let system = format!(
        r#"You are an expert contract analyst. Your task is to analyze the provided list of contracts in JSON format.
The primary date for analysis is 'expiry_date' (the warranty expiry).

Identify all contracts where the 'expiry_date' is between today ({window_start}) and {window_end} (within {ALERT_THRESHOLD_DAYS} days).

For each expiring contract found based on the 'expiry_date', extract and return the exact 'name', 'company', 'expiry_date', and 'service_expiry_date'.

Your final output MUST be a clean JSON array of objects, with NO surrounding text, explanation, or markdown formatting (e.g. no ```json fences).
The required JSON schema is:
[
    {{"name": "...", "company": "...", "expiry_date": "YYYY-MM-DD", "service_expiry_date": "YYYY-MM-DD"}}
]
If no contracts are expiring in the window, return an empty array: []."#
    );

    let batch = serde_json::to_string(rows)?;
    let user = format!("Analyze the following contract data (JSON):\n\n{batch}");

    Ok((system, user))
}
