// Classifier response parsing
//
// The classifier is asked for a bare JSON array but routinely wraps it in
// markdown fences or prose anyway. The repair step here is a pure function,
// decoupled from the network call so adversarial text can be thrown at it
// directly.

use serde_json::Value;
use thiserror::Error;

use crate::types::ExpiringRecord;

/// Typed failure from the response parser. Every variant carries the raw,
/// pre-repair text so callers can surface it for diagnosis.
#[derive(Error, Debug)]
pub enum ParseFailure {
    #[error("Classifier returned empty output")]
    Empty { raw: String },

    #[error("Classifier output is not valid JSON: {cause}")]
    InvalidJson { cause: String, raw: String },

    #[error("Classifier output is valid JSON but not an array")]
    NotAnArray { raw: String },
}

impl ParseFailure {
    /// The unmodified classifier text, for diagnostics.
    pub fn raw_output(&self) -> &str {
        match self {
            ParseFailure::Empty { raw }
            | ParseFailure::InvalidJson { raw, .. }
            | ParseFailure::NotAnArray { raw } => raw,
        }
    }
}

/// Strip markdown wrapping from classifier output.
///
/// If the trimmed text opens with a fence, the slice from the first `[` to
/// the last `]` (inclusive) is taken; with no brackets at all, fence
/// markers are removed as plain substrings instead.
pub fn repair_classifier_text(raw: &str) -> String {
    let trimmed = raw.trim();
    if !trimmed.starts_with("```") {
        return trimmed.to_string();
    }

    match (trimmed.find('['), trimmed.rfind(']')) {
        (Some(start), Some(end)) if start <= end => trimmed[start..=end].to_string(),
        _ => trimmed
            .replace("```json", "")
            .replace("```", "")
            .trim()
            .to_string(),
    }
}

/// Extract a JSON array of expiring records from raw classifier text.
///
/// Individual array entries that do not decode as record objects are
/// skipped; a non-array top level or undecodable text is a typed failure.
pub fn extract_record_array(raw: &str) -> Result<Vec<ExpiringRecord>, ParseFailure> {
    let repaired = repair_classifier_text(raw);
    if repaired.is_empty() {
        return Err(ParseFailure::Empty {
            raw: raw.to_string(),
        });
    }

    let value: Value = serde_json::from_str(&repaired).map_err(|e| ParseFailure::InvalidJson {
        cause: e.to_string(),
        raw: raw.to_string(),
    })?;

    let Value::Array(items) = value else {
        return Err(ParseFailure::NotAnArray {
            raw: raw.to_string(),
        });
    };

    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}
