// LLM delegation pipeline
//
// Column mapping, prompt construction, the classifier HTTP client and the
// tolerant response parser. The classifier is untrusted: everything it
// returns goes through the repair/parse path in `response`.

pub mod client;
pub mod mapper;
pub mod prompt;
pub mod response;

pub use client::{shared_client, ClassifierClient, HttpClassifierClient, MockClassifierClient};
pub use mapper::{map_rows, validate_columns};
pub use prompt::build_classifier_prompt;
pub use response::{extract_record_array, repair_classifier_text, ParseFailure};

use thiserror::Error;

/// Fixed alert window baked into the classifier prompt. Deliberately
/// independent from the user-configurable local report window.
pub const ALERT_THRESHOLD_DAYS: i64 = 90;

#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("Classifier endpoint is not reachable at {0}")]
    Connection(String),

    #[error("Classifier returned error (status {status}): {body}")]
    Endpoint { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Response decoding error: {0}")]
    ResponseDecoding(String),
}
