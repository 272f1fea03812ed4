use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use chrono::Local;

use crate::config::AnalyzerConfig;
use crate::extract::extract_events;
use crate::loader::{DelimitedLoader, LedgerSource};
use crate::remote::{build_classifier_prompt, extract_record_array, map_rows, ClassifierClient};
use crate::report::{build_report, ReportFilterState};
use crate::types::{ExpirationReport, RemoteReport};

/// Orchestrates one report generation, either pipeline.
///
/// Each run is a pure function of the input file plus the filter
/// selections: "today" is captured once at the start and no state survives
/// between runs.
pub struct AssetProcessor {
    source: Box<dyn LedgerSource>,
    config: AnalyzerConfig,
}

impl AssetProcessor {
    /// Create AssetProcessor with an injected ledger source
    pub fn new_with_source(source: Box<dyn LedgerSource>, config: AnalyzerConfig) -> Self {
        Self { source, config }
    }

    /// Convenience constructor for CLI usage with the delimited-text source
    pub fn new_delimited(config: AnalyzerConfig) -> Self {
        Self::new_with_source(Box::new(DelimitedLoader::new()), config)
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Local rule pipeline: load → normalize → extract → filter → report.
    pub fn run_local_report(
        &self,
        input_path: &str,
        filter: &ReportFilterState,
    ) -> Result<ExpirationReport> {
        let start = Instant::now();

        println!("📄 Loading ledger: {}", input_path);
        let ledger = self.source.load_file(Path::new(input_path))?;
        println!(
            "   {} rows, {} columns ({})",
            ledger.rows.len(),
            ledger.headers.len(),
            self.source.name()
        );

        let today = Local::now().date_naive();
        let events = extract_events(&ledger, today);
        println!("📅 {} expiration events derived", events.len());

        let report = build_report(&events, filter, today);
        println!(
            "⏱️  Report generated in {:.3}s ({} rows within {} days)",
            start.elapsed().as_secs_f64(),
            report.events.len(),
            report.window_days
        );

        Ok(report)
    }

    /// LLM delegation pipeline: load → map → prompt → classify → parse →
    /// report. Schema and remote-call failures abort the run; a response
    /// that cannot be parsed yields an empty report carrying the raw text.
    pub fn run_remote_report(
        &self,
        input_path: &str,
        client: &dyn ClassifierClient,
    ) -> Result<RemoteReport> {
        let start = Instant::now();

        println!("📄 Loading ledger: {}", input_path);
        let ledger = self.source.load_file(Path::new(input_path))?;

        let mapped = map_rows(&ledger)?;
        if mapped.is_empty() {
            println!("   Ledger has no data rows, nothing to classify");
            return Ok(RemoteReport::empty(None));
        }

        let today = Local::now().date_naive();
        let (system, user) = build_classifier_prompt(&mapped, today)?;

        println!(
            "🚀 Sending {} rows to classifier ({})",
            mapped.len(),
            self.config.classifier.model
        );
        let raw = client.classify(&system, &user)?;

        let report = match extract_record_array(&raw) {
            Ok(records) => RemoteReport::from_records(records),
            Err(failure) => {
                eprintln!("❌ Classifier processing error: {failure}");
                RemoteReport::empty(Some(failure.raw_output().to_string()))
            }
        };

        println!(
            "⏱️  Remote analysis finished in {:.3}s ({} expiring assets)",
            start.elapsed().as_secs_f64(),
            report.records.len()
        );

        Ok(report)
    }
}
