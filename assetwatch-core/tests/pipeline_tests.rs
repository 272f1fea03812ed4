//! Pipeline boundary tests: ledger in, report out.
//!
//! These tests drive the full pipelines through their public boundaries:
//!
//! - Local: CSV bytes → AssetLedger → events → filtered report → CSV export
//! - Remote: CSV file → column mapping → prompt → (mock) classifier →
//!   parsed report
//!
//! The classifier is always mocked here; the HTTP client itself is not
//! under test.

use chrono::{Duration, Local, NaiveDate};

use assetwatch_core::extract::extract_events;
use assetwatch_core::remote::MockClassifierClient;
use assetwatch_core::report::build_report;
use assetwatch_core::{
    AnalyzerConfig, AssetProcessor, DelimitedLoader, ExpiryType, LedgerError, LedgerSource,
    ReportFilterState,
};

// ============================================================================
// Fixture helpers
// ============================================================================

fn fixed_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
}

fn load_csv(csv: &str) -> assetwatch_core::AssetLedger {
    DelimitedLoader::new().load_bytes(csv.as_bytes()).unwrap()
}

/// Write a temp ledger file for processor-level tests and return its path.
fn write_temp_ledger(name: &str, content: &str) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(format!("assetwatch_{}_{}.csv", std::process::id(), name));
    std::fs::write(&path, content).unwrap();
    path
}

const FULL_HEADER: &str = "Customer Name,Product,Warranty Expiry,Maintenance Expiry";

// ============================================================================
// Local pipeline: load → normalize → extract → filter
// ============================================================================

mod local_pipeline {
    use super::*;

    #[test]
    fn mixed_date_encodings_flow_through() {
        // Serial 45813 = 2025-06-05 in the 1900 date system
        let ledger = load_csv(&format!(
            "{FULL_HEADER}\n\
             Acme,Router,2025-06-11,45813\n\
             Globex,Switch,06/21/2025,\n\
             Initech,Firewall,not a date,2025-05-01\n"
        ));
        let events = extract_events(&ledger, fixed_today());

        // Acme: both dates. Globex: warranty only. Initech: maintenance only
        // (warranty cell unparseable, row not aborted).
        assert_eq!(events.len(), 4);

        let report = build_report(&events, &ReportFilterState::new(90), fixed_today());
        // Initech's maintenance event is already expired and drops out.
        assert_eq!(report.events.len(), 3);
        let days: Vec<i64> = report.events.iter().map(|e| e.days_remaining).collect();
        assert_eq!(days, vec![4, 10, 20]);
    }

    #[test]
    fn lenient_loader_skips_missing_expiry_type() {
        let ledger = load_csv(
            "Customer Name,Product,Warranty Expiry\n\
             Acme,Router,2025-06-11\n",
        );
        let events = extract_events(&ledger, fixed_today());
        assert_eq!(events.len(), 1);
        assert!(events
            .iter()
            .all(|e| e.expiry_type == ExpiryType::Warranty));
    }

    #[test]
    fn sort_is_days_then_customer_ascending() {
        let ledger = load_csv(&format!(
            "{FULL_HEADER}\n\
             B,Router,2025-06-11,\n\
             A,Router,2025-06-06,\n\
             C,Router,2025-06-06,\n"
        ));
        let events = extract_events(&ledger, fixed_today());
        let report = build_report(&events, &ReportFilterState::new(90), fixed_today());

        let order: Vec<(i64, String)> = report
            .events
            .iter()
            .map(|e| (e.days_remaining, e.customer_name.clone()))
            .collect();
        assert_eq!(
            order,
            vec![
                (5, "A".to_string()),
                (5, "C".to_string()),
                (10, "B".to_string())
            ]
        );
    }

    #[test]
    fn processor_generates_report_from_file() {
        let today = Local::now().date_naive();
        let soon = (today + Duration::days(10)).format("%Y-%m-%d");
        let path = write_temp_ledger(
            "local_ok",
            &format!("{FULL_HEADER}\nAcme,Router,{soon},\n"),
        );

        let processor = AssetProcessor::new_delimited(AnalyzerConfig::default());
        let report = processor
            .run_local_report(path.to_str().unwrap(), &ReportFilterState::new(90))
            .unwrap();

        assert_eq!(report.events.len(), 1);
        assert_eq!(report.events[0].days_remaining, 10);
        assert_eq!(report.today, today);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn processor_missing_file_is_file_read_error() {
        let processor = AssetProcessor::new_delimited(AnalyzerConfig::default());
        let result =
            processor.run_local_report("/nonexistent/ledger.csv", &ReportFilterState::new(90));
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Failed to read ledger"));
    }
}

// ============================================================================
// CSV export round-trip
// ============================================================================

mod csv_round_trip {
    use super::*;

    #[test]
    fn export_reparses_to_same_rows_in_order() {
        let ledger = load_csv(&format!(
            "{FULL_HEADER}\n\
             Globex,Switch,2025-06-06,\n\
             Acme,Router,2025-06-11,2025-06-21\n"
        ));
        let events = extract_events(&ledger, fixed_today());
        let report = build_report(&events, &ReportFilterState::new(90), fixed_today());
        let exported = report.to_csv().unwrap();

        let mut reader = csv::Reader::from_reader(exported.as_bytes());
        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(
            headers,
            vec![
                "Customer Name",
                "Product",
                "Expiry Type",
                "Expiry Date",
                "Days Remaining"
            ]
        );

        let rows: Vec<Vec<String>> = reader
            .records()
            .map(|r| r.unwrap().iter().map(String::from).collect())
            .collect();
        assert_eq!(rows.len(), report.events.len());

        for (row, event) in rows.iter().zip(report.events.iter()) {
            assert_eq!(row[0], event.customer_name);
            assert_eq!(row[1], event.product);
            assert_eq!(row[2], event.expiry_type.label());
            assert_eq!(row[3], event.expiry_date.format("%Y-%m-%d").to_string());
            assert_eq!(row[4], event.days_remaining.to_string());
        }
    }
}

// ============================================================================
// Remote pipeline: strict schema, mock classifier, tolerant parsing
// ============================================================================

mod remote_pipeline {
    use super::*;

    #[test]
    fn missing_required_column_aborts_before_classifying() {
        let path = write_temp_ledger(
            "remote_schema",
            "Customer Name,Product,Warranty Expiry\nAcme,Router,2025-06-11\n",
        );

        let processor = AssetProcessor::new_delimited(AnalyzerConfig::default());
        let client = MockClassifierClient::new("[]");
        let err = processor
            .run_remote_report(path.to_str().unwrap(), &client)
            .unwrap_err();

        let ledger_err = err.downcast::<LedgerError>().unwrap();
        match ledger_err {
            LedgerError::SchemaValidation { missing, required } => {
                assert_eq!(missing, vec!["Maintenance Expiry".to_string()]);
                assert_eq!(required.len(), 4);
            }
            other => panic!("expected SchemaValidation, got {other:?}"),
        }

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn fenced_classifier_output_becomes_report_rows() {
        let path = write_temp_ledger(
            "remote_ok",
            &format!("{FULL_HEADER}\nAcme,Router,2025-06-11,2025-07-01\n"),
        );

        let response = "```json\n[{\"name\":\"Router\",\"company\":\"Acme\",\
                        \"expiry_date\":\"2025-06-11\",\"service_expiry_date\":\"2025-07-01\"}]\n```";
        let processor = AssetProcessor::new_delimited(AnalyzerConfig::default());
        let client = MockClassifierClient::new(response);

        let report = processor
            .run_remote_report(path.to_str().unwrap(), &client)
            .unwrap();

        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].company.as_deref(), Some("Acme"));
        assert!(report.diagnostic.is_none());

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn unparseable_classifier_output_yields_empty_report_with_diagnostic() {
        let path = write_temp_ledger(
            "remote_prose",
            &format!("{FULL_HEADER}\nAcme,Router,2025-06-11,2025-07-01\n"),
        );

        let processor = AssetProcessor::new_delimited(AnalyzerConfig::default());
        let client = MockClassifierClient::new("sorry, no data");

        let report = processor
            .run_remote_report(path.to_str().unwrap(), &client)
            .unwrap();

        assert!(report.records.is_empty());
        assert_eq!(report.diagnostic.as_deref(), Some("sorry, no data"));

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn classifier_call_failure_aborts_the_run() {
        let path = write_temp_ledger(
            "remote_fail",
            &format!("{FULL_HEADER}\nAcme,Router,2025-06-11,2025-07-01\n"),
        );

        let processor = AssetProcessor::new_delimited(AnalyzerConfig::default());
        let client = MockClassifierClient::failing();

        let err = processor
            .run_remote_report(path.to_str().unwrap(), &client)
            .unwrap_err();
        assert!(err.to_string().contains("HTTP client error"));

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn empty_ledger_returns_empty_report_without_classifying() {
        let path = write_temp_ledger("remote_empty", &format!("{FULL_HEADER}\n"));

        let processor = AssetProcessor::new_delimited(AnalyzerConfig::default());
        // A failing client proves the classifier is never called.
        let client = MockClassifierClient::failing();

        let report = processor
            .run_remote_report(path.to_str().unwrap(), &client)
            .unwrap();
        assert!(report.records.is_empty());
        assert!(report.diagnostic.is_none());

        std::fs::remove_file(path).ok();
    }
}
