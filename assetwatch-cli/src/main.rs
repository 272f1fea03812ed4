use anyhow::{bail, Result};
use clap::Parser;
use std::path::Path;

use assetwatch_core::remote::shared_client;
use assetwatch_core::{
    AnalyzerConfig, AssetProcessor, ExpirationReport, ExpiryType, RemoteReport,
    ReportFilterState, MAX_WINDOW_DAYS, MIN_WINDOW_DAYS,
};

#[derive(Parser)]
#[command(name = "assetwatch")]
#[command(about = "Track upcoming warranty and maintenance expirations from an asset ledger")]
struct Args {
    /// Path to the asset ledger (delimited text with a header row)
    #[arg(short, long)]
    input: String,

    /// Path to custom config file (YAML format)
    #[arg(short, long)]
    config: Option<String>,

    /// Report window in days (30-365); overrides the config value
    #[arg(short, long)]
    window: Option<i64>,

    /// Only include events for this exact customer name
    #[arg(long)]
    customer: Option<String>,

    /// Only include events for this exact product
    #[arg(long)]
    product: Option<String>,

    /// Restrict to one expiry type: warranty or maintenance
    #[arg(long)]
    expiry_type: Option<String>,

    /// Output format: csv or json
    #[arg(short = 'f', long, default_value = "csv")]
    output_format: String,

    /// Output file path (auto-generated from the input name if not specified)
    #[arg(short, long)]
    output: Option<String>,

    /// Delegate the expiring-row decision to the configured hosted model
    #[arg(long)]
    remote: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("🔎 Assetwatch Expiration Analyzer");

    if !Path::new(&args.input).exists() {
        println!("⚠️  Input ledger not found at: {}", args.input);
        println!("   Please check the file path.");
        return Ok(());
    }

    let config = AnalyzerConfig::load_with_fallback(args.config.as_deref());
    if let Some(config_path) = &args.config {
        println!("📋 Loaded config from: {}", config_path);
    } else {
        println!("📋 Using default config");
    }

    let processor = AssetProcessor::new_delimited(config.clone());

    if args.remote {
        run_remote(&args, &processor, &config)
    } else {
        run_local(&args, &processor, &config)
    }
}

fn run_local(args: &Args, processor: &AssetProcessor, config: &AnalyzerConfig) -> Result<()> {
    let requested = args.window.unwrap_or(config.window_days);
    let window = requested.clamp(MIN_WINDOW_DAYS, MAX_WINDOW_DAYS);
    if window != requested {
        println!(
            "⚠️  Window {} outside [{}, {}], using {}",
            requested, MIN_WINDOW_DAYS, MAX_WINDOW_DAYS, window
        );
    }

    let mut filter = ReportFilterState::new(window);
    filter.customer_filter = args.customer.clone();
    filter.product_filter = args.product.clone();
    if let Some(expiry_type) = &args.expiry_type {
        filter.type_filter = vec![parse_expiry_type(expiry_type)?];
    }

    match processor.run_local_report(&args.input, &filter) {
        Ok(report) => {
            println!("\n{}\n", report.render_text());
            if !report.is_empty() {
                save_local_report(&report, args)?;
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ Report generation failed: {e}");
            std::process::exit(1);
        }
    }
}

fn run_remote(args: &Args, processor: &AssetProcessor, config: &AnalyzerConfig) -> Result<()> {
    let client = shared_client(&config.classifier);

    match processor.run_remote_report(&args.input, client) {
        Ok(report) => {
            if let Some(raw) = &report.diagnostic {
                eprintln!("❌ Could not parse classifier output; raw text for diagnosis:");
                eprintln!("{raw}");
            }
            println!("\n{}\n", report.render_text());
            if !report.is_empty() {
                save_remote_report(&report, args)?;
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ Remote analysis failed: {e}");
            std::process::exit(1);
        }
    }
}

fn parse_expiry_type(value: &str) -> Result<ExpiryType> {
    match value.to_lowercase().as_str() {
        "warranty" => Ok(ExpiryType::Warranty),
        "maintenance" => Ok(ExpiryType::Maintenance),
        other => bail!("Unknown expiry type '{other}' (expected: warranty or maintenance)"),
    }
}

fn save_local_report(report: &ExpirationReport, args: &Args) -> Result<()> {
    let path = output_path(args, "_expirations");
    match args.output_format.as_str() {
        "json" => std::fs::write(&path, serde_json::to_string_pretty(report)?)?,
        "csv" => report.save_csv(&path)?,
        other => {
            println!("⚠️  Unknown output format '{}', using csv", other);
            report.save_csv(&path)?;
        }
    }
    println!("💾 Report saved to: {}", path);
    Ok(())
}

fn save_remote_report(report: &RemoteReport, args: &Args) -> Result<()> {
    let path = output_path(args, "_expiring_assets");
    match args.output_format.as_str() {
        "json" => std::fs::write(&path, serde_json::to_string_pretty(report)?)?,
        "csv" => report.save_csv(&path)?,
        other => {
            println!("⚠️  Unknown output format '{}', using csv", other);
            report.save_csv(&path)?;
        }
    }
    println!("💾 Report saved to: {}", path);
    Ok(())
}

fn output_path(args: &Args, suffix: &str) -> String {
    if let Some(output) = &args.output {
        return output.clone();
    }
    let input_name = Path::new(&args.input)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("report");
    let extension = if args.output_format == "json" {
        "json"
    } else {
        "csv"
    };
    format!("{input_name}{suffix}.{extension}")
}
