//! Standalone GeoJSON validity checker.
//!
//! Runs the same structural and geometric validation rules as the
//! ingestion service over local files, without touching a database.
//! Prints per-feature pass/fail and exits 0 only if every feature in
//! every file is valid.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::Value;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use geo_common::GeoResult;
use ingestion::validate;

#[derive(Parser, Debug)]
#[command(name = "geojson-check")]
#[command(about = "Validate GeoJSON files without ingesting them")]
struct Args {
    /// GeoJSON files to check
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Only report failures
    #[arg(short, long)]
    quiet: bool,
}

/// Validation outcome for one file.
struct FileReport {
    total: usize,
    /// Per-feature results in input order: geometry type on success,
    /// defect description on failure.
    results: Vec<Result<String, String>>,
}

impl FileReport {
    fn valid_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_ok()).count()
    }

    fn all_valid(&self) -> bool {
        self.valid_count() == self.total
    }
}

/// Validate every feature of a raw collection value.
///
/// A structural envelope defect fails the whole file; per-feature
/// defects are collected into the report instead.
fn check_collection(raw: &Value) -> GeoResult<FileReport> {
    let features = validate::validate_collection(raw)?;

    let results = features
        .iter()
        .enumerate()
        .map(|(position, feature)| {
            validate::validate_feature(feature, position + 1)
                .map(|f| f.geometry.type_name().to_string())
                .map_err(|e| e.to_string())
        })
        .collect();

    Ok(FileReport {
        total: features.len(),
        results,
    })
}

fn check_file(path: &PathBuf, quiet: bool) -> Result<bool> {
    let display = path.display();
    let text = fs::read_to_string(path).with_context(|| format!("failed to read {}", display))?;
    let raw: Value =
        serde_json::from_str(&text).with_context(|| format!("{} is not valid JSON", display))?;

    let report = match check_collection(&raw) {
        Ok(report) => report,
        Err(e) => {
            println!("{}: FAIL: {}", display, e);
            return Ok(false);
        }
    };

    for (position, result) in report.results.iter().enumerate() {
        match result {
            Ok(geometry_type) => {
                if !quiet {
                    println!("{}: feature {}: ok ({})", display, position + 1, geometry_type);
                }
            }
            Err(message) => println!("{}: FAIL: {}", display, message),
        }
    }

    println!(
        "{}: {} of {} features valid",
        display,
        report.valid_count(),
        report.total
    );

    Ok(report.all_valid())
}

fn main() -> ExitCode {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::WARN)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    let mut all_valid = true;
    for file in &args.files {
        match check_file(file, args.quiet) {
            Ok(valid) => all_valid &= valid,
            Err(e) => {
                eprintln!("{:#}", e);
                all_valid = false;
            }
        }
    }

    if all_valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
