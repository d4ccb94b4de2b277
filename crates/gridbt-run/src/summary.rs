//! Aggregation of persisted result tables into summary statistics.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use gridbt_core::errors::{ErrorInfo, SweepError};
use gridbt_core::hash::stable_hash_string;
use gridbt_core::serde::to_canonical_json_bytes;
use gridbt_data::{read_results, Benchmark, TradeRecord};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::error;
use walkdir::WalkDir;

use crate::metrics::Metrics;
use crate::report::{provenance, UnitState, UnitStatus};

/// Report entry for one aggregated result file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryFileReport {
    /// Universe directory the result file lives under.
    pub universe: String,
    /// File stem (the work unit's identifier by convention).
    pub stem: String,
    /// Aggregation status for the file.
    pub status: UnitStatus,
}

/// Final report for one aggregation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateReport {
    /// Canonical hash of the processed file listing.
    pub input_hash: String,
    /// Number of result files visited.
    pub processed: usize,
    /// Number of summaries written.
    pub succeeded: usize,
    /// Number of files that failed to aggregate.
    pub failed: usize,
    /// Per-file outcomes in deterministic order.
    pub files: Vec<SummaryFileReport>,
    /// Provenance metadata describing the run.
    pub provenance: gridbt_core::provenance::RunProvenance,
}

/// Walks `results_dir` and writes one summary-statistics file per result
/// table into `summary_dir`, mirroring each file's universe directory and
/// stem.
///
/// This stage is I/O bound, so the files map over the process-wide thread
/// pool; the benchmark series is shared read-only across workers. Per-file
/// failures follow the sweep's isolation policy: logged, counted, never
/// fatal to siblings.
pub fn aggregate(
    results_dir: &Path,
    benchmark: &Benchmark,
    summary_dir: &Path,
    metrics: &dyn Metrics,
) -> Result<AggregateReport, SweepError> {
    let sources = enumerate_results(results_dir)?;
    let input_hash = stable_hash_string(
        &sources
            .iter()
            .map(|source| (&source.universe, &source.stem))
            .collect::<Vec<_>>(),
    )?;

    let mut files: Vec<SummaryFileReport> = sources
        .par_iter()
        .map(|source| {
            let status = match summarize_file(source, benchmark, summary_dir, metrics) {
                Ok(()) => UnitStatus::complete(),
                Err(err) => {
                    error!(
                        universe = %source.universe,
                        stem = %source.stem,
                        error = %err,
                        "failed to aggregate result file"
                    );
                    UnitStatus::failed(err.to_string())
                }
            };
            SummaryFileReport {
                universe: source.universe.clone(),
                stem: source.stem.clone(),
                status,
            }
        })
        .collect();
    files.sort_by(|a, b| {
        (a.universe.as_str(), a.stem.as_str()).cmp(&(b.universe.as_str(), b.stem.as_str()))
    });

    let processed = files.len();
    let succeeded = files
        .iter()
        .filter(|file| file.status.state == UnitState::Complete)
        .count();
    let report = AggregateReport {
        provenance: provenance(&input_hash),
        input_hash,
        processed,
        succeeded,
        failed: processed - succeeded,
        files,
    };
    let report_bytes = to_canonical_json_bytes(&report)?;
    fs::create_dir_all(summary_dir).map_err(|err| dir_error(summary_dir, err))?;
    let report_path = summary_dir.join("aggregate_report.json");
    fs::write(&report_path, report_bytes).map_err(|err| {
        SweepError::Persistence(
            ErrorInfo::new("report_write", "failed to write aggregate report")
                .with_context("path", report_path.display().to_string())
                .with_hint(err.to_string()),
        )
    })?;
    Ok(report)
}

struct ResultSource {
    universe: String,
    stem: String,
    path: PathBuf,
}

fn enumerate_results(results_dir: &Path) -> Result<Vec<ResultSource>, SweepError> {
    if !results_dir.is_dir() {
        return Err(SweepError::Dataset(
            ErrorInfo::new("results_dir", "results directory does not exist")
                .with_context("path", results_dir.display().to_string()),
        ));
    }
    let mut sources = Vec::new();
    for entry in WalkDir::new(results_dir).sort_by_file_name() {
        let entry = entry.map_err(|err| {
            SweepError::Dataset(
                ErrorInfo::new("results_walk", "failed to walk results directory")
                    .with_context("path", results_dir.display().to_string())
                    .with_hint(err.to_string()),
            )
        })?;
        let path = entry.path();
        if !entry.file_type().is_file()
            || path.extension().and_then(|ext| ext.to_str()) != Some("csv")
        {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        // Results are namespaced per universe directory; files dropped
        // directly into the root aggregate under an empty universe key.
        let universe = path
            .parent()
            .filter(|parent| *parent != results_dir)
            .and_then(|parent| parent.file_name())
            .and_then(|name| name.to_str())
            .unwrap_or("")
            .to_string();
        sources.push(ResultSource {
            universe,
            stem: stem.to_string(),
            path: path.to_path_buf(),
        });
    }
    Ok(sources)
}

fn summarize_file(
    source: &ResultSource,
    benchmark: &Benchmark,
    summary_dir: &Path,
    metrics: &dyn Metrics,
) -> Result<(), SweepError> {
    let records = read_results(&source.path)?;
    let summary = summarize_records(&records, benchmark, metrics);

    let out_path = summary_dir
        .join(&source.universe)
        .join(format!("{}.json", source.stem));
    if let Some(parent) = out_path.parent() {
        fs::create_dir_all(parent).map_err(|err| dir_error(parent, err))?;
    }
    let bytes = to_canonical_json_bytes(&summary)?;
    fs::write(&out_path, bytes).map_err(|err| {
        SweepError::Persistence(
            ErrorInfo::new("summary_write", "failed to write summary statistics")
                .with_context("path", out_path.display().to_string())
                .with_hint(err.to_string()),
        )
    })
}

/// Computes the flat summary map for one result table.
///
/// Exposed so fixtures can check the statistics without touching disk.
pub fn summarize_records(
    records: &[TradeRecord],
    benchmark: &Benchmark,
    metrics: &dyn Metrics,
) -> BTreeMap<String, f64> {
    let daily = daily_profit(records);
    let mut summary = metrics.compute(&daily, benchmark);

    // Exact equality is intentional: a degenerate bar records the same tick
    // for both fields.
    let open_high: f64 = records
        .iter()
        .filter(|record| record.open == record.high)
        .map(|record| record.profit)
        .sum();
    let open_low: f64 = records
        .iter()
        .filter(|record| record.open == record.low)
        .map(|record| record.profit)
        .sum();
    summary.insert("profit_open_high".to_string(), open_high);
    summary.insert("profit_open_low".to_string(), open_low);

    for (year, total) in yearly_profit(&daily) {
        summary.insert(format!("year_{year}"), total);
    }
    summary
}

fn daily_profit(records: &[TradeRecord]) -> BTreeMap<NaiveDate, f64> {
    let mut daily = BTreeMap::new();
    for record in records {
        *daily.entry(record.date).or_insert(0.0) += record.profit;
    }
    daily
}

fn yearly_profit(daily: &BTreeMap<NaiveDate, f64>) -> BTreeMap<i32, f64> {
    let mut yearly = BTreeMap::new();
    for (date, profit) in daily {
        *yearly.entry(date.year()).or_insert(0.0) += profit;
    }
    yearly
}

fn dir_error(path: &Path, err: std::io::Error) -> SweepError {
    SweepError::Persistence(
        ErrorInfo::new("summary_dir", "failed to create summary directory")
            .with_context("path", path.display().to_string())
            .with_hint(err.to_string()),
    )
}
