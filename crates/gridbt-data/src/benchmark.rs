//! Benchmark return series shared read-only across aggregation workers.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDate;
use gridbt_core::errors::{ErrorInfo, SweepError};

/// Daily close-to-close returns of a reference instrument, keyed by date.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Benchmark {
    returns: BTreeMap<NaiveDate, f64>,
}

impl Benchmark {
    /// Builds the return series from date-ordered closing prices.
    ///
    /// The first observation has no predecessor and produces no return.
    pub fn from_closes<I>(closes: I) -> Self
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        let ordered: BTreeMap<NaiveDate, f64> = closes.into_iter().collect();
        let mut returns = BTreeMap::new();
        let mut previous: Option<f64> = None;
        for (date, close) in ordered {
            if let Some(prev) = previous {
                if prev != 0.0 {
                    returns.insert(date, close / prev - 1.0);
                }
            }
            previous = Some(close);
        }
        Self { returns }
    }

    /// Return for the given date, when the benchmark traded that day.
    pub fn daily_return(&self, date: NaiveDate) -> Option<f64> {
        self.returns.get(&date).copied()
    }

    /// Number of return observations.
    pub fn len(&self) -> usize {
        self.returns.len()
    }

    /// True when the series holds no observations.
    pub fn is_empty(&self) -> bool {
        self.returns.is_empty()
    }

    /// Iterates over (date, return) pairs in date order.
    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDate, &f64)> {
        self.returns.iter()
    }
}

/// Loads a benchmark series from a delimited file with a date column and
/// OHLC-style columns.
///
/// Headers are matched case-insensitively; rows before `min_start` are
/// dropped before returns are computed.
pub fn load_benchmark(path: &Path, min_start: Option<NaiveDate>) -> Result<Benchmark, SweepError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|err| wrap_read(path, err.to_string()))?;

    let headers = reader
        .headers()
        .map_err(|err| wrap_read(path, err.to_string()))?
        .clone();
    let date_idx = column_index(&headers, "date")
        .ok_or_else(|| wrap_read(path, "missing 'date' column".to_string()))?;
    let close_idx = column_index(&headers, "close")
        .ok_or_else(|| wrap_read(path, "missing 'close' column".to_string()))?;

    let mut closes = Vec::new();
    for row in reader.records() {
        let record = row.map_err(|err| wrap_read(path, err.to_string()))?;
        let raw_date = record
            .get(date_idx)
            .ok_or_else(|| wrap_read(path, "short record".to_string()))?;
        let date = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d")
            .map_err(|err| wrap_read(path, format!("bad date '{raw_date}': {err}")))?;
        if let Some(start) = min_start {
            if date < start {
                continue;
            }
        }
        let raw_close = record
            .get(close_idx)
            .ok_or_else(|| wrap_read(path, "short record".to_string()))?;
        let close: f64 = raw_close
            .trim()
            .parse()
            .map_err(|err| wrap_read(path, format!("bad close '{raw_close}': {err}")))?;
        closes.push((date, close));
    }
    Ok(Benchmark::from_closes(closes))
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|header| header.trim().eq_ignore_ascii_case(name))
}

fn wrap_read(path: &Path, detail: String) -> SweepError {
    SweepError::Dataset(
        ErrorInfo::new("benchmark_read", "failed to load benchmark series")
            .with_context("path", path.display().to_string())
            .with_hint(detail),
    )
}
