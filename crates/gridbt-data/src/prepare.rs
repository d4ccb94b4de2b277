//! Per-universe dataset synthesis from a master data file and index
//! membership files.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use chrono::NaiveDate;
use gridbt_core::errors::{ErrorInfo, SweepError};
use serde::Deserialize;
use tracing::info;
use walkdir::WalkDir;

use crate::frame::Bar;

#[derive(Debug, Deserialize)]
struct MemberRow {
    date: NaiveDate,
    symbol: String,
}

/// Joins a master data file against per-index membership files and writes
/// one dataset file per index into `out_dir`.
///
/// The master file holds every available observation; each membership file
/// (`<universe>.csv` with `date,symbol` rows) selects the observations that
/// belong to that index on each day. Returns the universe keys written, in
/// sorted order.
pub fn prepare_universes(
    master: &Path,
    memberships: &Path,
    out_dir: &Path,
) -> Result<Vec<String>, SweepError> {
    let bars = read_master(master)?;
    let mut by_key: HashMap<(NaiveDate, &str), &Bar> = HashMap::with_capacity(bars.len());
    for bar in &bars {
        by_key.insert((bar.date, bar.symbol.as_str()), bar);
    }

    let mut written = Vec::new();
    for entry in WalkDir::new(memberships).sort_by_file_name() {
        let entry = entry.map_err(|err| {
            SweepError::Dataset(
                ErrorInfo::new("membership_walk", "failed to walk membership directory")
                    .with_context("path", memberships.display().to_string())
                    .with_hint(err.to_string()),
            )
        })?;
        let path = entry.path();
        if !entry.file_type().is_file()
            || path.extension().and_then(|ext| ext.to_str()) != Some("csv")
        {
            continue;
        }
        let Some(universe) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        let members = read_members(path)?;
        let mut selected: Vec<Bar> = members
            .iter()
            .filter_map(|member| by_key.get(&(member.date, member.symbol.as_str())))
            .map(|bar| (*bar).clone())
            .collect();
        selected.sort_by(|a, b| (a.date, &a.symbol).cmp(&(b.date, &b.symbol)));
        let out_path = out_dir.join(format!("{universe}.csv"));
        write_bars(&out_path, &selected)?;
        info!(
            universe = %universe,
            rows = selected.len(),
            path = %out_path.display(),
            "prepared universe dataset"
        );
        written.push(universe.to_string());
    }
    written.sort();
    Ok(written)
}

fn read_master(path: &Path) -> Result<Vec<Bar>, SweepError> {
    // The master file is just a large dataset file without a universe of
    // its own.
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|err| wrap(path, "master_read", err.to_string()))?;
    let mut bars = Vec::new();
    for row in reader.deserialize() {
        let bar: Bar = row.map_err(|err| wrap(path, "master_read", err.to_string()))?;
        bars.push(bar);
    }
    Ok(bars)
}

fn read_members(path: &Path) -> Result<Vec<MemberRow>, SweepError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|err| wrap(path, "membership_read", err.to_string()))?;
    let mut members = Vec::new();
    for row in reader.deserialize() {
        let member: MemberRow = row.map_err(|err| wrap(path, "membership_read", err.to_string()))?;
        members.push(member);
    }
    Ok(members)
}

fn write_bars(path: &Path, bars: &[Bar]) -> Result<(), SweepError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|err| wrap(parent, "prepare_dir", err.to_string()))?;
    }
    let file = File::create(path).map_err(|err| wrap(path, "prepare_write", err.to_string()))?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(BufWriter::new(file));
    for bar in bars {
        writer
            .serialize(bar)
            .map_err(|err| wrap(path, "prepare_write", err.to_string()))?;
    }
    writer
        .flush()
        .map_err(|err| wrap(path, "prepare_write", err.to_string()))?;
    Ok(())
}

fn wrap(path: &Path, code: &str, detail: String) -> SweepError {
    SweepError::Dataset(
        ErrorInfo::new(code, "dataset preparation failure")
            .with_context("path", path.display().to_string())
            .with_hint(detail),
    )
}
