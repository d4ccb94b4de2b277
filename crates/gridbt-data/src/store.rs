//! Keyed CSV result store: one logical table per identifier-named file.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use gridbt_core::errors::{ErrorInfo, SweepError};

use crate::frame::TradeRecord;

/// Writes a result table to `path`, creating parent directories as needed.
///
/// Rewriting the same records reproduces the file byte for byte, which is
/// what makes retried work units idempotent.
pub fn write_results(path: &Path, records: &[TradeRecord]) -> Result<(), SweepError> {
    ensure_parent(path)?;
    let file = File::create(path).map_err(|err| wrap_write(path, err.to_string()))?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(BufWriter::new(file));
    for record in records {
        writer
            .serialize(record)
            .map_err(|err| wrap_write(path, err.to_string()))?;
    }
    writer
        .flush()
        .map_err(|err| wrap_write(path, err.to_string()))?;
    Ok(())
}

/// Reads a result table back from `path`.
pub fn read_results(path: &Path) -> Result<Vec<TradeRecord>, SweepError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|err| wrap_read(path, err.to_string()))?;
    let mut records = Vec::new();
    for row in reader.deserialize() {
        let record: TradeRecord = row.map_err(|err| wrap_read(path, err.to_string()))?;
        records.push(record);
    }
    Ok(records)
}

fn ensure_parent(path: &Path) -> Result<(), SweepError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|err| {
            SweepError::Persistence(
                ErrorInfo::new("store_dir", "failed to create result directory")
                    .with_context("path", parent.display().to_string())
                    .with_hint(err.to_string()),
            )
        })?;
    }
    Ok(())
}

fn wrap_write(path: &Path, detail: String) -> SweepError {
    SweepError::Persistence(
        ErrorInfo::new("store_write", "failed to write result table")
            .with_context("path", path.display().to_string())
            .with_hint(detail),
    )
}

fn wrap_read(path: &Path, detail: String) -> SweepError {
    SweepError::Persistence(
        ErrorInfo::new("store_read", "failed to read result table")
            .with_context("path", path.display().to_string())
            .with_hint(detail),
    )
}
