//! Dataset catalog: one eager-loaded dataset per universe file.

use std::collections::BTreeMap;
use std::path::Path;

use gridbt_core::errors::{ErrorInfo, SweepError};
use serde::{Deserialize, Serialize};
use tracing::warn;
use walkdir::WalkDir;

use crate::frame::{Bar, Dataset};

/// Policy applied when a catalog file cannot be loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum LoadPolicy {
    /// Fail the whole catalog on the first unreadable or malformed file.
    #[default]
    Abort,
    /// Log the failure and continue with the remaining files.
    Skip,
}

/// Scans a directory tree and loads every `*.csv` dataset it contains.
///
/// The universe key is the file stem. A bad file either aborts the catalog
/// or is skipped with a warning, per `policy` — it is never silently
/// dropped.
pub fn load_catalog(
    dir: &Path,
    policy: LoadPolicy,
) -> Result<BTreeMap<String, Dataset>, SweepError> {
    if !dir.is_dir() {
        return Err(SweepError::Dataset(
            ErrorInfo::new("catalog_dir", "catalog directory does not exist")
                .with_context("path", dir.display().to_string()),
        ));
    }
    let mut catalog = BTreeMap::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|err| {
            SweepError::Dataset(
                ErrorInfo::new("catalog_walk", "failed to walk catalog directory")
                    .with_context("path", dir.display().to_string())
                    .with_hint(err.to_string()),
            )
        })?;
        let path = entry.path();
        if !entry.file_type().is_file()
            || path.extension().and_then(|ext| ext.to_str()) != Some("csv")
        {
            continue;
        }
        let universe = match path.file_stem().and_then(|stem| stem.to_str()) {
            Some(stem) => stem.to_string(),
            None => continue,
        };
        match read_bars(path) {
            Ok(bars) => {
                catalog.insert(universe.clone(), Dataset::new(universe, bars));
            }
            Err(err) => match policy {
                LoadPolicy::Abort => return Err(err),
                LoadPolicy::Skip => {
                    warn!(
                        universe = %universe,
                        path = %path.display(),
                        error = %err,
                        "skipping unloadable dataset"
                    );
                }
            },
        }
    }
    Ok(catalog)
}

fn read_bars(path: &Path) -> Result<Vec<Bar>, SweepError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|err| wrap_read(path, err))?;
    let mut bars = Vec::new();
    for row in reader.deserialize() {
        let bar: Bar = row.map_err(|err| wrap_read(path, err))?;
        bars.push(bar);
    }
    Ok(bars)
}

fn wrap_read(path: &Path, err: csv::Error) -> SweepError {
    SweepError::Dataset(
        ErrorInfo::new("dataset_read", "failed to load dataset file")
            .with_context("path", path.display().to_string())
            .with_hint(err.to_string()),
    )
}
