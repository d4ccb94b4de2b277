//! Work-unit fan-out across a per-sweep worker pool.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use gridbt_core::errors::{ErrorInfo, SweepError};
use gridbt_core::hash::{identifier, stable_hash_string};
use gridbt_core::serde::to_canonical_json_bytes;
use gridbt_core::value::Config;
use gridbt_data::{write_results, Dataset};
use rayon::prelude::*;
use tracing::error;

use crate::eval::Evaluator;
use crate::report::{SweepReport, UnitReport, UnitStatus};

/// Output locations for a sweep, passed in explicitly so tests and callers
/// can inject any root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepPaths {
    /// Directory receiving one serialized configuration per identifier.
    pub params_dir: PathBuf,
    /// Directory receiving one result table per (universe, identifier).
    pub results_dir: PathBuf,
    /// Directory receiving one summary file per result table.
    pub summary_dir: PathBuf,
}

impl SweepPaths {
    /// Conventional layout under a single output root.
    pub fn under(root: &Path) -> Self {
        Self {
            params_dir: root.join("parameters"),
            results_dir: root.join("results"),
            summary_dir: root.join("summary"),
        }
    }

    /// Path of the persisted configuration for an identifier.
    pub fn params_file(&self, id: &str) -> PathBuf {
        self.params_dir.join(format!("{id}.json"))
    }

    /// Path of the persisted result table for a (universe, identifier).
    pub fn result_file(&self, universe: &str, id: &str) -> PathBuf {
        self.results_dir.join(universe).join(format!("{id}.csv"))
    }

    /// Path of the summary file mirroring a result file stem.
    pub fn summary_file(&self, universe: &str, stem: &str) -> PathBuf {
        self.summary_dir.join(universe).join(format!("{stem}.json"))
    }
}

/// Options governing sweep execution.
#[derive(Debug, Clone)]
pub struct RunOpts {
    /// Worker threads for the sweep pool; 0 sizes the pool to the
    /// available cores.
    pub concurrency: usize,
}

impl Default for RunOpts {
    fn default() -> Self {
        Self { concurrency: 0 }
    }
}

/// Runs the full sweep: every configuration against every dataset.
///
/// Work units are independent and commutative; persisted artifacts are
/// named by content identifier, never by submission order, so completion
/// order cannot affect the final on-disk state. The pool is created per
/// sweep and joined before this function returns, so every submitted unit
/// is accounted for in the report. Per-unit failures are isolated: they are
/// logged with their (universe, identifier) context and recorded, and never
/// abort sibling units.
pub fn run_sweep(
    datasets: &BTreeMap<String, Dataset>,
    configs: &[Config],
    evaluator: &dyn Evaluator,
    paths: &SweepPaths,
    opts: &RunOpts,
) -> Result<SweepReport, SweepError> {
    fs::create_dir_all(&paths.params_dir).map_err(|err| dir_error(&paths.params_dir, err))?;
    fs::create_dir_all(&paths.results_dir).map_err(|err| dir_error(&paths.results_dir, err))?;

    let units = enumerate_units(datasets, configs);
    let input_hash = input_hash(datasets, configs)?;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(opts.concurrency)
        .build()
        .map_err(|err| {
            SweepError::Persistence(
                ErrorInfo::new("thread_pool", "failed to build sweep worker pool")
                    .with_hint(err.to_string()),
            )
        })?;

    let reports: Vec<UnitReport> = pool.install(|| {
        units
            .par_iter()
            .map(|unit| process_unit(unit, evaluator, paths))
            .collect()
    });

    let report = SweepReport::new(input_hash, reports);
    let report_bytes = to_canonical_json_bytes(&report)?;
    let report_path = report_root(paths).join("sweep_report.json");
    fs::write(&report_path, report_bytes).map_err(|err| {
        SweepError::Persistence(
            ErrorInfo::new("report_write", "failed to write sweep report")
                .with_context("path", report_path.display().to_string())
                .with_hint(err.to_string()),
        )
    })?;
    Ok(report)
}

struct UnitSpec<'a> {
    universe: &'a str,
    dataset: &'a Dataset,
    config: &'a Config,
}

fn enumerate_units<'a>(
    datasets: &'a BTreeMap<String, Dataset>,
    configs: &'a [Config],
) -> Vec<UnitSpec<'a>> {
    let mut units = Vec::with_capacity(datasets.len() * configs.len());
    for (universe, dataset) in datasets {
        for config in configs {
            units.push(UnitSpec {
                universe,
                dataset,
                config,
            });
        }
    }
    units
}

fn process_unit(unit: &UnitSpec<'_>, evaluator: &dyn Evaluator, paths: &SweepPaths) -> UnitReport {
    let id = match identifier(unit.config) {
        Ok(id) => id,
        Err(err) => return failed_unit(unit.universe, String::new(), &err),
    };
    let records = match evaluator.evaluate(unit.dataset, unit.config) {
        Ok(records) => records,
        Err(err) => return failed_unit(unit.universe, id, &err),
    };
    if let Err(err) = persist_config(unit.config, &id, paths) {
        return failed_unit(unit.universe, id, &err);
    }
    if let Err(err) = write_results(&paths.result_file(unit.universe, &id), &records) {
        return failed_unit(unit.universe, id, &err);
    }
    UnitReport {
        universe: unit.universe.to_string(),
        identifier: id,
        rows: records.len(),
        status: UnitStatus::complete(),
    }
}

fn persist_config(config: &Config, id: &str, paths: &SweepPaths) -> Result<(), SweepError> {
    let bytes = to_canonical_json_bytes(config)?;
    let path = paths.params_file(id);
    fs::write(&path, bytes).map_err(|err| {
        SweepError::Persistence(
            ErrorInfo::new("params_write", "failed to write configuration artifact")
                .with_context("path", path.display().to_string())
                .with_hint(err.to_string()),
        )
    })
}

fn failed_unit(universe: &str, id: String, err: &SweepError) -> UnitReport {
    error!(
        universe = %universe,
        identifier = %id,
        error = %err,
        "work unit failed"
    );
    UnitReport {
        universe: universe.to_string(),
        identifier: id,
        rows: 0,
        status: UnitStatus::failed(err.to_string()),
    }
}

fn input_hash(
    datasets: &BTreeMap<String, Dataset>,
    configs: &[Config],
) -> Result<String, SweepError> {
    let universes: Vec<&String> = datasets.keys().collect();
    stable_hash_string(&(universes, configs))
}

fn dir_error(path: &Path, err: std::io::Error) -> SweepError {
    SweepError::Persistence(
        ErrorInfo::new("sweep_dir", "failed to create sweep output directory")
            .with_context("path", path.display().to_string())
            .with_hint(err.to_string()),
    )
}

// The report lands next to the three artifact directories when they share a
// parent, falling back to the results directory otherwise.
fn report_root(paths: &SweepPaths) -> PathBuf {
    match (paths.params_dir.parent(), paths.results_dir.parent()) {
        (Some(a), Some(b)) if a == b => a.to_path_buf(),
        _ => paths.results_dir.clone(),
    }
}
