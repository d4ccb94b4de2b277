//! Canonical run reports for sweeps and aggregations.

use std::collections::BTreeMap;

use chrono::Utc;
use gridbt_core::provenance::RunProvenance;
use serde::{Deserialize, Serialize};

/// State of an individual work unit within a sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnitState {
    /// The unit evaluated and both artifacts were persisted.
    Complete,
    /// The unit failed during evaluation or persistence.
    Failed,
}

/// Status of an individual work unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitStatus {
    /// State of the unit.
    pub state: UnitState,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Error message captured when the unit failed.
    pub error: Option<String>,
}

impl UnitStatus {
    /// Status for a unit whose artifacts were persisted.
    pub fn complete() -> Self {
        Self {
            state: UnitState::Complete,
            error: None,
        }
    }

    /// Status for a unit that failed, capturing the error string.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            state: UnitState::Failed,
            error: Some(error.into()),
        }
    }
}

/// Report entry for a single (universe, configuration) work unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitReport {
    /// Universe key of the dataset the unit ran against.
    pub universe: String,
    /// Content identifier of the configuration.
    pub identifier: String,
    /// Number of result rows produced (zero when the unit failed).
    pub rows: usize,
    /// Execution status.
    pub status: UnitStatus,
}

/// Final report for one sweep run.
///
/// A sweep always terminates with this report: per-unit failures are
/// captured here rather than raised, so one degenerate configuration never
/// hides the outcome of its siblings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepReport {
    /// Canonical hash of the sweep inputs (configurations and universes).
    pub input_hash: String,
    /// Number of work units submitted to the pool.
    pub submitted: usize,
    /// Number of units that completed.
    pub succeeded: usize,
    /// Number of units that failed.
    pub failed: usize,
    /// Per-unit results in deterministic (universe, identifier) order.
    pub units: Vec<UnitReport>,
    /// Provenance metadata describing the run.
    pub provenance: RunProvenance,
}

impl SweepReport {
    /// Builds a report from per-unit outcomes, computing the counters.
    pub fn new(input_hash: String, mut units: Vec<UnitReport>) -> Self {
        units.sort_by(|a, b| {
            (a.universe.as_str(), a.identifier.as_str())
                .cmp(&(b.universe.as_str(), b.identifier.as_str()))
        });
        let submitted = units.len();
        let succeeded = units
            .iter()
            .filter(|unit| unit.status.state == UnitState::Complete)
            .count();
        let failed = submitted - succeeded;
        Self {
            provenance: provenance(&input_hash),
            input_hash,
            submitted,
            succeeded,
            failed,
            units,
        }
    }

    /// Units that failed, in report order.
    pub fn failed_units(&self) -> impl Iterator<Item = &UnitReport> {
        self.units
            .iter()
            .filter(|unit| unit.status.state == UnitState::Failed)
    }
}

pub(crate) fn provenance(input_hash: &str) -> RunProvenance {
    let mut versions = BTreeMap::new();
    versions.insert(
        "gridbt-run".to_string(),
        env!("CARGO_PKG_VERSION").to_string(),
    );
    RunProvenance {
        input_hash: input_hash.to_string(),
        created_at: Utc::now().to_rfc3339(),
        tool_versions: versions,
    }
}
