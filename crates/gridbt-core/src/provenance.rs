//! Provenance descriptors embedded in persisted run reports.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Provenance information attached to every run-level report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RunProvenance {
    /// Canonical hash of the input driving the run (sweep document or
    /// results directory listing).
    pub input_hash: String,
    /// ISO-8601 timestamp recording when the report was generated.
    pub created_at: String,
    /// Version map for all tools involved in the run.
    pub tool_versions: BTreeMap<String, String>,
}
