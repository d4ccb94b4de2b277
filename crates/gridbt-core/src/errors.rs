//! Structured error types shared across gridbt crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`SweepError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (paths, identifiers, universe keys).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the sweep engine.
///
/// Structural families (`Spec`, `NestedAxes`, `EmptyExpansion`) abort a run
/// before any work unit is dispatched; `Evaluation` and `Persistence` are
/// recovered per work unit and reported in aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum SweepError {
    /// Malformed sweep document: a value that is neither scalar,
    /// list-of-scalars, nor mapping.
    #[error("spec error: {0}")]
    Spec(ErrorInfo),
    /// More than one mapping-valued entry at a single document level.
    #[error("nested axes error: {0}")]
    NestedAxes(ErrorInfo),
    /// The sweep document expanded to zero configurations.
    #[error("empty expansion: {0}")]
    EmptyExpansion(ErrorInfo),
    /// Dataset catalog or benchmark loading failures.
    #[error("dataset error: {0}")]
    Dataset(ErrorInfo),
    /// Failure raised by the evaluation function for one work unit.
    #[error("evaluation error: {0}")]
    Evaluation(ErrorInfo),
    /// I/O failure while writing a params, result or summary artifact.
    #[error("persistence error: {0}")]
    Persistence(ErrorInfo),
    /// Serialization and schema errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.message, self.code)?;
        for (key, value) in &self.context {
            write!(f, " {key}={value}")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " ({hint})")?;
        }
        Ok(())
    }
}

impl SweepError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            SweepError::Spec(info)
            | SweepError::NestedAxes(info)
            | SweepError::EmptyExpansion(info)
            | SweepError::Dataset(info)
            | SweepError::Evaluation(info)
            | SweepError::Persistence(info)
            | SweepError::Serde(info) => info,
        }
    }
}
