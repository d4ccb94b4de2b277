//! Sweep document parsing and shape classification.
//!
//! A sweep document is a YAML mapping. Entries with scalar or
//! list-of-scalar values are independent simple axes; the single
//! mapping-valued entry, wherever it appears in the document, is the
//! nested axis. Selecting the nested axis by uniqueness rather than by
//! position keeps the expansion independent of document key order.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use gridbt_core::errors::{ErrorInfo, SweepError};
use gridbt_core::serde::from_yaml_slice;
use gridbt_core::value::Scalar;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

fn spec_error(code: &str, message: impl Into<String>) -> SweepError {
    SweepError::Spec(ErrorInfo::new(code, message))
}

/// One simple axis of the parameter space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Axis {
    /// A fixed value shared by every configuration.
    Fixed(Scalar),
    /// A list of candidate values, tried one per configuration.
    List(Vec<Scalar>),
}

/// The nested axis: named branches expanded jointly with an injected
/// branch-key field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NestedAxis {
    /// Field name injected into every configuration produced by a branch.
    pub key: String,
    /// Branch name to sub-document, expanded recursively.
    pub branches: BTreeMap<String, SweepSpec>,
}

/// A classified sweep document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepSpec {
    /// Simple axes keyed by option name.
    pub simple: BTreeMap<String, Axis>,
    /// The nested axis, when the document carries one.
    pub nested: Option<NestedAxis>,
}

impl SweepSpec {
    /// Classifies a parsed YAML document into axes.
    pub fn from_document(document: &Value) -> Result<Self, SweepError> {
        let mapping = document.as_mapping().ok_or_else(|| {
            spec_error(
                "document_shape",
                format!("sweep document must be a mapping, found {}", kind(document)),
            )
        })?;
        let mut simple = BTreeMap::new();
        let mut nested: Option<NestedAxis> = None;
        for (key, value) in mapping {
            let name = entry_name(key)?;
            match value {
                Value::Mapping(branches) => {
                    if let Some(existing) = &nested {
                        return Err(SweepError::NestedAxes(
                            ErrorInfo::new(
                                "nested_cardinality",
                                "a sweep document may hold at most one mapping-valued entry",
                            )
                            .with_context("first", existing.key.clone())
                            .with_context("second", name),
                        ));
                    }
                    nested = Some(parse_nested(name, branches)?);
                }
                Value::Sequence(items) => {
                    let mut values = Vec::with_capacity(items.len());
                    for item in items {
                        values.push(scalar_axis_value(&name, item)?);
                    }
                    simple.insert(name, Axis::List(values));
                }
                other => {
                    let value = scalar_axis_value(&name, other)?;
                    simple.insert(name, Axis::Fixed(value));
                }
            }
        }
        Ok(Self { simple, nested })
    }

    /// Parses and classifies a YAML document held in a string.
    pub fn from_yaml_str(text: &str) -> Result<Self, SweepError> {
        let document: Value = from_yaml_slice(text.as_bytes())?;
        Self::from_document(&document)
    }
}

/// Reads and classifies a sweep document from disk.
pub fn load_spec<P: AsRef<Path>>(path: P) -> Result<SweepSpec, SweepError> {
    let spec_path = path.as_ref();
    let bytes = fs::read(spec_path).map_err(|err| {
        SweepError::Spec(
            ErrorInfo::new("spec_read", "failed to read sweep document")
                .with_context("path", spec_path.display().to_string())
                .with_hint(err.to_string()),
        )
    })?;
    let document: Value = from_yaml_slice(&bytes)?;
    SweepSpec::from_document(&document)
}

fn parse_nested(key: String, branches: &Mapping) -> Result<NestedAxis, SweepError> {
    let mut parsed = BTreeMap::new();
    for (branch_key, branch_value) in branches {
        let branch = entry_name(branch_key)?;
        let sub = SweepSpec::from_document(branch_value).map_err(|err| match err {
            SweepError::Spec(info) => SweepError::Spec(info.with_context("branch", branch.clone())),
            other => other,
        })?;
        parsed.insert(branch, sub);
    }
    Ok(NestedAxis {
        key,
        branches: parsed,
    })
}

fn entry_name(key: &Value) -> Result<String, SweepError> {
    key.as_str().map(|name| name.to_string()).ok_or_else(|| {
        spec_error(
            "entry_name",
            format!("option names must be strings, found {}", kind(key)),
        )
    })
}

fn scalar_axis_value(name: &str, value: &Value) -> Result<Scalar, SweepError> {
    let scalar = match value {
        Value::Bool(flag) => Scalar::Bool(*flag),
        Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                Scalar::Int(int)
            } else if let Some(float) = number.as_f64() {
                Scalar::Float(float)
            } else {
                return Err(spec_error(
                    "axis_number",
                    format!("unrepresentable number in axis '{name}'"),
                ));
            }
        }
        Value::String(text) => Scalar::Text(text.clone()),
        other => {
            return Err(spec_error(
                "axis_shape",
                format!(
                    "axis '{name}' must hold scalars or a list of scalars, found {}",
                    kind(other)
                ),
            ))
        }
    };
    Ok(scalar)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_axis_position_is_irrelevant() {
        let leading = SweepSpec::from_yaml_str(
            "method:\n  mean: {}\nwindow: [2, 3]\n",
        )
        .expect("classify");
        let trailing = SweepSpec::from_yaml_str(
            "window: [2, 3]\nmethod:\n  mean: {}\n",
        )
        .expect("classify");
        assert_eq!(leading, trailing);
        assert_eq!(leading.nested.as_ref().map(|n| n.key.as_str()), Some("method"));
    }

    #[test]
    fn null_axis_is_rejected() {
        let err = SweepSpec::from_yaml_str("window:\n").expect_err("null axis");
        assert!(matches!(err, SweepError::Spec(_)));
    }

    #[test]
    fn nested_list_is_rejected() {
        let err = SweepSpec::from_yaml_str("window: [[2, 3]]\n").expect_err("list of lists");
        assert!(matches!(err, SweepError::Spec(_)));
    }
}
