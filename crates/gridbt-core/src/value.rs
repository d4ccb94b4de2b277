//! Scalar parameter values and fully resolved configurations.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, SweepError};

/// A single resolved parameter value.
///
/// These are the only values a [`Config`] may hold; lists and mappings are
/// expansion-time constructs and never survive into a resolved
/// configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    /// Boolean flag.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// Free-form text.
    Text(String),
}

impl Scalar {
    /// Returns the integer payload when the value is an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Scalar::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the numeric payload, widening integers to floats.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Scalar::Float(value) => Some(*value),
            Scalar::Int(value) => Some(*value as f64),
            _ => None,
        }
    }

    /// Returns the boolean payload when the value is a flag.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the text payload when the value is a string.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Scalar::Text(value) => Some(value),
            _ => None,
        }
    }

    /// Converts a JSON value into a scalar, rejecting structured values.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, SweepError> {
        match value {
            serde_json::Value::Bool(flag) => Ok(Scalar::Bool(*flag)),
            serde_json::Value::Number(number) => {
                if let Some(int) = number.as_i64() {
                    Ok(Scalar::Int(int))
                } else if let Some(float) = number.as_f64() {
                    Ok(Scalar::Float(float))
                } else {
                    Err(shape_error("scalar-number", "unrepresentable number"))
                }
            }
            serde_json::Value::String(text) => Ok(Scalar::Text(text.clone())),
            other => Err(shape_error(
                "scalar-shape",
                format!("expected a scalar value, found {other}"),
            )),
        }
    }
}

impl Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(value) => write!(f, "{value}"),
            Scalar::Int(value) => write!(f, "{value}"),
            Scalar::Float(value) => write!(f, "{value}"),
            Scalar::Text(value) => write!(f, "{value}"),
        }
    }
}

fn shape_error(code: &str, message: impl Into<String>) -> SweepError {
    SweepError::Spec(ErrorInfo::new(code, message))
}

/// One fully resolved, flat parameter set.
///
/// Keys are held in a `BTreeMap`, so the canonical (key-sorted) form
/// required by the identifier invariant holds by construction, not by a
/// normalization pass.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Config(BTreeMap<String, Scalar>);

impl Config {
    /// Creates an empty configuration.
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Inserts a value, returning the previous value for the key if any.
    pub fn insert(&mut self, key: impl Into<String>, value: Scalar) -> Option<Scalar> {
        self.0.insert(key.into(), value)
    }

    /// Merges `other` into `self`; entries from `other` win on collision.
    pub fn merge(&mut self, other: &Config) {
        for (key, value) in other.iter() {
            self.0.insert(key.clone(), value.clone());
        }
    }

    /// Looks up a value by option name.
    pub fn get(&self, key: &str) -> Option<&Scalar> {
        self.0.get(key)
    }

    /// Number of options in the configuration.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the configuration holds no options.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over entries in canonical key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Scalar)> {
        self.0.iter()
    }
}

impl FromIterator<(String, Scalar)> for Config {
    fn from_iter<I: IntoIterator<Item = (String, Scalar)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_prefers_incoming_entries() {
        let mut base: Config = [
            ("window".to_string(), Scalar::Int(2)),
            ("order".to_string(), Scalar::Text("buy".to_string())),
        ]
        .into_iter()
        .collect();
        let overlay: Config = [("window".to_string(), Scalar::Int(5))].into_iter().collect();
        base.merge(&overlay);
        assert_eq!(base.get("window"), Some(&Scalar::Int(5)));
        assert_eq!(base.len(), 2);
    }

    #[test]
    fn scalar_rejects_structured_json() {
        let value = serde_json::json!({"nested": 1});
        assert!(Scalar::from_json(&value).is_err());
        let value = serde_json::json!([1, 2]);
        assert!(Scalar::from_json(&value).is_err());
    }
}
