//! Recursive expansion of a classified sweep document.

use gridbt_core::errors::{ErrorInfo, SweepError};
use gridbt_core::value::{Config, Scalar};

use crate::spec::{Axis, NestedAxis, SweepSpec};

/// Expands a sweep document into the full list of resolved configurations.
///
/// The simple axes form a Cartesian product; the nested axis contributes
/// one configuration set per branch, each carrying the injected branch key,
/// and the two are crossed with nested fields winning on key collision.
/// A document that expands to zero configurations (an empty list axis or an
/// empty branch mapping) is a hard error: a silently empty sweep is
/// indistinguishable from "nothing to do" and is almost always a mistake in
/// the document.
pub fn expand(spec: &SweepSpec) -> Result<Vec<Config>, SweepError> {
    let configs = expand_spec(spec);
    if configs.is_empty() {
        return Err(SweepError::EmptyExpansion(ErrorInfo::new(
            "empty_expansion",
            "the sweep document expanded to zero configurations",
        )));
    }
    Ok(configs)
}

fn expand_spec(spec: &SweepSpec) -> Vec<Config> {
    let simple = expand_simple(spec);
    let Some(nested) = &spec.nested else {
        return simple;
    };
    let overlays = expand_nested(nested);
    let mut outputs = Vec::with_capacity(simple.len() * overlays.len());
    for base in &simple {
        for overlay in &overlays {
            let mut merged = base.clone();
            merged.merge(overlay);
            outputs.push(merged);
        }
    }
    outputs
}

fn expand_simple(spec: &SweepSpec) -> Vec<Config> {
    let axes: Vec<(&String, &Axis)> = spec.simple.iter().collect();
    let mut outputs = Vec::new();
    fill_product(&axes, 0, Config::new(), &mut outputs);
    outputs
}

fn fill_product(
    axes: &[(&String, &Axis)],
    idx: usize,
    current: Config,
    outputs: &mut Vec<Config>,
) {
    if idx == axes.len() {
        outputs.push(current);
        return;
    }
    let (name, axis) = axes[idx];
    match axis {
        Axis::Fixed(value) => {
            let mut next = current;
            next.insert(name.clone(), value.clone());
            fill_product(axes, idx + 1, next, outputs);
        }
        Axis::List(values) => {
            for value in values {
                let mut next = current.clone();
                next.insert(name.clone(), value.clone());
                fill_product(axes, idx + 1, next, outputs);
            }
        }
    }
}

fn expand_nested(nested: &NestedAxis) -> Vec<Config> {
    let mut outputs = Vec::new();
    for (branch, sub) in &nested.branches {
        let mut subs = expand_spec(sub);
        for config in &mut subs {
            config.insert(nested.key.clone(), Scalar::Text(branch.clone()));
        }
        outputs.extend(subs);
    }
    outputs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::SweepSpec;

    #[test]
    fn degenerate_single_level_product_still_works() {
        let spec = SweepSpec::from_yaml_str("window: [2, 3]\norder: buy\n").expect("classify");
        let configs = expand(&spec).expect("expand");
        assert_eq!(configs.len(), 2);
        for config in &configs {
            assert_eq!(config.get("order"), Some(&Scalar::Text("buy".to_string())));
        }
    }

    #[test]
    fn injected_branch_key_overrides_simple_axis() {
        let spec = SweepSpec::from_yaml_str(
            "method: stale\naxis:\n  mean:\n    method: fresh\n",
        )
        .expect("classify");
        let configs = expand(&spec).expect("expand");
        assert_eq!(configs.len(), 1);
        assert_eq!(
            configs[0].get("method"),
            Some(&Scalar::Text("fresh".to_string()))
        );
        assert_eq!(
            configs[0].get("axis"),
            Some(&Scalar::Text("mean".to_string()))
        );
    }
}
