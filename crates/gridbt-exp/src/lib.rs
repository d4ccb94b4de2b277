//! Expansion of declarative sweep documents into concrete configurations.

mod expand;
mod spec;

pub use expand::expand;
pub use spec::{load_spec, Axis, NestedAxis, SweepSpec};
