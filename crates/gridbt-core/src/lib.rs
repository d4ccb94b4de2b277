#![deny(missing_docs)]
#![doc = "Shared vocabulary for the gridbt sweep engine: scalar values, resolved configurations, the error taxonomy, canonical serialization and content identifiers."]

pub mod errors;
pub mod hash;
pub mod provenance;
pub mod serde;
pub mod value;

pub use errors::{ErrorInfo, SweepError};
pub use hash::{identifier, stable_hash_string};
pub use provenance::RunProvenance;
pub use value::{Config, Scalar};
