//! Content-derived identifiers for resolved configurations.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::errors::SweepError;
use crate::serde::to_canonical_json_bytes;
use crate::value::Config;

/// Computes a stable hexadecimal hash for the provided serializable payload.
pub fn stable_hash_string<T: Serialize>(value: &T) -> Result<String, SweepError> {
    let bytes = to_canonical_json_bytes(value)?;
    let digest = Sha256::digest(bytes);
    Ok(format!("{:x}", digest))
}

/// Returns the content identifier of a resolved configuration.
///
/// Equivalent configurations (equal key-sorted canonical forms) always map
/// to the same identifier; the sweep's idempotence and cacheability rest on
/// this one property. The map inside [`Config`] is key-sorted by
/// construction, so no normalization pass is needed here.
pub fn identifier(config: &Config) -> Result<String, SweepError> {
    stable_hash_string(config)
}
