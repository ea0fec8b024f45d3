//! Package ids: short content hashes of the inputs that select a binary.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::consts::PACKAGE_ID_LEN;

pub type HashError = serde_json::Error;

/// Identifies one binary configuration of the package.
///
/// The id is a 20-character truncated SHA-256 of the JSON-serialized inputs,
/// lowercase hexadecimal, e.g. `"a1b2c3d4e5f6789012ab"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PackageId(pub String);

impl std::fmt::Display for PackageId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}

pub trait Hashable: Serialize {
  fn compute_hash(&self) -> Result<PackageId, HashError> {
    let serialized = serde_json::to_string(self)?;
    let mut hasher = Sha256::new();
    hasher.update(serialized.as_bytes());
    let full = hex::encode(hasher.finalize());
    Ok(PackageId(full[..PACKAGE_ID_LEN].to_string()))
  }
}
