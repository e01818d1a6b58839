//! Content-addressed identifiers.
//!
//! Every record in a manifest is named by `ekn:///` followed by the
//! hex-encoded SHA-1 of some canonical input (a section name, a category
//! name, or an absolute file path). References such as thumbnails are
//! recomputed independently from the same input, so derivation must stay
//! deterministic.

use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};

/// Namespace marker prepended to every identifier.
pub const ID_PREFIX: &str = "ekn:///";

/// An `ekn:///<sha1>` identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentId(String);

impl ContentId {
    /// Derive the identifier for `input`.
    pub fn derive(input: &str) -> Self {
        Self(format!("{ID_PREFIX}{}", sha1_hex(input)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The bare 40-character hash, without the namespace marker.
    pub fn hash(&self) -> &str {
        &self.0[ID_PREFIX.len()..]
    }
}

impl std::fmt::Display for ContentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn sha1_hex(input: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(input.as_bytes());
    format!("{:x}", hasher.finalize())
}
