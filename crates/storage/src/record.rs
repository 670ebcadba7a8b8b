//! Record kinds and the envelope each stored record is wrapped in.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Longest key, in bytes, that is hex-encoded as is. Longer keys are hashed
/// so the file name stays within the 255-byte limit.
pub const MAX_PLAIN_KEY_BYTES: usize = 100;

/// The kind tag of a stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    /// Catalog exercise, keyed by exercise name
    Exercise,
    /// Routine, keyed by routine name
    Routine,
    /// Goal, keyed by exercise name
    Goal,
}

impl RecordKind {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Exercise => "exercise",
            RecordKind::Routine => "routine",
            RecordKind::Goal => "goal",
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored record together with its kind, key and timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Record kind
    pub kind: RecordKind,
    /// Record key
    pub key: String,
    /// The record itself
    pub data: T,
    /// First written
    pub created_at: chrono::DateTime<chrono::Utc>,
    /// Last written
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Encode a record key so it can be used as a file name.
///
/// Short keys become lowercase hex, two digits per byte, so they never
/// contain path separators or dots and never collide on case-insensitive
/// file systems. Keys over [`MAX_PLAIN_KEY_BYTES`] become `sha256-<digest>`;
/// the full key is kept in the envelope and checked on read.
pub fn encode_key(key: &str) -> String {
    if key.len() <= MAX_PLAIN_KEY_BYTES {
        hex::encode(key)
    } else {
        format!("sha256-{}", hex::encode(Sha256::digest(key.as_bytes())))
    }
}
