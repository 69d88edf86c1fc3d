//! Content fingerprint used as the score cache key.

use sha2::{Digest, Sha256};

/// Hex SHA-256 over `resume_text` followed directly by `job_description`.
///
/// No separator and no normalization: whitespace or case differences produce a new key.
pub fn fingerprint(resume_text: &str, job_description: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(resume_text.as_bytes());
    hasher.update(job_description.as_bytes());
    hex::encode(hasher.finalize())
}
