//! SHA-256 digests for generated wallpapers, and a read-back check after saving.

use anyhow::{bail, Context, Result};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

/// Lowercase hex SHA-256 of an in-memory buffer.
pub fn sha256_bytes(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Lowercase hex SHA-256 of a file on disk.
///
/// Wallpapers are a few MB at most, so the file is read whole.
pub fn sha256_path(path: &Path) -> Result<String> {
    let data = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    Ok(sha256_bytes(&data))
}

/// Re-read a saved file and confirm it hashes to `expected`. Returns the digest.
pub fn verify_saved(path: &Path, expected: &str) -> Result<String> {
    let actual = sha256_path(path)?;
    if !actual.eq_ignore_ascii_case(expected) {
        bail!(
            "{} does not match the generated image (sha256 {}, expected {})",
            path.display(),
            actual,
            expected
        );
    }
    Ok(actual)
}
