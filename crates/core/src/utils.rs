//! Binary data helpers.
//!
//! Every edit is a splice over an owned buffer: the input is consumed and
//! the edited buffer returned, so no caller keeps offsets into bytes that a
//! later stage has replaced.

use std::ops::Range;

/// Insert `bytes` at `pos`.
pub fn insert_at(data: Vec<u8>, pos: usize, bytes: &[u8]) -> Vec<u8> {
    replace_range(data, pos..pos, bytes)
}

/// Replace `range` with `bytes`.
pub fn replace_range(mut data: Vec<u8>, range: Range<usize>, bytes: &[u8]) -> Vec<u8> {
    data.splice(range, bytes.iter().copied());
    data
}

/// Check whether `needle` occurs anywhere in `data`.
pub fn contains(data: &[u8], needle: &[u8]) -> bool {
    !needle.is_empty() && data.windows(needle.len()).any(|w| w == needle)
}

/// Lowercase hex SHA-256 digest.
pub fn sha256_hex(data: &[u8]) -> String {
    use sha2::{Digest, Sha256};
    format!("{:x}", Sha256::digest(data))
}
