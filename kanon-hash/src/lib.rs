//! Hash prefixes for K-Anonymity lookups and random hex tokens.

use std::ops::RangeInclusive;

use rand::RngCore;
use sha2::{Digest, Sha256};

pub const MIN_PREFIX_LEN: usize = 4;
pub const MAX_PREFIX_LEN: usize = 32;
pub const PREFIX_LEN_RANGE: RangeInclusive<usize> = MIN_PREFIX_LEN..=MAX_PREFIX_LEN;

/// Lowercase hex SHA-256 digest of `input`, 64 chars.
pub fn sha256_hex(input: &str) -> String {
  format!("{:x}", Sha256::digest(input.as_bytes()))
}

/// First `len` hex chars of the SHA-256 digest of `input`.
///
/// Returns `None` if `len` is outside [`PREFIX_LEN_RANGE`].
pub fn hash_prefix(input: &str, len: usize) -> Option<String> {
  if !PREFIX_LEN_RANGE.contains(&len) {
    return None;
  }
  let mut hex = sha256_hex(input);
  hex.truncate(len);
  Some(hex)
}

/// `bytes` random bytes from the thread rng, hex encoded.
pub fn random_token(bytes: usize) -> String {
  let mut buf = vec![0; bytes];
  rand::thread_rng().fill_bytes(&mut buf);
  buf.iter().map(|byte| format!("{byte:02x}")).collect()
}
