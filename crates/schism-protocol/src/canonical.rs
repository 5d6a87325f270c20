//! Canonical form of an (identity, principals) pair and its digest.
//!
//! ```text
//! canonical = identity "," sort(principals).join(",")
//! id        = hex(sha256(canonical))
//! ```
//!
//! Principals are sorted byte-wise, so the digest does not depend on the order
//! a request listed them in. Distinct pairs are kept apart only by SHA-256's
//! collision resistance; nothing checks for uniqueness.

use sha2::{Digest, Sha256};

/// Length of a full lookup key id in hex characters.
pub const FULL_ID_LEN: usize = 64;

/// Join identity and sorted principals with commas.
pub fn canonical_input<S: AsRef<str>>(identity: &str, principals: &[S]) -> String {
    let mut sorted: Vec<&str> = principals.iter().map(AsRef::as_ref).collect();
    sorted.sort_unstable();

    let mut parts = Vec::with_capacity(sorted.len() + 1);
    parts.push(identity);
    parts.extend(sorted);
    parts.join(",")
}

/// Lowercase hex SHA-256 of `input`.
pub fn sha256_hex(input: &str) -> String {
    hex::encode(Sha256::digest(input.as_bytes()))
}

/// Full lookup key id for an identity and its principals.
pub fn derive_id<S: AsRef<str>>(identity: &str, principals: &[S]) -> String {
    sha256_hex(&canonical_input(identity, principals))
}
