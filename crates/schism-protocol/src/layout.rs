//! Object key layout inside a bucket.
//!
//! # Key Schema
//!
//! ```text
//! {prefix}Signed-Certs/{type}:{id}.json                          # signed certificate
//! {prefix}CA-Pubkeys/{type}.json                                 # CA public key
//! {prefix}CA-Pubkeys/{type}-{auth_domain}.json
//! {prefix}CA-Pubkeys/{type}-{fingerprint_digest}.json
//! {prefix}CA-Pubkeys/{type}-{auth_domain}-{fingerprint_digest}.json
//! ```
//!
//! The prefix is used exactly as given; callers include any trailing `/`.
//! The last segment of a certificate key, minus `.json`, is the lookup key
//! itself, which is what makes prefix expansion possible.

use crate::cert_type::CertType;
use crate::lookup_key::LookupKey;

/// Sub-prefix for signed certificates.
pub const SIGNED_CERTS_PREFIX: &str = "Signed-Certs/";

/// Sub-prefix for CA public keys.
pub const CA_PUBKEYS_PREFIX: &str = "CA-Pubkeys/";

/// Extension of every stored object.
pub const OBJECT_EXTENSION: &str = ".json";

/// Key of the signed certificate stored under a full lookup key.
///
/// Returns: `{prefix}Signed-Certs/{type}:{id}.json`
pub fn signed_cert_key(prefix: &str, key: &LookupKey) -> String {
    format!("{}{}{}{}", prefix, SIGNED_CERTS_PREFIX, key, OBJECT_EXTENSION)
}

/// Listing prefix for certificates of one type whose id starts with `id`.
///
/// Returns: `{prefix}Signed-Certs/{type}:{id}`
pub fn cert_query_prefix(prefix: &str, cert_type: CertType, id: &str) -> String {
    format!(
        "{}{}{}{}{}",
        prefix,
        SIGNED_CERTS_PREFIX,
        cert_type,
        LookupKey::SEPARATOR,
        id
    )
}

/// Listing prefix for all CA public keys.
///
/// Returns: `{prefix}CA-Pubkeys/`
pub fn ca_pubkeys_prefix(prefix: &str) -> String {
    format!("{}{}", prefix, CA_PUBKEYS_PREFIX)
}

/// Key of a CA public key.
///
/// Empty strings count as absent. The fingerprint is `"{algo}:{digest}"` and
/// only the digest goes into the key; a value without `:` is used whole.
pub fn ca_pubkey_key(
    prefix: &str,
    cert_type: CertType,
    auth_domain: Option<&str>,
    fingerprint: Option<&str>,
) -> String {
    let mut sub_key = cert_type.as_str().to_string();

    if let Some(domain) = auth_domain.filter(|d| !d.is_empty()) {
        sub_key.push('-');
        sub_key.push_str(&sanitize_segment(domain));
    }

    if let Some(fingerprint) = fingerprint.filter(|f| !f.is_empty()) {
        let digest = fingerprint
            .split_once(':')
            .map_or(fingerprint, |(_, digest)| digest);
        sub_key.push('-');
        sub_key.push_str(&sanitize_segment(digest));
    }

    format!("{}{}{}{}", prefix, CA_PUBKEYS_PREFIX, sub_key, OBJECT_EXTENSION)
}

/// Last path segment of `key` with everything from the first `.` removed.
///
/// Input: `p/Signed-Certs/host:55e8....json`
/// Output: `host:55e8...`
pub fn key_stem(key: &str) -> &str {
    let name = key.rsplit('/').next().unwrap_or(key);
    name.split('.').next().unwrap_or(name)
}

/// Make a value safe as part of a single key segment.
///
/// SSH fingerprints are standard base64 and may contain `/` and `+`; those
/// take their base64url replacements. Other unusual characters become `_`.
fn sanitize_segment(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            c if c.is_ascii_alphanumeric() => c,
            '-' | '_' | '.' | ':' | ',' | '=' | '@' => c,
            _ => '_',
        })
        .collect()
}
