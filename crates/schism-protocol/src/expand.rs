//! Partial-key expansion.
//!
//! A user-typed key such as `h:55e8` is resolved by listing
//! `{prefix}Signed-Certs/host:55e8` in the store. Exactly one hit is
//! required: zero hits and several hits are both errors, and the first hit is
//! never picked silently. The lookup is scoped to the key's certificate type,
//! so a host prefix can never resolve to a user certificate.

use tracing::debug;

use crate::cert_type::CertType;
use crate::error::{ProtocolError, ProtocolResult};
use crate::layout::{cert_query_prefix, key_stem};
use crate::lookup_key::LookupKey;
use crate::store::BlobStore;

/// Resolve `key` to the single full key stored under its type.
///
/// Steps:
/// 1. Expand the type tag (`h` → `host`); unknown tags fail before any store call.
/// 2. List `{prefix}Signed-Certs/{type}:{id}`.
/// 3. Require exactly one match and parse the last segment of its key,
///    minus extension, as a lookup key of the same type.
///
/// Already-full keys go through the same lookup, which confirms they exist.
pub async fn expand(
    key: &LookupKey,
    store: &dyn BlobStore,
    bucket: &str,
    prefix: &str,
) -> ProtocolResult<LookupKey> {
    let cert_type = key.cert_type().expand();
    if !cert_type.is_known() {
        return Err(ProtocolError::malformed(
            key.to_string(),
            format!("unknown certificate type '{}'", key.cert_type()),
        ));
    }

    let query = cert_query_prefix(prefix, cert_type, key.id());
    debug!(key = %key, bucket, query = %query, "expanding lookup key");

    let mut matches = store
        .list_by_prefix(bucket, &query)
        .await
        .map_err(ProtocolError::StoreUnavailable)?;

    match matches.len() {
        0 => Err(ProtocolError::NoMatch {
            key: key.to_string(),
        }),
        1 => {
            let stored = matches.remove(0);
            let full = parse_stored_key(&stored, cert_type)?;
            debug!(key = %key, full = %full, "expanded lookup key");
            Ok(full)
        }
        _ => Err(ProtocolError::AmbiguousKey {
            key: key.to_string(),
            matches,
        }),
    }
}

fn parse_stored_key(stored: &str, expected: CertType) -> ProtocolResult<LookupKey> {
    let full = LookupKey::parse(key_stem(stored)).map_err(|e| {
        ProtocolError::MalformedStoredKey {
            key: stored.to_string(),
            reason: e.to_string(),
        }
    })?;

    let found = full.cert_type().expand();
    if found != expected {
        return Err(ProtocolError::MalformedStoredKey {
            key: stored.to_string(),
            reason: format!("expected a {} key, found '{}'", expected, full.cert_type()),
        });
    }

    Ok(LookupKey::new(found, full.id()))
}
