//! Records stored in the bucket and typed load/save over a [`BlobStore`].
//!
//! Both record kinds compute their own object key from their fields; neither
//! stores or caches a lookup key.

use std::collections::BTreeMap;
use std::time::Duration;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cert_type::CertType;
use crate::error::{ProtocolError, ProtocolResult};
use crate::layout::{ca_pubkey_key, ca_pubkeys_prefix, signed_cert_key};
use crate::lookup_key::LookupKey;
use crate::store::BlobStore;
use crate::wire::{base64_bytes, duration_nanos};

/// A record with a deterministic place in the bucket.
pub trait StoredObject: Serialize + DeserializeOwned {
    /// Full object key under `prefix`.
    fn object_key(&self, prefix: &str) -> String;
}

/// Everything saved for one signed SSH certificate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignedCertificate {
    /// Type of SSH certificate.
    pub certificate_type: CertType,

    /// When the certificate was minted.
    pub issued_on: DateTime<Utc>,

    /// Identity the certificate was requested for.
    pub identity: String,

    /// Principals as requested, in request order.
    #[serde(rename = "certificate_principals", default)]
    pub principals: Vec<String>,

    /// How long the certificate is valid for.
    #[serde(with = "duration_nanos")]
    pub validity_interval: Duration,

    /// The marshaled certificate.
    #[serde(rename = "signed_certificate", with = "base64_bytes")]
    pub raw_signed_certificate: Vec<u8>,

    /// Object key of the opposite CA's public key.
    #[serde(default)]
    pub opposite_public_ca: String,

    /// Encryption parameters for `signed_certificate`, when it is encrypted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signed_certificate_encryption: Option<BTreeMap<String, String>>,
}

impl SignedCertificate {
    /// Lookup key derived from identity, principals and type.
    pub fn lookup_key(&self) -> LookupKey {
        LookupKey::derive(&self.identity, &self.principals, self.certificate_type)
    }

    /// The CA type whose public key holders of this certificate need.
    pub fn opposite_ca_type(&self) -> Option<CertType> {
        self.certificate_type.opposite_ca()
    }

    /// When the certificate stops being valid.
    pub fn expires_on(&self) -> Option<DateTime<Utc>> {
        let validity = chrono::Duration::from_std(self.validity_interval).ok()?;
        self.issued_on.checked_add_signed(validity)
    }
}

impl StoredObject for SignedCertificate {
    /// `{prefix}Signed-Certs/{lookup_key}.json`
    fn object_key(&self, prefix: &str) -> String {
        signed_cert_key(prefix, &self.lookup_key())
    }
}

/// Public half of a certificate authority.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaPublicKey {
    /// Which CA this is.
    pub certificate_type: CertType,

    /// Public key in authorized_keys format.
    #[serde(with = "base64_bytes")]
    pub authorized_key: Vec<u8>,

    /// `"{algo}:{digest}"`, e.g. `SHA256:...`.
    #[serde(
        rename = "fingerprint",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub key_fingerprint: Option<String>,

    /// Domain (or subdomain) a host CA may sign for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_cert_auth_domain: Option<String>,
}

impl StoredObject for CaPublicKey {
    /// `{prefix}CA-Pubkeys/{type}[-{domain}][-{digest}].json`
    fn object_key(&self, prefix: &str) -> String {
        ca_pubkey_key(
            prefix,
            self.certificate_type,
            self.host_cert_auth_domain.as_deref(),
            self.key_fingerprint.as_deref(),
        )
    }
}

/// Load and decode the object at `key`.
pub async fn load_object<T: StoredObject>(
    store: &dyn BlobStore,
    bucket: &str,
    key: &str,
) -> ProtocolResult<T> {
    debug!(bucket, key, "loading object");
    let body = store.get(bucket, key).await?;
    serde_json::from_slice(&body).map_err(|source| ProtocolError::DecodeFailure {
        key: key.to_string(),
        source,
    })
}

/// Encode `object` and write it at its object key. Returns the key.
pub async fn save_object<T: StoredObject>(
    store: &dyn BlobStore,
    bucket: &str,
    prefix: &str,
    object: &T,
) -> ProtocolResult<String> {
    let key = object.object_key(prefix);
    let body = serde_json::to_vec_pretty(object).map_err(|source| ProtocolError::EncodeFailure {
        key: key.clone(),
        source,
    })?;

    debug!(bucket, key = %key, bytes = body.len(), "saving object");
    store.put(bucket, &key, Bytes::from(body)).await?;
    Ok(key)
}

/// Expand a (possibly partial) key and load the certificate it names.
pub async fn fetch_certificate(
    store: &dyn BlobStore,
    bucket: &str,
    prefix: &str,
    key: &LookupKey,
) -> ProtocolResult<(LookupKey, SignedCertificate)> {
    let full = key.expand(store, bucket, prefix).await?;
    let cert = load_object(store, bucket, &signed_cert_key(prefix, &full)).await?;
    Ok((full, cert))
}

/// Keys of every CA public key object under `prefix`.
pub async fn list_ca_pubkeys(
    store: &dyn BlobStore,
    bucket: &str,
    prefix: &str,
) -> ProtocolResult<Vec<String>> {
    let query = ca_pubkeys_prefix(prefix);
    debug!(bucket, query = %query, "listing CA public keys");
    store
        .list_by_prefix(bucket, &query)
        .await
        .map_err(ProtocolError::StoreUnavailable)
}
