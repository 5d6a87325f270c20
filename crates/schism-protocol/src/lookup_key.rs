//! Content-addressed lookup keys.
//!
//! A lookup key names a signed certificate: `<type>:<id>`, where `id` is the
//! 64-character hex SHA-256 of the certificate's identity and principals.
//! Users may type any prefix of the id (`h:55e8`); such partial keys are
//! valid values but must be expanded against the store before use.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::canonical::{derive_id, FULL_ID_LEN};
use crate::cert_type::{CertType, CertTypeTag};
use crate::error::{ProtocolError, ProtocolResult};
use crate::expand;
use crate::store::BlobStore;

/// Type tag plus (possibly partial) content hash.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LookupKey {
    cert_type: CertTypeTag,
    id: String,
}

impl LookupKey {
    /// Separator between type and id. Never appears inside either part.
    pub const SEPARATOR: char = ':';

    /// Build a key from its parts without validation.
    pub fn new(cert_type: impl Into<CertTypeTag>, id: impl Into<String>) -> Self {
        Self {
            cert_type: cert_type.into(),
            id: id.into(),
        }
    }

    /// Derive the full key for an identity and its principals.
    ///
    /// Principal order does not matter. An empty principal list is allowed.
    ///
    /// # Example
    ///
    /// ```
    /// use schism_protocol::{CertType, LookupKey};
    ///
    /// let key = LookupKey::derive("test.example.com", &["test.example.com"], CertType::Host);
    /// assert_eq!(
    ///     key.to_string(),
    ///     "host:55e8182ec4413d51676d1ba7480708a48c5b50f4a86b3afb9be6c43c648b373d"
    /// );
    /// ```
    pub fn derive<S: AsRef<str>>(identity: &str, principals: &[S], cert_type: CertType) -> Self {
        Self::new(cert_type, derive_id(identity, principals))
    }

    /// Parse `<type>:<id>`.
    ///
    /// Splits on the first separator. Both parts are kept verbatim: the type
    /// is not expanded and the id length is not checked, so `h:55e8` parses.
    pub fn parse(raw: &str) -> ProtocolResult<Self> {
        let (cert_type, id) = raw
            .split_once(Self::SEPARATOR)
            .ok_or_else(|| ProtocolError::malformed(raw, "missing ':' separator"))?;

        if cert_type.is_empty() {
            return Err(ProtocolError::malformed(raw, "empty certificate type"));
        }
        if id.is_empty() {
            return Err(ProtocolError::malformed(raw, "empty id"));
        }

        Ok(Self::new(CertTypeTag::new(cert_type), id))
    }

    /// Parse a key from raw bytes.
    pub fn from_slice(bytes: &[u8]) -> ProtocolResult<Self> {
        let raw = std::str::from_utf8(bytes).map_err(|e| {
            ProtocolError::malformed(String::from_utf8_lossy(bytes), e.to_string())
        })?;
        Self::parse(raw)
    }

    /// UTF-8 bytes of the wire form.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_string().into_bytes()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn cert_type(&self) -> &CertTypeTag {
        &self.cert_type
    }

    /// Whether the id is shorter than a full digest.
    pub fn is_partial(&self) -> bool {
        self.id.len() < FULL_ID_LEN
    }

    /// Resolve this key to the single full key stored under its type.
    ///
    /// Returns a new key; `self` is never modified. See [`expand::expand`].
    pub async fn expand(
        &self,
        store: &dyn BlobStore,
        bucket: &str,
        prefix: &str,
    ) -> ProtocolResult<LookupKey> {
        expand::expand(self, store, bucket, prefix).await
    }
}

impl fmt::Display for LookupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.cert_type, Self::SEPARATOR, self.id)
    }
}

impl FromStr for LookupKey {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for LookupKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for LookupKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
