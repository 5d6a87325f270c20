//! Request and response bodies exchanged with the signing service.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cert_type::CertType;
use crate::lookup_key::LookupKey;
use crate::wire::duration_nanos;

/// Request for a signed SSH certificate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignRequest {
    /// `host` or `user`.
    pub certificate_type: CertType,

    /// Key identity to sign into the certificate.
    #[serde(rename = "certificate_identity")]
    pub identity: String,

    /// User or host names the certificate is valid for.
    #[serde(rename = "certificate_principals", default)]
    pub principals: Vec<String>,

    /// How long the signed certificate stays valid.
    #[serde(with = "duration_nanos")]
    pub validity_interval: Duration,

    /// Certificate options for user certificates (`permit-pty`, ...).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub user_key_options: Vec<String>,

    /// Public key to sign, in authorized_keys format (ed25519, rsa, ...).
    pub public_key: String,
}

impl SignRequest {
    /// Key the issued certificate will be stored under.
    pub fn lookup_key(&self) -> LookupKey {
        LookupKey::derive(&self.identity, &self.principals, self.certificate_type)
    }
}

/// Where the signing service stored the certificate it issued.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignResponse {
    pub certificate_type: CertType,

    /// Full lookup key of the certificate bundle.
    pub lookup_key: LookupKey,
}
