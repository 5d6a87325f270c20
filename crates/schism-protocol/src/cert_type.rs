//! Certificate types and the textual tags that name them.
//!
//! Schism issues two kinds of SSH certificates, `host` and `user`, and uses a
//! third tag, `cakp`, for CA keypair metadata. Users may type the one-letter
//! forms `h`, `u` and `c`; those must be expanded before they reach a storage
//! path.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A certificate type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CertType {
    /// Authenticates server hosts to users.
    Host,
    /// Authenticates users to servers.
    User,
    /// CA keypair metadata (`cakp`), not a certificate.
    CaKeyPair,
    /// Tag that names none of the above.
    Unknown,
}

impl CertType {
    /// Resolve a tag, long or short form, to a certificate type.
    ///
    /// `h`/`host`, `u`/`user` and `c`/`cakp` map to their type; anything
    /// else is [`CertType::Unknown`].
    pub fn expand(tag: &str) -> Self {
        match tag {
            "h" | "host" => Self::Host,
            "u" | "user" => Self::User,
            "c" | "cakp" => Self::CaKeyPair,
            _ => Self::Unknown,
        }
    }

    /// The CA whose public half verifies certificates of the other kind.
    ///
    /// Hosts need the user CA to accept user certificates and users need the
    /// host CA to trust host certificates.
    pub fn opposite_ca(self) -> Option<Self> {
        match self {
            Self::Host => Some(Self::User),
            Self::User => Some(Self::Host),
            Self::CaKeyPair | Self::Unknown => None,
        }
    }

    /// Canonical long form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Host => "host",
            Self::User => "user",
            Self::CaKeyPair => "cakp",
            Self::Unknown => "unknown",
        }
    }

    /// One-letter form accepted on input.
    pub fn short(self) -> Option<char> {
        match self {
            Self::Host => Some('h'),
            Self::User => Some('u'),
            Self::CaKeyPair => Some('c'),
            Self::Unknown => None,
        }
    }

    pub fn is_known(self) -> bool {
        self != Self::Unknown
    }
}

impl fmt::Display for CertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CertType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CertType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(Self::expand(&tag))
    }
}

/// Certificate type tag exactly as written in a lookup key.
///
/// Parsing keeps user input verbatim (`h:55e8` stays `h`), so a key renders
/// back the way it was typed. Call [`CertTypeTag::expand`] before using the
/// tag in a storage path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CertTypeTag(String);

impl CertTypeTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn expand(&self) -> CertType {
        CertType::expand(&self.0)
    }
}

impl From<CertType> for CertTypeTag {
    fn from(cert_type: CertType) -> Self {
        Self(cert_type.as_str().to_string())
    }
}

impl fmt::Display for CertTypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
