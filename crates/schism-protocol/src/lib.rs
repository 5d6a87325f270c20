//! Shared data-and-key layer of the Schism SSH certificate authority.
//!
//! This crate names and locates certificates and CA public keys in a blob
//! store:
//!
//! - Lookup keys: `<type>:<sha256(identity, sorted principals)>`
//! - Partial-key expansion against the store, rejecting ambiguous matches
//! - Object key layout under `Signed-Certs/` and `CA-Pubkeys/`
//! - Stored records and signing payloads in their JSON wire format
//!
//! # Quick Start
//!
//! ```no_run
//! use schism_protocol::{fetch_certificate, LookupKey, ObjectStoreBlobStore, StoreSpec};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let spec = StoreSpec::parse("s3://schism-certs/prod")?;
//! let store = ObjectStoreBlobStore::from_spec(&spec).await?;
//!
//! let partial: LookupKey = "h:55e8".parse()?;
//! let (full, cert) =
//!     fetch_certificate(&store, spec.bucket_name(), &spec.key_prefix(), &partial).await?;
//! println!("{} -> {}", full, cert.identity);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! | Environment Variable | Description |
//! |---------------------|-------------|
//! | `SCHISM_STORE_URL` | Store URL (`s3://bucket/prefix`, `file:///path`, `memory://bucket`) |
//! | `AWS_*` | Credentials and region for `s3://` stores |

pub mod canonical;
pub mod cert_type;
pub mod error;
pub mod expand;
pub mod layout;
pub mod lookup_key;
pub mod payload;
pub mod records;
pub mod store;
mod wire;

// Re-export main types
pub use cert_type::{CertType, CertTypeTag};
pub use error::{ProtocolError, ProtocolResult};
pub use lookup_key::LookupKey;
pub use payload::{SignRequest, SignResponse};
pub use records::{
    fetch_certificate, list_ca_pubkeys, load_object, save_object, CaPublicKey, SignedCertificate,
    StoredObject,
};
pub use store::{BlobStore, ObjectStoreBlobStore, StoreError, StoreResult, StoreSpec};

// Re-export bytes for callers implementing BlobStore
pub use bytes::Bytes;
