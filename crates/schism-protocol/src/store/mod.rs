//! Blob store abstraction for certificate and CA public key objects.
//!
//! The protocol only needs three operations from a store: put, get and
//! list-by-prefix. [`BlobStore`] captures exactly that, so expansion and record
//! loading can run against S3, a local directory, an in-memory store, or a
//! test fake without knowing which.
//!
//! # Store URLs
//!
//! ```text
//! s3://schism-certs/prod?region=us-west-2   # bucket "schism-certs", prefix "prod/"
//! file:///var/lib/schism                    # bucket "local", rooted at /var/lib/schism
//! memory://schism-test                      # bucket "schism-test" (tests)
//! ```
//!
//! Listings are assumed to be strongly consistent with prior writes. Nothing
//! in this crate retries or waits for an eventually-consistent store.

pub mod error;
pub mod object_store_backend;

use async_trait::async_trait;
use bytes::Bytes;

pub use error::{StoreError, StoreResult};
pub use object_store_backend::ObjectStoreBlobStore;

/// Environment variable holding the store URL.
pub const STORE_URL_ENV: &str = "SCHISM_STORE_URL";

/// Bucket name used for `file://` stores, which have no bucket of their own.
pub const LOCAL_BUCKET: &str = "local";

/// Parsed store specification from CLI/config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSpec {
    /// The scheme (s3, file, memory)
    pub scheme: String,
    /// Bucket name (empty for file://)
    pub bucket: Option<String>,
    /// Base prefix/path within the bucket, without leading slash
    pub prefix: String,
    /// Optional region (for S3)
    pub region: Option<String>,
}

impl StoreSpec {
    /// Parse a store URL like `s3://bucket/prefix` or `file:///path`.
    pub fn parse(url: &str) -> StoreResult<Self> {
        let url = url::Url::parse(url).map_err(|e| StoreError::InvalidSpec {
            spec: url.to_string(),
            reason: e.to_string(),
        })?;

        let scheme = url.scheme().to_string();
        let bucket = url
            .host_str()
            .filter(|host| !host.is_empty())
            .map(|s| s.to_string());
        let prefix = url.path().trim_start_matches('/').to_string();

        let region = url
            .query_pairs()
            .find(|(k, _)| k == "region")
            .map(|(_, v)| v.to_string());

        Ok(Self {
            scheme,
            bucket,
            prefix,
            region,
        })
    }

    /// Read the store URL from `SCHISM_STORE_URL`.
    pub fn from_env() -> StoreResult<Self> {
        let url = std::env::var(STORE_URL_ENV).map_err(|_| StoreError::NotConfigured {
            message: format!("{} is not set", STORE_URL_ENV),
        })?;
        Self::parse(&url)
    }

    /// Check if this is a memory store (for testing).
    pub fn is_memory(&self) -> bool {
        self.scheme == "memory"
    }

    /// Check if this is a local file store.
    pub fn is_file(&self) -> bool {
        self.scheme == "file"
    }

    /// Bucket name to pass to [`BlobStore`] calls.
    pub fn bucket_name(&self) -> &str {
        self.bucket.as_deref().unwrap_or(LOCAL_BUCKET)
    }

    /// Prefix prepended to every object key, ending in `/` unless empty.
    ///
    /// For `file://` stores the path is the store root, so keys carry no prefix.
    /// Empty segments (`a//b`) are dropped, matching how stored keys are
    /// normalized.
    pub fn key_prefix(&self) -> String {
        if self.is_file() {
            return String::new();
        }
        let segments: Vec<&str> = self
            .prefix
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect();
        if segments.is_empty() {
            String::new()
        } else {
            format!("{}/", segments.join("/"))
        }
    }
}

/// Minimal capability a blob store must offer.
///
/// Keys are plain strings; `list_by_prefix` has string-prefix semantics (not
/// path-segment semantics) and returns keys in ascending order.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Write an object, replacing any existing one.
    async fn put(&self, bucket: &str, key: &str, bytes: Bytes) -> StoreResult<()>;

    /// Read an object.
    ///
    /// Returns `Err(StoreError::NotFound)` if the key doesn't exist.
    async fn get(&self, bucket: &str, key: &str) -> StoreResult<Bytes>;

    /// List every key in `bucket` starting with `prefix`.
    async fn list_by_prefix(&self, bucket: &str, prefix: &str) -> StoreResult<Vec<String>>;
}
