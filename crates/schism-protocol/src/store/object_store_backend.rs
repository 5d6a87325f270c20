//! Object store implementation of BlobStore.
//!
//! Supports S3, local filesystem and in-memory stores via the `object_store` crate.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use futures::TryStreamExt;
use object_store::path::Path;
use object_store::{GetOptions, ObjectStore, PutOptions, PutPayload};

use super::{BlobStore, StoreError, StoreResult, StoreSpec};

/// Blob store backed by `object_store`.
///
/// An `ObjectStore` handle is bound to a single bucket, so this keeps one
/// handle per bucket name. Calls naming any other bucket fail with
/// [`StoreError::NoSuchBucket`].
#[derive(Default)]
pub struct ObjectStoreBlobStore {
    buckets: HashMap<String, Arc<dyn ObjectStore>>,
}

impl ObjectStoreBlobStore {
    /// Create a store with no buckets attached.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach an `ObjectStore` under a bucket name.
    pub fn with_bucket(mut self, bucket: impl Into<String>, inner: Arc<dyn ObjectStore>) -> Self {
        self.buckets.insert(bucket.into(), inner);
        self
    }

    /// Create an in-memory store with one bucket, for testing.
    pub fn memory(bucket: impl Into<String>) -> Self {
        Self::new().with_bucket(bucket, Arc::new(object_store::memory::InMemory::new()))
    }

    /// Create a store from a parsed spec.
    pub async fn from_spec(spec: &StoreSpec) -> StoreResult<Self> {
        let inner: Arc<dyn ObjectStore> = match spec.scheme.as_str() {
            "memory" => Arc::new(object_store::memory::InMemory::new()),
            "file" => {
                let path = if spec.prefix.is_empty() {
                    "/var/lib/schism".to_string()
                } else {
                    format!("/{}", spec.prefix)
                };
                std::fs::create_dir_all(&path).map_err(|e| StoreError::Io {
                    message: format!("failed to create store directory {}: {}", path, e),
                })?;
                Arc::new(
                    object_store::local::LocalFileSystem::new_with_prefix(&path).map_err(|e| {
                        StoreError::Io {
                            message: format!("failed to create local store at {}: {}", path, e),
                        }
                    })?,
                )
            }
            "s3" => {
                let bucket = spec
                    .bucket
                    .as_ref()
                    .ok_or_else(|| StoreError::InvalidSpec {
                        spec: format!("s3:///{}", spec.prefix),
                        reason: "S3 URL must include bucket name".to_string(),
                    })?;

                let mut builder = object_store::aws::AmazonS3Builder::from_env()
                    .with_bucket_name(bucket)
                    .with_allow_http(false);

                if let Some(region) = &spec.region {
                    builder = builder.with_region(region);
                }

                Arc::new(builder.build().map_err(|e| StoreError::Io {
                    message: format!("failed to create S3 client: {}", e),
                })?)
            }
            scheme => {
                return Err(StoreError::InvalidSpec {
                    spec: spec.scheme.clone(),
                    reason: format!("unsupported scheme: {}", scheme),
                })
            }
        };

        Ok(Self::new().with_bucket(spec.bucket_name(), inner))
    }

    /// Create a store from a URL string.
    pub async fn from_url(url: &str) -> StoreResult<Self> {
        let spec = StoreSpec::parse(url)?;
        Self::from_spec(&spec).await
    }

    fn bucket(&self, bucket: &str) -> StoreResult<&Arc<dyn ObjectStore>> {
        self.buckets
            .get(bucket)
            .ok_or_else(|| StoreError::NoSuchBucket {
                bucket: bucket.to_string(),
            })
    }
}

#[async_trait]
impl BlobStore for ObjectStoreBlobStore {
    async fn put(&self, bucket: &str, key: &str, bytes: Bytes) -> StoreResult<()> {
        let inner = self.bucket(bucket)?;
        inner
            .put_opts(
                &Path::from(key),
                PutPayload::from_bytes(bytes),
                PutOptions::default(),
            )
            .await
            .map_err(|e| StoreError::Io {
                message: format!("failed to put object {}: {}", key, e),
            })?;
        Ok(())
    }

    async fn get(&self, bucket: &str, key: &str) -> StoreResult<Bytes> {
        let inner = self.bucket(bucket)?;

        let result = inner
            .get_opts(&Path::from(key), GetOptions::default())
            .await
            .map_err(|e| match e {
                object_store::Error::NotFound { .. } => StoreError::NotFound {
                    key: key.to_string(),
                },
                _ => StoreError::Io {
                    message: format!("failed to get object {}: {}", key, e),
                },
            })?;

        result.bytes().await.map_err(|e| StoreError::Io {
            message: format!("failed to read object bytes: {}", e),
        })
    }

    /// Lists recursively under the last complete segment of `prefix` and
    /// filters the rest client-side. For a certificate query that is every
    /// object under `{prefix}Signed-Certs/`, of both types, so the cost grows
    /// with the total number of certificates in the bucket.
    async fn list_by_prefix(&self, bucket: &str, prefix: &str) -> StoreResult<Vec<String>> {
        let inner = self.bucket(bucket)?;

        // object_store lists whole path segments, so list the parent of the
        // prefix and filter on the full string here.
        let prefix = normalize_prefix(prefix);
        let prefix = prefix.as_str();
        let parent = prefix.rsplit_once('/').map(|(dir, _)| Path::from(dir));

        let list = inner.list(parent.as_ref());
        let entries: Vec<_> = list.try_collect().await.map_err(|e| StoreError::Io {
            message: format!("failed to list objects under {}: {}", prefix, e),
        })?;

        let mut keys: Vec<String> = entries
            .iter()
            .map(|entry| entry.location.as_ref().to_string())
            .filter(|key| key.starts_with(prefix))
            .collect();
        keys.sort();

        Ok(keys)
    }
}

/// Collapse empty segments the way `Path::from` does for stored keys.
///
/// The trailing partial segment (or trailing `/`) is kept as given, so
/// `p//Signed-Certs/host:55` becomes `p/Signed-Certs/host:55`.
fn normalize_prefix(prefix: &str) -> String {
    let Some((dirs, partial)) = prefix.rsplit_once('/') else {
        return prefix.to_string();
    };

    let mut normalized = dirs
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/");
    if !normalized.is_empty() {
        normalized.push('/');
    }
    normalized.push_str(partial);
    normalized
}
