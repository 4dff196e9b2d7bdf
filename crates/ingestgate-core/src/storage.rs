// Storage seam for writing summary records
//
// Implementations:
// - OpendalStore (ingestgate-writer): S3, local filesystem, in-memory
//
// The filter only ever writes; it never reads back what it stored.

use async_trait::async_trait;
use thiserror::Error;

/// Content type attached to every summary write.
pub const SUMMARY_CONTENT_TYPE: &str = "application/json";

/// A failed storage call, tagged with the backend that produced it.
#[derive(Debug, Error)]
#[error("{backend} {operation} failed for '{bucket}/{key}': {source}")]
pub struct StoreError {
    pub backend: &'static str,
    pub operation: &'static str,
    pub bucket: String,
    pub key: String,
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync>,
}

/// Write-only object store, addressed by bucket and key.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `body` at `bucket/key`, replacing any existing object.
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StoreError>;
}
