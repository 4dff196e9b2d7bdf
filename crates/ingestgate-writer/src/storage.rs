//! OpenDAL-backed object store
//!
//! OpenDAL operators are bound to a single bucket, while notifications can
//! name any bucket the function is subscribed to. Operators are therefore
//! built lazily per bucket and kept for the life of the process.

use crate::error::{Result, WriterError};
use async_trait::async_trait;
use ingestgate_config::{StorageBackend, StorageConfig};
use ingestgate_core::{ObjectStore, StoreError};
use opendal::Operator;
use parking_lot::Mutex;
use std::collections::HashMap;

#[derive(Debug, Clone)]
enum Backend {
    S3 {
        region: String,
        endpoint: Option<String>,
    },
    Fs {
        root: String,
    },
    Memory,
}

impl Backend {
    fn name(&self) -> &'static str {
        match self {
            Backend::S3 { .. } => "s3",
            Backend::Fs { .. } => "fs",
            Backend::Memory => "memory",
        }
    }
}

pub struct OpendalStore {
    backend: Backend,
    operators: Mutex<HashMap<String, Operator>>,
}

impl OpendalStore {
    /// Build a store from the validated storage section of the runtime config.
    pub fn from_config(config: &StorageConfig) -> Result<Self> {
        let backend = match config.backend {
            StorageBackend::S3 => {
                let s3 = config.s3.as_ref().ok_or_else(|| {
                    WriterError::invalid_config("s3 config required for S3 backend")
                })?;
                Backend::S3 {
                    region: s3.region.clone(),
                    endpoint: s3.endpoint.clone(),
                }
            }
            StorageBackend::Fs => {
                let fs = config.fs.as_ref().ok_or_else(|| {
                    WriterError::invalid_config("fs config required for filesystem backend")
                })?;
                Backend::Fs {
                    root: fs.path.clone(),
                }
            }
            StorageBackend::Memory => Backend::Memory,
        };

        tracing::debug!(backend = backend.name(), "Object store configured");
        Ok(Self::with_backend(backend))
    }

    pub fn memory() -> Self {
        Self::with_backend(Backend::Memory)
    }

    fn with_backend(backend: Backend) -> Self {
        Self {
            backend,
            operators: Mutex::new(HashMap::new()),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Operator for `bucket`, built on first use.
    pub fn operator(&self, bucket: &str) -> Result<Operator> {
        if bucket.is_empty() {
            return Err(WriterError::invalid_config("bucket name must not be empty"));
        }

        let mut operators = self.operators.lock();
        if let Some(op) = operators.get(bucket) {
            return Ok(op.clone());
        }

        let op = self.build_operator(bucket)?;
        tracing::debug!(backend = self.backend.name(), bucket, "Storage operator initialized");
        operators.insert(bucket.to_string(), op.clone());
        Ok(op)
    }

    fn build_operator(&self, bucket: &str) -> Result<Operator> {
        let name = self.backend.name();
        let op = match &self.backend {
            Backend::S3 { region, endpoint } => {
                let mut builder = opendal::services::S3::default()
                    .bucket(bucket)
                    .region(region);
                if let Some(endpoint) = endpoint {
                    builder = builder.endpoint(endpoint);
                }
                Operator::new(builder)
                    .map_err(|e| WriterError::operator_init(name, bucket, e))?
                    .finish()
            }
            Backend::Fs { root } => {
                let root = format!("{}/{}", root.trim_end_matches('/'), bucket);
                let builder = opendal::services::Fs::default().root(&root);
                Operator::new(builder)
                    .map_err(|e| WriterError::operator_init(name, bucket, e))?
                    .finish()
            }
            Backend::Memory => Operator::new(opendal::services::Memory::default())
                .map_err(|e| WriterError::operator_init(name, bucket, e))?
                .finish(),
        };
        Ok(op)
    }

    /// Read an object back. The filter never does this; it exists for the
    /// local runner and tests.
    pub async fn read(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        let op = self.operator(bucket)?;
        let buffer = op
            .read(key)
            .await
            .map_err(|e| WriterError::read_failure(bucket, key, e))?;
        Ok(buffer.to_vec())
    }

    fn store_error(
        &self,
        operation: &'static str,
        bucket: &str,
        key: &str,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> StoreError {
        StoreError {
            backend: self.backend.name(),
            operation,
            bucket: bucket.to_string(),
            key: key.to_string(),
            source: Box::new(source),
        }
    }
}

#[async_trait]
impl ObjectStore for OpendalStore {
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> std::result::Result<(), StoreError> {
        let op = self
            .operator(bucket)
            .map_err(|e| self.store_error("open", bucket, key, e))?;

        let size = body.len();
        // fs and memory have nowhere to keep a content type
        let result = if op.info().full_capability().write_with_content_type {
            op.write_with(key, body)
                .content_type(content_type)
                .await
                .map(|_| ())
        } else {
            op.write(key, body).await.map(|_| ())
        };
        result.map_err(|e| self.store_error("write", bucket, key, e))?;

        tracing::debug!(
            backend = self.backend.name(),
            bucket,
            key,
            size,
            "Wrote object"
        );
        Ok(())
    }
}
