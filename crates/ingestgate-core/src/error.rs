//! Fatal errors for an invocation
//!
//! Rejections are not errors; see [`crate::RejectReason`]. Anything here
//! aborts the remaining records and fails the invocation.

use crate::storage::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    /// A notification record is missing a required field or carries an
    /// unusable value.
    #[error("notification record {index}: missing or invalid field '{field}'")]
    MalformedRecord { index: usize, field: &'static str },

    #[error("failed to encode summary for '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IngestError {
    pub fn malformed(index: usize, field: &'static str) -> Self {
        Self::MalformedRecord { index, field }
    }
}
