//! Object storage for ingestgate
//!
//! Implements the core `ObjectStore` seam on top of OpenDAL so the same
//! filter can write to S3 in Lambda, to a local directory during
//! development, or to memory in tests.

mod error;
mod storage;

pub use error::{Result, WriterError};
pub use storage::OpendalStore;
