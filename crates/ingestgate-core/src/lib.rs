// ingestgate-core - Platform-agnostic upload filter
//
// Everything needed to turn one S3 notification batch into log lines and
// summary writes, minus the runtime:
// - record: the notification record and object-key decoding
// - policy: extension allow-list and size ceiling
// - outcome: the three-state outcome, the summary artifact, log emission
// - filter: the per-record pipeline (receive -> validate -> accept/reject)
// - storage: the write-only object store seam implemented by ingestgate-writer

pub mod error;
pub mod filter;
pub mod outcome;
pub mod policy;
pub mod record;
pub mod storage;

pub use error::IngestError;
pub use filter::{BatchReport, IngestionFilter, RecordReport};
pub use outcome::{RejectReason, Status, SummaryRecord, ValidationOutcome};
pub use policy::{
    file_extension, file_name, Accepted, FilterPolicy, DEFAULT_ALLOWED_EXTENSIONS,
    DEFAULT_MAX_SIZE_BYTES, DEFAULT_OUTPUT_PREFIX,
};
pub use record::{decode_object_key, NotificationRecord};
pub use storage::{ObjectStore, StoreError, SUMMARY_CONTENT_TYPE};
