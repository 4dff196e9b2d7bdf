// S3 notification decoding
//
// Only the fields the filter reads are modelled; everything else in the
// notification (eventTime, userIdentity, ...) is ignored. Missing fields are
// reported per record when that record is reached, so records ahead of a
// broken one are still processed.

use ingestgate_core::{decode_object_key, IngestError, NotificationRecord};
use serde::Deserialize;

/// S3 notification document: `{"Records": [{"s3": {...}}, ...]}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct S3Event {
    #[serde(rename = "Records")]
    pub records: Vec<S3EventRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct S3EventRecord {
    #[serde(default)]
    pub s3: S3Entity,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct S3Entity {
    #[serde(default)]
    pub bucket: S3Bucket,
    #[serde(default)]
    pub object: S3Object,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct S3Bucket {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct S3Object {
    /// Form-encoded object key, as S3 sends it
    pub key: Option<String>,
    pub size: Option<i64>,
}

/// Lazily convert the records of an S3 event.
///
/// Each item is produced only when pulled, so a consumer that processes
/// records one by one sees a malformed record only after everything before
/// it has been handled.
pub fn records_from_event(
    event: &S3Event,
) -> impl Iterator<Item = Result<NotificationRecord, IngestError>> + Send + '_ {
    event
        .records
        .iter()
        .enumerate()
        .map(|(index, record)| notification_record(index, record))
}

fn notification_record(
    index: usize,
    record: &S3EventRecord,
) -> Result<NotificationRecord, IngestError> {
    let bucket = record
        .s3
        .bucket
        .name
        .as_deref()
        .filter(|name| !name.is_empty())
        .ok_or_else(|| IngestError::malformed(index, "s3.bucket.name"))?;

    let raw_key = record
        .s3
        .object
        .key
        .as_deref()
        .ok_or_else(|| IngestError::malformed(index, "s3.object.key"))?;

    let size = record
        .s3
        .object
        .size
        .and_then(|size| u64::try_from(size).ok())
        .ok_or_else(|| IngestError::malformed(index, "s3.object.size"))?;

    Ok(NotificationRecord::new(bucket, decode_object_key(raw_key), size))
}
