// End-to-end tests for the Lambda adapter
//
// Real S3 notification payloads go through event decoding, the filter and
// an in-memory OpenDAL store.

use ingestgate_core::{
    FilterPolicy, IngestError, IngestionFilter, NotificationRecord, Status, SummaryRecord,
};
use ingestgate_lambda::{handle_notification, records_from_event, S3Event};
use ingestgate_writer::OpendalStore;
use serde_json::Value;
use std::sync::Arc;

const PUT_BATCH: &str = include_str!("fixtures/s3_put_batch.json");
const REQUEST_ID: &str = "c6af9ac6-7b61-11e6-9a41-93e8deadbeef";

fn fixture() -> Value {
    serde_json::from_str(PUT_BATCH).unwrap()
}

fn event_from(value: Value) -> S3Event {
    serde_json::from_value(value).unwrap()
}

fn decode_all(event: &S3Event) -> Result<Vec<NotificationRecord>, IngestError> {
    records_from_event(event).collect()
}

fn memory_filter() -> (IngestionFilter, Arc<OpendalStore>) {
    let store = Arc::new(OpendalStore::memory());
    let filter = IngestionFilter::new(FilterPolicy::default(), store.clone());
    (filter, store)
}

#[test]
fn decodes_keys_and_sizes() {
    let records = decode_all(&event_from(fixture())).unwrap();

    assert_eq!(records.len(), 4);
    assert_eq!(records[0].bucket, "uploads");
    assert_eq!(records[0].key, "photos/cat+dog.png");
    assert_eq!(records[0].size, 1_000_000);
    assert_eq!(records[3].key, "scans/Tax Return 2023.PDF");
}

#[tokio::test]
async fn put_batch_writes_only_accepted_summaries() {
    let (filter, store) = memory_filter();
    let event = event_from(fixture());
    let report = handle_notification(&filter, REQUEST_ID, &event)
        .await
        .unwrap();

    let statuses: Vec<Status> = report.records.iter().map(|r| r.outcome.status()).collect();
    assert_eq!(
        statuses,
        vec![
            Status::Accepted,
            Status::Rejected,
            Status::Rejected,
            Status::Accepted
        ]
    );

    let body = store
        .read("uploads", "output/cat+dog.png.json")
        .await
        .unwrap();
    let summary: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        summary,
        serde_json::json!({
            "request_id": REQUEST_ID,
            "status": "ACCEPTED",
            "source_key": "photos/cat+dog.png",
            "extension": ".png",
            "size_bytes": 1000000
        })
    );

    // Exactly at the ceiling, upper-case extension
    let body = store
        .read("uploads", "output/Tax Return 2023.PDF.json")
        .await
        .unwrap();
    let summary: SummaryRecord = serde_json::from_slice(&body).unwrap();
    assert_eq!(summary.extension, ".pdf");
    assert_eq!(summary.size_bytes, 5_242_880);

    let malware = store.read("uploads", "output/malware.exe.json").await;
    assert!(malware.is_err());
    let huge = store.read("uploads", "output/huge.pdf.json").await;
    assert!(huge.is_err());
}

#[tokio::test]
async fn minimal_notification_is_accepted() {
    let (filter, store) = memory_filter();
    let event: S3Event = serde_json::from_str(
        r#"{"Records":[{"s3":{"bucket":{"name":"uploads"},"object":{"key":"photos/cat%2Bdog.png","size":1000000}}}]}"#,
    )
    .unwrap();

    let report = handle_notification(&filter, "req", &event).await.unwrap();
    assert_eq!(report.accepted(), 1);

    let body = store.read("uploads", "output/cat+dog.png.json").await;
    assert!(body.is_ok());
}

#[tokio::test]
async fn malformed_record_stops_the_rest_of_the_batch() {
    let mut value = fixture();
    value["Records"][2]["s3"]["object"]
        .as_object_mut()
        .unwrap()
        .remove("key");
    // Would be accepted if it were reached
    value["Records"][3]["s3"]["object"]["key"] = Value::from("late.png");

    let (filter, store) = memory_filter();
    let err = handle_notification(&filter, "req", &event_from(value))
        .await
        .unwrap_err();

    match err {
        IngestError::MalformedRecord { index, field } => {
            assert_eq!(index, 2);
            assert_eq!(field, "s3.object.key");
        }
        other => panic!("expected malformed record, got {:?}", other),
    }

    // Records ahead of the broken one were fully processed
    let first = store.read("uploads", "output/cat+dog.png.json").await;
    assert!(first.is_ok());
    let late = store.read("uploads", "output/late.png.json").await;
    assert!(late.is_err());
}

#[tokio::test]
async fn missing_size_on_last_record_keeps_earlier_summaries() {
    let mut value = fixture();
    value["Records"][3]["s3"]["object"]
        .as_object_mut()
        .unwrap()
        .remove("size");

    let (filter, store) = memory_filter();
    let err = handle_notification(&filter, "req", &event_from(value))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("s3.object.size"));

    let first = store.read("uploads", "output/cat+dog.png.json").await;
    assert!(first.is_ok());
}

#[test]
fn empty_bucket_name_is_malformed() {
    let mut value = fixture();
    value["Records"][1]["s3"]["bucket"]["name"] = Value::String(String::new());
    let err = decode_all(&event_from(value)).unwrap_err();
    assert!(err.to_string().contains("s3.bucket.name"));
}

#[test]
fn negative_size_is_malformed() {
    let mut value = fixture();
    value["Records"][0]["s3"]["object"]["size"] = Value::from(-1);
    let err = decode_all(&event_from(value)).unwrap_err();
    assert!(matches!(
        err,
        IngestError::MalformedRecord {
            index: 0,
            field: "s3.object.size"
        }
    ));
}

#[test]
fn undecodable_key_bytes_are_replaced() {
    let mut value = fixture();
    value["Records"][0]["s3"]["object"]["key"] = Value::from("bad%FF.png");
    let records = decode_all(&event_from(value)).unwrap();
    assert_eq!(records[0].key, "bad\u{FFFD}.png");
}

#[tokio::test]
async fn empty_records_is_a_successful_invocation() {
    let (filter, _store) = memory_filter();
    let event = event_from(serde_json::json!({ "Records": [] }));
    let report = handle_notification(&filter, "req", &event).await.unwrap();
    assert!(report.records.is_empty());
}
