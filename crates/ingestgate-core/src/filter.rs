//! The ingestion filter: receive -> validate -> accept or reject
//!
//! Records are processed strictly in order. Each one is independent: no
//! check result is carried from one record to the next. The only await
//! point is the summary write for an accepted record, and a failed write
//! aborts the rest of the batch.

use crate::error::IngestError;
use crate::outcome::{RejectReason, SummaryRecord, ValidationOutcome};
use crate::policy::{Accepted, FilterPolicy};
use crate::record::NotificationRecord;
use crate::storage::{ObjectStore, SUMMARY_CONTENT_TYPE};
use serde::Serialize;
use std::sync::Arc;

/// Long-lived filter handle, built once per process.
pub struct IngestionFilter {
    policy: FilterPolicy,
    store: Arc<dyn ObjectStore>,
}

/// Terminal outcome of one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordReport {
    pub bucket: String,
    pub key: String,
    pub size: u64,
    #[serde(flatten)]
    pub outcome: ValidationOutcome,
}

/// Result of a whole invocation, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub request_id: String,
    pub records: Vec<RecordReport>,
}

impl BatchReport {
    pub fn accepted(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.outcome.is_accepted())
            .count()
    }

    pub fn rejected(&self) -> usize {
        self.records.len() - self.accepted()
    }
}

impl IngestionFilter {
    pub fn new(policy: FilterPolicy, store: Arc<dyn ObjectStore>) -> Self {
        Self { policy, store }
    }

    pub fn policy(&self) -> &FilterPolicy {
        &self.policy
    }

    /// Pure decision for a record, without logging or writing.
    pub fn check(&self, record: &NotificationRecord) -> Result<Accepted, RejectReason> {
        self.policy.check(record)
    }

    /// Process every record of a notification batch.
    pub async fn process_batch(
        &self,
        request_id: &str,
        records: &[NotificationRecord],
    ) -> Result<BatchReport, IngestError> {
        self.process_records(request_id, records.iter().cloned().map(Ok))
            .await
    }

    /// Process records as they are decoded.
    ///
    /// Each item is pulled only after the previous record is fully handled,
    /// so a decode error at record `k` leaves records `0..k` logged and
    /// written and stops the rest.
    pub async fn process_records<I>(
        &self,
        request_id: &str,
        records: I,
    ) -> Result<BatchReport, IngestError>
    where
        I: IntoIterator<Item = Result<NotificationRecord, IngestError>>,
        I::IntoIter: Send,
    {
        let records = records.into_iter();
        let mut report = BatchReport {
            request_id: request_id.to_string(),
            records: Vec::with_capacity(records.size_hint().0),
        };

        for record in records {
            let record = record?;
            let outcome = self.process_record(request_id, &record).await?;
            report.records.push(RecordReport {
                bucket: record.bucket,
                key: record.key,
                size: record.size,
                outcome,
            });
        }

        Ok(report)
    }

    /// Process a single record and return its terminal outcome.
    pub async fn process_record(
        &self,
        request_id: &str,
        record: &NotificationRecord,
    ) -> Result<ValidationOutcome, IngestError> {
        ValidationOutcome::Received.emit(request_id, record);

        let accepted = match self.check(record) {
            Ok(accepted) => accepted,
            Err(reason) => {
                let outcome = ValidationOutcome::Rejected { reason };
                outcome.emit(request_id, record);
                return Ok(outcome);
            }
        };

        let summary = SummaryRecord::accepted(request_id, record, &accepted.extension);
        let body = serde_json::to_vec(&summary).map_err(|source| IngestError::Serialize {
            key: record.key.clone(),
            source,
        })?;

        self.store
            .put(
                &record.bucket,
                &accepted.output_key,
                body,
                SUMMARY_CONTENT_TYPE,
            )
            .await?;

        let outcome = ValidationOutcome::Accepted {
            output_key: accepted.output_key,
            size_bytes: record.size,
        };
        outcome.emit(request_id, record);
        Ok(outcome)
    }
}
