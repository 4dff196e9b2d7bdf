//! Per-record outcomes, the summary artifact, and their log lines

use crate::record::NotificationRecord;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

const MIB: u64 = 1024 * 1024;

/// Status label shared by log lines and the summary record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Received,
    Rejected,
    Accepted,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Received => "RECEIVED",
            Status::Rejected => "REJECTED",
            Status::Accepted => "ACCEPTED",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a record was turned away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    ExtensionNotAllowed { extension: String },
    TooLarge { size: u64, max: u64 },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::ExtensionNotAllowed { extension } => {
                write!(f, "extension not allowed: {}", extension)
            }
            RejectReason::TooLarge { size, max } if max % MIB == 0 => {
                write!(f, "file too large: {} bytes (max {}MB)", size, max / MIB)
            }
            RejectReason::TooLarge { size, max } => {
                write!(f, "file too large: {} bytes (max {} bytes)", size, max)
            }
        }
    }
}

impl Serialize for RejectReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Outcome of a record at one point in the pipeline.
///
/// `Received` is always logged first; exactly one of `Rejected` or
/// `Accepted` follows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationOutcome {
    Received,
    Rejected { reason: RejectReason },
    Accepted { output_key: String, size_bytes: u64 },
}

impl ValidationOutcome {
    pub fn status(&self) -> Status {
        match self {
            ValidationOutcome::Received => Status::Received,
            ValidationOutcome::Rejected { .. } => Status::Rejected,
            ValidationOutcome::Accepted { .. } => Status::Accepted,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, ValidationOutcome::Accepted { .. })
    }

    /// Emit the structured log line for this outcome.
    ///
    /// Rejections are logged at ERROR, everything else at INFO.
    pub fn emit(&self, request_id: &str, record: &NotificationRecord) {
        let status = self.status().as_str();
        match self {
            ValidationOutcome::Received => tracing::info!(
                request_id,
                status,
                bucket = %record.bucket,
                key = %record.key,
                size = record.size,
                "upload received"
            ),
            ValidationOutcome::Rejected { reason } => tracing::error!(
                request_id,
                status,
                reason = %reason,
                key = %record.key,
                "upload rejected"
            ),
            ValidationOutcome::Accepted {
                output_key,
                size_bytes,
            } => tracing::info!(
                request_id,
                status,
                output_key = %output_key,
                size_bytes,
                "upload accepted"
            ),
        }
    }
}

/// JSON document written for every accepted upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub request_id: String,
    pub status: Status,
    pub source_key: String,
    pub extension: String,
    pub size_bytes: u64,
}

impl SummaryRecord {
    pub fn accepted(request_id: &str, record: &NotificationRecord, extension: &str) -> Self {
        Self {
            request_id: request_id.to_string(),
            status: Status::Accepted,
            source_key: record.key.clone(),
            extension: extension.to_string(),
            size_bytes: record.size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reject_reason_messages() {
        let ext = RejectReason::ExtensionNotAllowed {
            extension: ".exe".into(),
        };
        assert_eq!(ext.to_string(), "extension not allowed: .exe");

        let big = RejectReason::TooLarge {
            size: 6_000_000,
            max: 5 * MIB,
        };
        assert_eq!(big.to_string(), "file too large: 6000000 bytes (max 5MB)");

        let odd = RejectReason::TooLarge {
            size: 1500,
            max: 1000,
        };
        assert_eq!(
            odd.to_string(),
            "file too large: 1500 bytes (max 1000 bytes)"
        );
    }

    #[test]
    fn test_outcome_serializes_with_status_tag() {
        let rejected = ValidationOutcome::Rejected {
            reason: RejectReason::ExtensionNotAllowed {
                extension: ".exe".into(),
            },
        };
        assert_eq!(
            serde_json::to_value(&rejected).unwrap(),
            json!({ "status": "REJECTED", "reason": "extension not allowed: .exe" })
        );

        let accepted = ValidationOutcome::Accepted {
            output_key: "output/a.png.json".into(),
            size_bytes: 3,
        };
        assert_eq!(
            serde_json::to_value(&accepted).unwrap(),
            json!({ "status": "ACCEPTED", "output_key": "output/a.png.json", "size_bytes": 3 })
        );
        assert_eq!(accepted.status(), Status::Accepted);
        assert!(accepted.is_accepted());
        assert!(!rejected.is_accepted());
    }

    #[test]
    fn test_summary_record_shape() {
        let record = NotificationRecord::new("uploads", "photos/cat+dog.png", 1_000_000);
        let summary = SummaryRecord::accepted("req-1", &record, ".png");
        let text = serde_json::to_string(&summary).unwrap();
        assert_eq!(
            text,
            r#"{"request_id":"req-1","status":"ACCEPTED","source_key":"photos/cat+dog.png","extension":".png","size_bytes":1000000}"#
        );
    }
}
