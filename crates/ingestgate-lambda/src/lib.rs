// AWS Lambda runtime adapter
//
// Receives S3 object-created notifications and runs them through the
// ingestion filter. Configuration, storage operators and the filter are
// built once per cold start and shared by every invocation.

use ingestgate_config::{Platform, RuntimeConfig};
use ingestgate_core::{BatchReport, IngestError, IngestionFilter};
use lambda_runtime::{service_fn, Error, LambdaEvent};
use std::sync::Arc;

mod event;
mod init;
mod response;

pub use event::{records_from_event, S3Bucket, S3Entity, S3Event, S3EventRecord, S3Object};
pub use init::{build_filter, filter_policy, init_tracing};
pub use response::InvocationResponse;

/// Decode an S3 event and process every record.
///
/// Shared by the Lambda handler and the local runner.
pub async fn handle_notification(
    filter: &IngestionFilter,
    request_id: &str,
    event: &S3Event,
) -> Result<BatchReport, IngestError> {
    let report = filter
        .process_records(request_id, records_from_event(event))
        .await?;

    tracing::info!(
        request_id,
        records = report.records.len(),
        accepted = report.accepted(),
        rejected = report.rejected(),
        "Notification batch processed"
    );
    Ok(report)
}

/// Lambda handler for S3 notifications
async fn handle_request(
    event: LambdaEvent<S3Event>,
    filter: Arc<IngestionFilter>,
) -> Result<InvocationResponse, Error> {
    let (payload, context) = event.into_parts();

    match handle_notification(&filter, &context.request_id, &payload).await {
        Ok(_) => Ok(InvocationResponse::ok()),
        Err(err) => {
            tracing::error!(
                request_id = %context.request_id,
                error = %err,
                "Invocation failed"
            );
            Err(err.into())
        }
    }
}

/// Lambda runtime entry point
pub async fn run() -> Result<(), Error> {
    let config = RuntimeConfig::load_for_platform(Platform::Lambda)
        .map_err(|e| Error::from(format!("Failed to load configuration: {:#}", e)))?;

    init_tracing(&config.logging);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        git_hash = env!("GIT_HASH"),
        built_at = env!("BUILD_TIMESTAMP"),
        "ingestgate lambda starting"
    );

    let filter = Arc::new(
        build_filter(&config)
            .map_err(|e| Error::from(format!("Failed to initialize filter: {:#}", e)))?,
    );

    lambda_runtime::run(service_fn(move |event: LambdaEvent<S3Event>| {
        let filter = filter.clone();
        async move { handle_request(event, filter).await }
    }))
    .await
}
