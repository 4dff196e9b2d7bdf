// Cold-start initialization: logging and the long-lived filter handle

use anyhow::{Context, Result};
use ingestgate_config::{FilterConfig, LogFormat, LoggingConfig, RuntimeConfig};
use ingestgate_core::{FilterPolicy, IngestionFilter};
use ingestgate_writer::OpendalStore;
use std::sync::Arc;
use tracing::info;

/// Initialize tracing/logging from the logging section of RuntimeConfig.
///
/// JSON output puts event fields at the top level so each line is the flat
/// record CloudWatch Logs Insights queries expect.
pub fn init_tracing(logging: &LoggingConfig) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let env_filter = EnvFilter::try_new(&logging.level)
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    // Try to set the global subscriber; ignore error if already set (idempotent)
    let _ = match logging.format {
        LogFormat::Json => tracing::subscriber::set_global_default(
            registry.with(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(false)
                    .with_span_list(false)
                    .with_ansi(false),
            ),
        ),
        LogFormat::Text => tracing::subscriber::set_global_default(registry.with(fmt::layer())),
    };
}

pub fn filter_policy(config: &FilterConfig) -> FilterPolicy {
    FilterPolicy::new(
        &config.allowed_extensions,
        config.max_size_bytes,
        &config.output_prefix,
    )
}

/// Build the store and filter once; callers share the result across invocations.
pub fn build_filter(config: &RuntimeConfig) -> Result<IngestionFilter> {
    let store = OpendalStore::from_config(&config.storage)
        .with_context(|| format!("Failed to initialize {} storage", config.storage.backend))?;

    info!(
        backend = store.backend_name(),
        allowed_extensions = ?config.filter.allowed_extensions,
        max_size_bytes = config.filter.max_size_bytes,
        output_prefix = %config.filter.output_prefix,
        "Ingestion filter initialized"
    );

    Ok(IngestionFilter::new(
        filter_policy(&config.filter),
        Arc::new(store),
    ))
}
