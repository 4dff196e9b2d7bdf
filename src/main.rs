// Local runner for the ingestgate upload filter
//
// Replays S3 notification documents (as delivered to Lambda) against a
// configured backend, normally the local filesystem. Same filter, same
// policy, same summaries as the deployed function.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ingestgate_config::{Platform, RuntimeConfig};
use ingestgate_core::BatchReport;
use ingestgate_lambda::{build_filter, handle_notification, init_tracing, S3Event};
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "ingestgate",
    version,
    about = "Replay S3 upload notifications through the ingestgate filter"
)]
struct Cli {
    /// Config file (default: INGESTGATE_CONFIG, then ./ingestgate.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Process an S3 notification event document
    Process {
        /// Path to the event JSON, or `-` for stdin
        #[arg(long, short)]
        event: String,

        /// Request id stamped on summaries (random UUID when omitted)
        #[arg(long)]
        request_id: Option<String>,

        /// Exit with status 2 when any record is rejected
        #[arg(long)]
        fail_on_reject: bool,
    },
    /// Print the effective configuration
    CheckConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    init_tracing(&config.logging);

    match cli.command {
        Command::Process {
            event,
            request_id,
            fail_on_reject,
        } => {
            let request_id = request_id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
            let report = process(&config, &event, &request_id).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);

            if fail_on_reject && report.rejected() > 0 {
                tracing::warn!(rejected = report.rejected(), "Rejected uploads in batch");
                std::process::exit(2);
            }
        }
        Command::CheckConfig => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<RuntimeConfig> {
    match path {
        Some(path) => ingestgate_config::load_from_file_path(Platform::detect(), path),
        None => RuntimeConfig::load(),
    }
}

async fn process(config: &RuntimeConfig, source: &str, request_id: &str) -> Result<BatchReport> {
    let raw = read_event(source)?;
    let event: S3Event =
        serde_json::from_str(&raw).context("Event is not a valid S3 notification document")?;

    let filter = build_filter(config)?;
    let report = handle_notification(&filter, request_id, &event).await?;
    Ok(report)
}

fn read_event(source: &str) -> Result<String> {
    if source == "-" {
        let mut raw = String::new();
        std::io::stdin()
            .read_to_string(&mut raw)
            .context("Failed to read event from stdin")?;
        return Ok(raw);
    }

    std::fs::read_to_string(source)
        .with_context(|| format!("Failed to read event file: {}", source))
}
