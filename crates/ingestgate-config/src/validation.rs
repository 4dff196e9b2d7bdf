// Configuration validation
//
// Validates that required fields are present and values are sensible

use crate::*;
use anyhow::{bail, Result};
use tracing::warn;

pub fn validate_config(config: &RuntimeConfig) -> Result<()> {
    validate_filter_config(&config.filter)?;
    validate_storage_config(&config.storage)?;
    validate_logging_config(&config.logging)?;
    Ok(())
}

fn validate_filter_config(config: &FilterConfig) -> Result<()> {
    if config.allowed_extensions.is_empty() {
        bail!("filter.allowed_extensions must not be empty");
    }

    for ext in &config.allowed_extensions {
        if !ext.starts_with('.') {
            bail!(
                "filter.allowed_extensions entry '{}' must start with '.'",
                ext
            );
        }
        if ext.len() < 2 || ext[1..].contains('.') || ext.contains('/') {
            bail!(
                "filter.allowed_extensions entry '{}' must be a single suffix like '.png'",
                ext
            );
        }
    }

    if config.max_size_bytes == 0 {
        bail!("filter.max_size_bytes must be greater than 0");
    }

    // A single S3 PUT tops out at 5 GiB
    if config.max_size_bytes > 5 * 1024 * 1024 * 1024 {
        warn!(
            max_size_bytes = config.max_size_bytes,
            "filter.max_size_bytes exceeds the largest single-part S3 upload"
        );
    }

    if config.output_prefix.is_empty() {
        bail!("filter.output_prefix must not be empty");
    }

    if config.output_prefix.starts_with('/') {
        bail!("filter.output_prefix must be relative (no leading '/')");
    }

    Ok(())
}

fn validate_storage_config(config: &StorageConfig) -> Result<()> {
    match config.backend {
        StorageBackend::Fs => {
            let fs = config
                .fs
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("fs storage backend requires 'fs' configuration"))?;

            if fs.path.is_empty() {
                bail!("storage.fs.path must not be empty");
            }
        }
        StorageBackend::S3 => {
            let s3 = config
                .s3
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("s3 storage backend requires 's3' configuration"))?;

            if s3.region.is_empty() {
                bail!("storage.s3.region is required for S3 backend");
            }
        }
        StorageBackend::Memory => {
            warn!("memory storage backend selected; summaries are discarded on exit");
        }
    }

    Ok(())
}

fn validate_logging_config(config: &LoggingConfig) -> Result<()> {
    if config.level.trim().is_empty() {
        bail!("logging.level must not be empty");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_filter_config() {
        assert!(validate_filter_config(&FilterConfig::default()).is_ok());

        let empty = FilterConfig {
            allowed_extensions: vec![],
            ..FilterConfig::default()
        };
        assert!(validate_filter_config(&empty).is_err());

        let compound = FilterConfig {
            allowed_extensions: vec![".tar.gz".into()],
            ..FilterConfig::default()
        };
        assert!(validate_filter_config(&compound).is_err());

        let bare_dot = FilterConfig {
            allowed_extensions: vec![".".into()],
            ..FilterConfig::default()
        };
        assert!(validate_filter_config(&bare_dot).is_err());

        let zero = FilterConfig {
            max_size_bytes: 0,
            ..FilterConfig::default()
        };
        assert!(validate_filter_config(&zero).is_err());

        let absolute = FilterConfig {
            output_prefix: "/output/".into(),
            ..FilterConfig::default()
        };
        assert!(validate_filter_config(&absolute).is_err());
    }

    #[test]
    fn test_validate_storage_config() {
        let s3_config = StorageConfig {
            backend: StorageBackend::S3,
            fs: None,
            s3: Some(S3Config {
                region: "us-east-1".to_string(),
                endpoint: None,
            }),
        };
        assert!(validate_storage_config(&s3_config).is_ok());

        let missing_region = StorageConfig {
            backend: StorageBackend::S3,
            fs: None,
            s3: Some(S3Config {
                region: String::new(),
                endpoint: None,
            }),
        };
        assert!(validate_storage_config(&missing_region).is_err());

        let missing_fs = StorageConfig {
            backend: StorageBackend::Fs,
            fs: None,
            s3: None,
        };
        assert!(validate_storage_config(&missing_fs).is_err());
    }
}
