// Platform detection based on environment variables
//
// - AWS Lambda: AWS_LAMBDA_FUNCTION_NAME env var present
// - Local: anything else (developer machine, replay runs)

use crate::{FilterConfig, FsConfig, LogFormat, LoggingConfig, RuntimeConfig, S3Config};
use crate::{StorageBackend, StorageConfig};
use std::env;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Local,
    Lambda,
}

impl Platform {
    /// Auto-detect the current platform based on environment variables
    pub fn detect() -> Self {
        if env::var("AWS_LAMBDA_FUNCTION_NAME").is_ok() {
            Platform::Lambda
        } else {
            Platform::Local
        }
    }

    /// Baseline configuration before files and env overrides are applied
    pub fn default_config(&self) -> RuntimeConfig {
        match self {
            Platform::Local => RuntimeConfig {
                filter: FilterConfig::default(),
                storage: StorageConfig {
                    backend: StorageBackend::Fs,
                    fs: Some(FsConfig::default()),
                    s3: None,
                },
                logging: LoggingConfig::default(),
            },
            Platform::Lambda => RuntimeConfig {
                filter: FilterConfig::default(),
                storage: StorageConfig {
                    backend: StorageBackend::S3,
                    fs: None,
                    s3: Some(S3Config {
                        region: "us-east-1".to_string(),
                        endpoint: None,
                    }),
                },
                logging: LoggingConfig {
                    format: LogFormat::Json,
                    ..LoggingConfig::default()
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_defaults() {
        let local = Platform::Local.default_config();
        assert_eq!(local.storage.backend, StorageBackend::Fs);
        assert_eq!(local.logging.format, LogFormat::Text);
        assert!(local.validate().is_ok());

        let lambda = Platform::Lambda.default_config();
        assert_eq!(lambda.storage.backend, StorageBackend::S3);
        assert_eq!(lambda.logging.format, LogFormat::Json);
        assert!(lambda.validate().is_ok());
    }
}
