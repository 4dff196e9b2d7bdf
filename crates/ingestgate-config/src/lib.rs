// ingestgate-config - Runtime configuration for the upload filter
//
// Supports configuration from multiple sources:
// 1. Environment variables (highest priority)
// 2. Config file path from INGESTGATE_CONFIG env var
// 3. Config file contents from INGESTGATE_CONFIG_CONTENT env var
// 4. Default config file locations (./ingestgate.toml, ./.ingestgate.toml)
// 5. Platform-specific defaults (lowest priority)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

mod env_overrides;
mod platform;
mod sources;
mod validation;

pub use env_overrides::{EnvSource, ENV_PREFIX};
pub use platform::Platform;
pub use sources::{load_config, load_from_file_path};

/// Main runtime configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub filter: FilterConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

/// Upload policy: which files are accepted and where summaries go
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Extensions (with the leading dot) that pass the allow-list gate.
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,
    /// Objects strictly larger than this are rejected.
    #[serde(default = "default_max_size_bytes")]
    pub max_size_bytes: u64,
    /// Key prefix for summary records, written in the source bucket.
    #[serde(default = "default_output_prefix")]
    pub output_prefix: String,
}

fn default_allowed_extensions() -> Vec<String> {
    [".jpg", ".jpeg", ".png", ".pdf"]
        .iter()
        .map(|ext| ext.to_string())
        .collect()
}

fn default_max_size_bytes() -> u64 {
    5 * 1024 * 1024
}

fn default_output_prefix() -> String {
    "output/".to_string()
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            allowed_extensions: default_allowed_extensions(),
            max_size_bytes: default_max_size_bytes(),
            output_prefix: default_output_prefix(),
        }
    }
}

impl FilterConfig {
    /// Lowercase and trim the allow-list so lookups can be exact.
    pub fn normalize(&mut self) {
        for ext in &mut self.allowed_extensions {
            *ext = ext.trim().to_lowercase();
        }
        self.allowed_extensions.sort();
        self.allowed_extensions.dedup();
    }
}

/// Storage backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fs: Option<FsConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s3: Option<S3Config>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Fs,
    S3,
    Memory,
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackend::Fs => write!(f, "fs"),
            StorageBackend::S3 => write!(f, "s3"),
            StorageBackend::Memory => write!(f, "memory"),
        }
    }
}

impl std::str::FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "fs" | "filesystem" => Ok(StorageBackend::Fs),
            "s3" | "aws" => Ok(StorageBackend::S3),
            "memory" | "mem" => Ok(StorageBackend::Memory),
            _ => anyhow::bail!(
                "Unsupported storage backend: {}. Supported: fs, s3, memory",
                s
            ),
        }
    }
}

/// Local filesystem layout: `<path>/<bucket>/<key>`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FsConfig {
    pub path: String,
}

impl Default for FsConfig {
    fn default() -> Self {
        Self {
            path: "./data".to_string(),
        }
    }
}

/// S3 connection settings. The bucket always comes from the notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Config {
    pub region: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Shape of a TOML config file: every section is optional and replaces the
/// platform default for that section when present.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    filter: Option<FilterConfig>,
    storage: Option<StorageConfig>,
    logging: Option<LoggingConfig>,
}

impl RuntimeConfig {
    /// Load configuration from all sources with priority
    pub fn load() -> Result<Self> {
        load_config(Platform::detect())
    }

    /// Load configuration for a specific platform (useful for testing)
    pub fn load_for_platform(platform: Platform) -> Result<Self> {
        load_config(platform)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }

    pub fn from_platform_defaults(platform: Platform) -> Self {
        platform.default_config()
    }

    /// Parse TOML and layer it over this config.
    pub fn merge_toml(&mut self, content: &str) -> Result<()> {
        let file: ConfigFile = toml::from_str(content).context("Failed to parse TOML config")?;
        self.merge(file);
        Ok(())
    }

    fn merge(&mut self, other: ConfigFile) {
        if let Some(filter) = other.filter {
            self.filter = filter;
        }
        if let Some(storage) = other.storage {
            self.storage = storage;
        }
        if let Some(logging) = other.logging {
            self.logging = logging;
        }
    }

    /// Apply environment overrides from a custom source.
    pub fn apply_env_overrides_from<E: EnvSource>(&mut self, env: &E) -> Result<()> {
        env_overrides::apply_env_overrides(self, env)
    }

    /// Build a configuration for the given platform using inline config content
    /// plus overrides supplied by an `EnvSource`.
    pub fn load_for_platform_with_env<E: EnvSource>(
        platform: Platform,
        inline_config: Option<&str>,
        env: &E,
    ) -> Result<Self> {
        let mut config = RuntimeConfig::from_platform_defaults(platform);

        if let Some(inline) = inline_config {
            config
                .merge_toml(inline)
                .context("Failed to parse inline config content")?;
        }

        config.apply_env_overrides_from(env)?;
        config.filter.normalize();
        config.validate()?;
        Ok(config)
    }
}
