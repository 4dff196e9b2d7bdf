use super::{FsConfig, LogFormat, RuntimeConfig, S3Config, StorageBackend};
use anyhow::{anyhow, Context, Result};

pub const ENV_PREFIX: &str = "INGESTGATE_";

/// Abstraction over environment-variable lookups so tests can supply their
/// own source of overrides.
pub trait EnvSource {
    fn get(&self, key: &str) -> Option<String>;

    /// Get an environment variable WITHOUT the INGESTGATE_ prefix
    /// Used for AWS standard variables (AWS_REGION, etc.)
    fn get_raw(&self, key: &str) -> Option<String>;
}

/// Apply environment-variable overrides (highest priority) to the runtime config.
pub fn apply_env_overrides<E: EnvSource>(config: &mut RuntimeConfig, env: &E) -> Result<()> {
    // Filter policy
    if let Some(list) = get_env_string(env, "ALLOWED_EXTENSIONS")? {
        config.filter.allowed_extensions = list
            .split(',')
            .map(str::trim)
            .filter(|ext| !ext.is_empty())
            .map(str::to_string)
            .collect();
    }
    if let Some(val) = get_env_u64(env, "MAX_SIZE_BYTES")? {
        config.filter.max_size_bytes = val;
    }
    if let Some(prefix) = get_env_string(env, "OUTPUT_PREFIX")? {
        config.filter.output_prefix = normalize_prefix(prefix);
    }

    // Logging
    if let Some(level) = get_env_string(env, "LOG_LEVEL")? {
        config.logging.level = level;
    }
    if let Some(format) = get_env_string(env, "LOG_FORMAT")? {
        config.logging.format = match format.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Text,
        };
    }

    // Storage backend
    if let Some(backend) = get_env_string(env, "STORAGE_BACKEND")? {
        config.storage.backend = backend
            .parse::<StorageBackend>()
            .context("Invalid INGESTGATE_STORAGE_BACKEND value")?;
    }

    // Filesystem storage
    if let Some(path) = get_env_string(env, "STORAGE_PATH")? {
        config.storage.fs.get_or_insert_with(FsConfig::default).path = path;
    }

    // S3 storage; the Lambda runtime always exports AWS_REGION
    if let Some(region) = get_env_string(env, "S3_REGION")? {
        ensure_s3(config).region = region;
    } else if let Some(region) = get_raw_env_string(env, "AWS_REGION")? {
        if config.storage.backend == StorageBackend::S3 {
            ensure_s3(config).region = region;
        }
    }
    if let Some(endpoint) = get_env_string(env, "S3_ENDPOINT")? {
        ensure_s3(config).endpoint = Some(endpoint);
    }

    Ok(())
}

fn ensure_s3(config: &mut RuntimeConfig) -> &mut S3Config {
    config.storage.s3.get_or_insert_with(|| S3Config {
        region: String::new(),
        endpoint: None,
    })
}

fn get_env_string<E: EnvSource>(env: &E, key: &str) -> Result<Option<String>> {
    Ok(env.get(key))
}

/// Get a raw environment variable without the INGESTGATE_ prefix
fn get_raw_env_string<E: EnvSource>(env: &E, key: &str) -> Result<Option<String>> {
    Ok(env.get_raw(key))
}

fn get_env_u64<E: EnvSource>(env: &E, key: &str) -> Result<Option<u64>> {
    match get_env_string(env, key)? {
        Some(val) => {
            let parsed = val
                .trim()
                .parse::<u64>()
                .map_err(|e| anyhow!("Failed to parse {}{}: {}", ENV_PREFIX, key, e))?;
            Ok(Some(parsed))
        }
        None => Ok(None),
    }
}

fn normalize_prefix(prefix: String) -> String {
    if prefix.is_empty() || prefix.ends_with('/') {
        prefix
    } else {
        format!("{}/", prefix)
    }
}
