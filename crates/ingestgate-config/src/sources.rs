// Configuration source loading.
//
// Priority order:
// 1. Environment variables (INGESTGATE_* prefix)
// 2. Config file path from INGESTGATE_CONFIG
// 3. Inline config content from INGESTGATE_CONFIG_CONTENT
// 4. Default config files (./ingestgate.toml, ./.ingestgate.toml)
// 5. Platform defaults (based on auto-detected Platform)

use crate::env_overrides::{EnvSource, ENV_PREFIX};
use crate::platform::Platform;
use crate::RuntimeConfig;
use anyhow::{Context, Result};
use std::env;
use std::path::Path;

const DEFAULT_CONFIG_FILES: [&str; 2] = ["./ingestgate.toml", "./.ingestgate.toml"];

/// Load configuration for the given platform from files and the process environment.
pub fn load_config(platform: Platform) -> Result<RuntimeConfig> {
    let mut config = RuntimeConfig::from_platform_defaults(platform);

    if let Some((origin, content)) = read_config_source()? {
        config
            .merge_toml(&content)
            .with_context(|| format!("Failed to parse config from {}", origin))?;
        tracing::debug!(origin = %origin, "Loaded config file");
    }

    finish(config)
}

/// Load configuration from a specific file path (for the CLI --config flag).
/// Returns error if the file doesn't exist or can't be parsed.
pub fn load_from_file_path(platform: Platform, path: impl AsRef<Path>) -> Result<RuntimeConfig> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let mut config = RuntimeConfig::from_platform_defaults(platform);
    config
        .merge_toml(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    finish(config)
}

fn finish(mut config: RuntimeConfig) -> Result<RuntimeConfig> {
    config.apply_env_overrides_from(&StdEnvSource)?;
    config.filter.normalize();
    config.validate()?;
    Ok(config)
}

fn read_config_source() -> Result<Option<(String, String)>> {
    if let Ok(path) = env::var("INGESTGATE_CONFIG") {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path))?;
        return Ok(Some((path, content)));
    }

    if let Ok(content) = env::var("INGESTGATE_CONFIG_CONTENT") {
        return Ok(Some(("INGESTGATE_CONFIG_CONTENT".to_string(), content)));
    }

    for path in DEFAULT_CONFIG_FILES {
        if Path::new(path).exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path))?;
            return Ok(Some((path.to_string(), content)));
        }
    }

    Ok(None)
}

struct StdEnvSource;

impl EnvSource for StdEnvSource {
    fn get(&self, key: &str) -> Option<String> {
        env::var(format!("{}{}", ENV_PREFIX, key)).ok()
    }

    fn get_raw(&self, key: &str) -> Option<String> {
        env::var(key).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env_overrides::tests::MapEnv;
    use crate::{LogFormat, StorageBackend};
    use std::io::Write;

    #[test]
    fn load_from_file_path_layers_over_platform_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [filter]
            allowed_extensions = [".PNG", ".webp"]

            [storage]
            backend = "memory"
            "#
        )
        .unwrap();

        let config = load_from_file_path(Platform::Local, file.path()).unwrap();
        assert_eq!(config.filter.allowed_extensions, vec![".png", ".webp"]);
        assert_eq!(config.filter.max_size_bytes, 5_242_880);
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.logging.format, LogFormat::Text);
    }

    #[test]
    fn load_from_missing_file_fails() {
        let path = "/nonexistent/ingestgate.toml";
        let err = load_from_file_path(Platform::Local, path).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn inline_config_with_env_source() {
        let env = MapEnv::default().with("MAX_SIZE_BYTES", "10");
        let config = RuntimeConfig::load_for_platform_with_env(
            Platform::Lambda,
            Some("[logging]\nlevel = \"warn\"\n"),
            &env,
        )
        .unwrap();

        assert_eq!(config.filter.max_size_bytes, 10);
        assert_eq!(config.logging.level, "warn");
        // The [logging] table replaced the Lambda default wholesale
        assert_eq!(config.logging.format, LogFormat::Text);
    }

    #[test]
    fn invalid_layered_config_is_rejected() {
        let env = MapEnv::default().with("ALLOWED_EXTENSIONS", "png");
        let result = RuntimeConfig::load_for_platform_with_env(Platform::Local, None, &env);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("must start with '.'"));
    }
}
