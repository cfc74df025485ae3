use crate::*;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info, instrument};

#[instrument(skip(path))]
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<WorkbenchConfig> {
    let path = path.as_ref();
    info!("Loading configuration from: {:?}", path);

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    debug!("Config file content length: {} bytes", content.len());

    parse_config(&content)
}

/// Load `path` if it exists, otherwise fall back to the built-in defaults
#[instrument(skip(path))]
pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<WorkbenchConfig> {
    let path = path.as_ref();
    if path.exists() {
        load_config(path)
    } else {
        debug!(?path, "No configuration file, using defaults");
        Ok(generate_default_config())
    }
}

/// Parse YAML content after environment variable substitution
pub fn parse_config(content: &str) -> Result<WorkbenchConfig> {
    let substituted = substitution::substitute_env_vars(content)?;
    debug!("Environment variable substitution completed");

    let config: WorkbenchConfig = serde_yaml::from_str(&substituted)
        .with_context(|| "Failed to parse YAML configuration")?;

    info!("Configuration loaded successfully");
    Ok(config)
}

#[instrument]
pub fn generate_default_config() -> WorkbenchConfig {
    WorkbenchConfig::default()
}

#[instrument]
pub fn save_config<P: AsRef<Path> + std::fmt::Debug>(config: &WorkbenchConfig, path: P) -> Result<()> {
    let path = path.as_ref();
    info!("Saving configuration to: {:?}", path);

    let yaml = serde_yaml::to_string(config)
        .with_context(|| "Failed to serialize configuration to YAML")?;

    fs::write(path, yaml)
        .with_context(|| format!("Failed to write config file: {:?}", path))?;

    info!("Configuration saved successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("optlab.yaml");

        let mut config = generate_default_config();
        config.api.base_url = "http://127.0.0.1:9999/api/v1".to_string();
        config.payoff.alignment = AlignmentMode::Index;
        save_config(&config, &path).unwrap();

        let loaded = load_config(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_or_default_without_file() {
        let dir = tempdir().unwrap();
        let config = load_or_default(dir.path().join("missing.yaml")).unwrap();
        assert_eq!(config, WorkbenchConfig::default());
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempdir().unwrap();
        assert!(load_config(dir.path().join("missing.yaml")).is_err());
    }

    #[test]
    fn test_parse_substitutes_env() {
        std::env::set_var("OPTLAB_TEST_API_URL", "http://backend:8080/api/v1");
        let config = parse_config("api:\n  base_url: ${OPTLAB_TEST_API_URL}\n").unwrap();
        assert_eq!(config.api.base_url, "http://backend:8080/api/v1");
    }

    #[test]
    fn test_parse_rejects_bad_yaml() {
        assert!(parse_config("payoff: [unclosed").is_err());
    }
}
