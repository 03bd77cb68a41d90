// Config file adapter - YAML configuration, TOML when the file ends in `.toml`

use std::path::Path;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{ConvertError, ConvertResult};
use crate::ports::*;

/// Configuration file syntax
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Toml,
}

impl ConfigFormat {
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => ConfigFormat::Toml,
            _ => ConfigFormat::Yaml,
        }
    }

    /// Deserialize configuration text
    pub fn parse(&self, content: &str) -> Result<RawConfig, String> {
        match self {
            ConfigFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
            ConfigFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
        }
    }
}

/// File-backed configuration adapter
pub struct ConfigFileAdapter;

impl ConfigFileAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConfigFileAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConfigPort for ConfigFileAdapter {
    async fn load_config(&self, file_path: &Path) -> ConvertResult<RawConfig> {
        let content = tokio::fs::read_to_string(file_path).await.map_err(|e| {
            ConvertError::config(format!(
                "Can't read configuration file ({}): {}",
                file_path.display(),
                e
            ))
        })?;

        let format = ConfigFormat::for_path(file_path);
        debug!("Parsing {} as {:?}", file_path.display(), format);
        format.parse(&content).map_err(|e| {
            ConvertError::config(format!("{}: {}", file_path.display(), e))
        })
    }
}
