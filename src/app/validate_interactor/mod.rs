// Validate interactor - turns raw configuration into a ValidatedConfig

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::model::*;
use crate::domain::rules::OverrideRules;
use crate::error::{ConvertError, ConvertResult};
use crate::ports::*;
use crate::probe::max_duration;
use crate::utils::path::has_extension;

/// Loads a configuration file and checks every rule, reporting all problems at once
pub struct ValidateInteractor {
    config_port: Arc<dyn ConfigPort>,
    probe_port: Arc<dyn ProbePort>,
}

impl ValidateInteractor {
    pub fn new(config_port: Arc<dyn ConfigPort>, probe_port: Arc<dyn ProbePort>) -> Self {
        Self {
            config_port,
            probe_port,
        }
    }

    pub async fn execute(&self, config_path: &Path) -> ConvertResult<ValidatedConfig> {
        info!("Loading configuration from {}", config_path.display());
        let raw = self.config_port.load_config(config_path).await?;
        self.validate(raw).await
    }

    pub async fn validate(&self, raw: RawConfig) -> ConvertResult<ValidatedConfig> {
        let mut problems = Vec::new();
        let global = Self::validate_global(&raw, &mut problems);

        let overrides = match &global {
            Some(global) => {
                self.validate_overrides(global, raw.files.as_deref().unwrap_or_default(), &mut problems)
                    .await
            }
            None => HashMap::new(),
        };

        match global {
            Some(global) if problems.is_empty() => {
                info!(
                    "Configuration valid: {} ({} override(s))",
                    global.source_dir.display(),
                    overrides.len()
                );
                Ok(ValidatedConfig { global, overrides })
            }
            _ => Err(ConvertError::ConfigInvalid { problems }),
        }
    }

    fn required_text(value: &Option<String>, key: &str, problems: &mut Vec<String>) -> Option<String> {
        match value.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => Some(text.to_string()),
            _ => {
                problems.push(format!("Can't find '{}' in configuration", key));
                None
            }
        }
    }

    fn validate_global(raw: &RawConfig, problems: &mut Vec<String>) -> Option<GlobalConfig> {
        let local_directory = Self::required_text(&raw.local_directory, "local_directory", problems);
        let extension = Self::required_text(&raw.extension, "extension", problems)
            .map(|ext| ext.trim_start_matches('.').to_string());
        let ftp_server = Self::required_text(&raw.ftp_server, "ftp_server", problems);
        let upload_dir = Self::required_text(&raw.upload_directory, "upload_directory", problems);

        let bitrate_ratio = match raw.bitrate_ratio {
            None => {
                problems.push("Can't find 'bitrate_ratio' in configuration".to_string());
                None
            }
            Some(ratio) if !ratio.is_finite() || ratio <= 0.0 => {
                problems.push(format!("'bitrate_ratio' must be positive, got {}", ratio));
                None
            }
            Some(ratio) => Some(ratio),
        };

        let source_dir = local_directory.and_then(|dir| match std::fs::canonicalize(&dir) {
            Ok(path) if path.is_dir() => Some(path),
            _ => {
                problems.push(format!("Local directory '{}' does not exist", dir));
                None
            }
        });

        Some(GlobalConfig {
            source_dir: source_dir?,
            extension: extension?,
            bitrate_ratio: bitrate_ratio?,
            upload_dir: upload_dir?,
            ftp_server: ftp_server?,
        })
    }

    async fn validate_overrides(
        &self,
        global: &GlobalConfig,
        records: &[RawFileOverride],
        problems: &mut Vec<String>,
    ) -> HashMap<PathBuf, FileOverride> {
        let mut overrides = HashMap::new();

        for (index, record) in records.iter().enumerate() {
            let relative = match record.path.as_deref().map(str::trim) {
                Some(path) if !path.is_empty() => path,
                _ => {
                    problems.push(format!("files[{}]: missing 'path'", index));
                    continue;
                }
            };
            let before = problems.len();
            let mut report = |message: String| problems.push(format!("{}: {}", relative, message));

            let full_path = global.source_dir.join(clean_relative(relative));
            let exists = full_path.is_file();
            if !exists {
                report(format!("file not found in {}", global.source_dir.display()));
            } else if !has_extension(&full_path, &global.extension) {
                report(format!("file has no '.{}' extension", global.extension));
            }

            let resolution = record
                .resolution
                .as_deref()
                .and_then(|text| OverrideRules::resolution(text).map_err(&mut report).ok());
            let bitrate = record
                .bitrate
                .and_then(|value| OverrideRules::bitrate(value).map_err(&mut report).ok());
            let trim = OverrideRules::cut_points(record.cut_start, record.cut_end)
                .map_err(&mut report)
                .ok()
                .flatten();

            let file_override = FileOverride {
                path: full_path.clone(),
                resolution,
                bitrate,
                audio: record.audio,
                exclude: record.exclude,
                trim,
            };

            let has_settings = file_override.has_settings()
                || record.resolution.is_some()
                || record.bitrate.is_some()
                || record.cut_start.is_some()
                || record.cut_end.is_some();
            if !has_settings {
                report("no settings besides 'path'".to_string());
            }

            if let (Some(trim), true) = (&trim, exists) {
                if let Some(problem) = self.check_trim(&full_path, trim).await {
                    report(problem);
                }
            }

            if overrides.contains_key(&full_path) {
                report("duplicate override".to_string());
            }

            if problems.len() == before {
                overrides.insert(full_path, file_override);
            }
        }

        overrides
    }

    async fn check_trim(&self, source: &Path, trim: &TrimRange) -> Option<String> {
        match self.probe_port.probe_streams(source).await {
            Ok(streams) => match max_duration(&streams) {
                Some(duration) => OverrideRules::trim_within(trim, duration).err(),
                None => {
                    warn!("Duration of {} unknown, cut points not checked", source.display());
                    None
                }
            },
            Err(e) => Some(format!("can't read duration: {}", e)),
        }
    }
}

/// Relative override path without `.` components
fn clean_relative(path: &str) -> PathBuf {
    Path::new(path)
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}
