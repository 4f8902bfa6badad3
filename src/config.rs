use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_MAX_SAMPLES;
use crate::domain::Field;
use crate::error::{NormalizeError, Result};

/// What happens to a present binary value that is neither code 1, code 2,
/// nor an existing label
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmappedPolicy {
    /// Emit the original text unchanged and record a quality issue
    #[default]
    PassThrough,
    /// Abort the run
    Reject,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub recoding: RecodingConfig,
    pub report: ReportConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RecodingConfig {
    pub unmapped: UnmappedPolicy,
    /// Per-field policy keyed by canonical name
    pub overrides: BTreeMap<String, UnmappedPolicy>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    pub max_samples: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            max_samples: DEFAULT_MAX_SAMPLES,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Directory for daily JSON log files; console only when unset
    pub directory: Option<PathBuf>,
}

impl PipelineConfig {
    pub fn load(config_path: &Path) -> Result<Self> {
        let config_content = fs::read_to_string(config_path).map_err(|e| {
            NormalizeError::Config(format!(
                "Failed to read config file '{}': {}",
                config_path.display(),
                e
            ))
        })?;

        Self::from_toml_str(&config_content)
    }

    /// Load from `path` when given, otherwise fall back to defaults
    pub fn load_optional(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: PipelineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        for name in self.recoding.overrides.keys() {
            let field = Field::from_canonical_name(name).ok_or_else(|| {
                NormalizeError::Config(format!("Unknown field in recoding overrides: '{}'", name))
            })?;
            if !field.spec().kind.is_binary() {
                return Err(NormalizeError::Config(format!(
                    "Recoding override for '{}' is not allowed: field is {}",
                    name,
                    field.spec().kind.name()
                )));
            }
        }
        Ok(())
    }

    /// Effective policy for unmapped values of `field`
    pub fn policy_for(&self, field: Field) -> UnmappedPolicy {
        self.recoding
            .overrides
            .get(field.canonical_name())
            .copied()
            .unwrap_or(self.recoding.unmapped)
    }
}
