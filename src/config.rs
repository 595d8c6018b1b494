//! Run configuration for the `report` command.
//!
//! A YAML file lists the modules to run and their input files by role:
//!
//! ```yaml
//! output_dir: ab_report_data
//! data_format: json
//! modules:
//!   - module: minimap2
//!     inputs:
//!       alignments: [minimap2_aligns_canu.tsv, minimap2_aligns_flye.tsv]
//!     step_size: 10000
//!     label_prefix: minimap2_aligns_
//!   - module: cpu_times
//!     inputs:
//!       times: [cpu.yaml]
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::modules::{ModuleKind, ModuleSettings};
use crate::report::DataFormat;

pub const DEFAULT_OUTPUT_DIR: &str = "ab_report_data";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Unknown module '{0}'")]
    UnknownModule(String),

    #[error("Module '{module}' has no input role '{role}'")]
    UnknownRole { module: ModuleKind, role: String },

    #[error("Module '{0}' does not take a step size")]
    StepSizeNotSupported(ModuleKind),

    #[error("Step size for module '{0}' must be positive")]
    InvalidStepSize(ModuleKind),
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub data_format: DataFormat,
    pub modules: Vec<ModuleRun>,
}

/// One module invocation in a run
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModuleRun {
    pub module: String,
    #[serde(default)]
    pub inputs: BTreeMap<String, Vec<PathBuf>>,
    pub step_size: Option<u64>,
    pub label_prefix: Option<String>,
}

impl ModuleRun {
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownModule` if the name is not a module.
    pub fn kind(&self) -> Result<ModuleKind, ConfigError> {
        self.module
            .parse()
            .map_err(|_| ConfigError::UnknownModule(self.module.clone()))
    }

    #[must_use]
    pub fn settings(&self) -> ModuleSettings {
        ModuleSettings {
            step_size: self.step_size,
            label_prefix: self.label_prefix.clone(),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let kind = self.kind()?;
        if let Some(role) = self.inputs.keys().find(|role| kind.role(role).is_none()) {
            return Err(ConfigError::UnknownRole {
                module: kind,
                role: role.clone(),
            });
        }
        match self.step_size {
            Some(_) if kind.default_step_size().is_none() => {
                Err(ConfigError::StepSizeNotSupported(kind))
            }
            Some(0) => Err(ConfigError::InvalidStepSize(kind)),
            _ => Ok(()),
        }
    }
}

impl RunConfig {
    /// Parse and validate a run configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Yaml` for malformed YAML or unknown keys, and the
    /// module, role or step size errors for invalid module entries.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: RunConfig = serde_yaml::from_str(text)?;
        for run in &config.modules {
            run.validate()?;
        }
        Ok(config)
    }

    /// Load and validate a run configuration file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` if the file cannot be read, otherwise as
    /// [`RunConfig::from_yaml_str`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }
}
