//! Report modules, one per benchmark tool output.
//!
//! Each module reads its input files by role, builds plots or tables, and adds
//! them to a [`Report`]. A module with nothing usable to show returns
//! [`ModuleError::NoData`] without touching the report.
//!
//! | Module | Roles | Output |
//! |--------|-------|--------|
//! | `synteny` | `coords` | scatter `syntenyplot` |
//! | `nucmer` | `coords` | line plot `mummerplot` |
//! | `mummerplot` | `fplot`, `rplot` | scatter `mummerplot` |
//! | `minimap2` | `alignments` | scatter `contig_alignment_plot` |
//! | `jellyfish` | `histogram`, `dump` | line plot and scatter |
//! | `cpu_times` | `times` | general statistics column |
//! | `read_quality` | `minimap2`, `nanostats` | table |
//! | `methods` | `publication_info`, `tool_versions`, `assembler_commands`, `log_files` | methods text |

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::parsing::input::InputFile;
use crate::parsing::ParseError;
use crate::plot::rasterize::{RasterError, ALIGNMENT_STEP_SIZE, SYNTENY_STEP_SIZE};
use crate::report::Report;
use crate::web::format_detection::InputKind;

pub mod cpu_times;
pub mod jellyfish;
pub mod methods;
pub mod minimap2;
pub mod mummerplot;
pub mod nucmer;
pub mod read_quality;
pub mod synteny;

#[derive(Error, Debug)]
pub enum ModuleError {
    #[error("No usable input found for {0}")]
    NoData(&'static str),

    #[error("Inconsistent input: {0}")]
    Inconsistent(String),

    #[error("Missing field '{field}' in {source_name}")]
    MissingField {
        field: String,
        source_name: &'static str,
    },

    #[error("Failed to parse {file}: {source}")]
    Parse {
        file: String,
        #[source]
        source: ParseError,
    },

    #[error("Invalid module configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Raster(#[from] RasterError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Display metadata shared by every section a module adds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModuleInfo {
    pub name: &'static str,
    pub anchor: &'static str,
    pub href: Option<&'static str>,
    pub info: &'static str,
}

/// A named group of input files a module reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InputRole {
    pub name: &'static str,
    pub kind: InputKind,
    pub description: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleKind {
    Synteny,
    Nucmer,
    Mummerplot,
    Minimap2,
    Jellyfish,
    CpuTimes,
    ReadQuality,
    Methods,
}

impl ModuleKind {
    pub const ALL: [ModuleKind; 8] = [
        ModuleKind::Synteny,
        ModuleKind::Nucmer,
        ModuleKind::Mummerplot,
        ModuleKind::Minimap2,
        ModuleKind::Jellyfish,
        ModuleKind::CpuTimes,
        ModuleKind::ReadQuality,
        ModuleKind::Methods,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ModuleKind::Synteny => "synteny",
            ModuleKind::Nucmer => "nucmer",
            ModuleKind::Mummerplot => "mummerplot",
            ModuleKind::Minimap2 => "minimap2",
            ModuleKind::Jellyfish => "jellyfish",
            ModuleKind::CpuTimes => "cpu_times",
            ModuleKind::ReadQuality => "read_quality",
            ModuleKind::Methods => "methods",
        }
    }

    #[must_use]
    pub fn info(self) -> &'static ModuleInfo {
        match self {
            ModuleKind::Synteny => &synteny::INFO,
            ModuleKind::Nucmer => &nucmer::INFO,
            ModuleKind::Mummerplot => &mummerplot::INFO,
            ModuleKind::Minimap2 => &minimap2::INFO,
            ModuleKind::Jellyfish => &jellyfish::INFO,
            ModuleKind::CpuTimes => &cpu_times::INFO,
            ModuleKind::ReadQuality => &read_quality::INFO,
            ModuleKind::Methods => &methods::INFO,
        }
    }

    #[must_use]
    pub fn roles(self) -> &'static [InputRole] {
        match self {
            ModuleKind::Synteny => synteny::ROLES,
            ModuleKind::Nucmer => nucmer::ROLES,
            ModuleKind::Mummerplot => mummerplot::ROLES,
            ModuleKind::Minimap2 => minimap2::ROLES,
            ModuleKind::Jellyfish => jellyfish::ROLES,
            ModuleKind::CpuTimes => cpu_times::ROLES,
            ModuleKind::ReadQuality => read_quality::ROLES,
            ModuleKind::Methods => methods::ROLES,
        }
    }

    #[must_use]
    pub fn role(self, name: &str) -> Option<&'static InputRole> {
        self.roles().iter().find(|role| role.name == name)
    }

    /// Rasterization step used when none is configured
    #[must_use]
    pub fn default_step_size(self) -> Option<u64> {
        match self {
            ModuleKind::Synteny | ModuleKind::Mummerplot => Some(SYNTENY_STEP_SIZE),
            ModuleKind::Minimap2 => Some(ALIGNMENT_STEP_SIZE),
            _ => None,
        }
    }

    /// Run this module over `inputs`, adding its output to `report`.
    ///
    /// # Errors
    ///
    /// Returns `ModuleError::Config` for roles the module does not know or a
    /// step size on a module that does not rasterize, and whatever the module
    /// itself reports.
    pub fn run(
        self,
        inputs: &ModuleInputs,
        settings: &ModuleSettings,
        report: &mut Report,
    ) -> Result<(), ModuleError> {
        for role in inputs.roles() {
            if self.role(role).is_none() {
                return Err(ModuleError::Config(format!(
                    "Module '{self}' has no input role '{role}'"
                )));
            }
        }
        if settings.step_size.is_some() && self.default_step_size().is_none() {
            return Err(ModuleError::Config(format!(
                "Module '{self}' does not take a step size"
            )));
        }

        match self {
            ModuleKind::Synteny => synteny::run(inputs, settings, report),
            ModuleKind::Nucmer => nucmer::run(inputs, report),
            ModuleKind::Mummerplot => mummerplot::run(inputs, settings, report),
            ModuleKind::Minimap2 => minimap2::run(inputs, settings, report),
            ModuleKind::Jellyfish => jellyfish::run(inputs, report),
            ModuleKind::CpuTimes => cpu_times::run(inputs, report),
            ModuleKind::ReadQuality => read_quality::run(inputs, report),
            ModuleKind::Methods => methods::run(inputs, report),
        }
    }
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ModuleKind {
    type Err = ModuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('-', "_").to_lowercase();
        ModuleKind::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| ModuleError::Config(format!("Unknown module '{s}'")))
    }
}

/// Per-run options for a module
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ModuleSettings {
    /// Rasterization step, where the module rasterizes
    pub step_size: Option<u64>,
    /// Prefix removed from sample names in display labels
    pub label_prefix: Option<String>,
}

/// Input files grouped by role
#[derive(Debug, Clone, Default)]
pub struct ModuleInputs {
    files: BTreeMap<String, Vec<InputFile>>,
}

impl ModuleInputs {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, role: &str, file: InputFile) {
        info!("Found {} input: {}", role, file.file_name);
        self.files.entry(role.to_string()).or_default().push(file);
    }

    /// Read every path from disk into `role`.
    ///
    /// # Errors
    ///
    /// Returns `ModuleError::Parse` for the first file that cannot be read.
    pub fn load_paths(&mut self, role: &str, paths: &[PathBuf]) -> Result<(), ModuleError> {
        for path in paths {
            let file = InputFile::from_path(path).map_err(|source| ModuleError::Parse {
                file: path.display().to_string(),
                source,
            })?;
            self.add(role, file);
        }
        Ok(())
    }

    /// Files for `role` in the order they were added
    #[must_use]
    pub fn files(&self, role: &str) -> &[InputFile] {
        self.files.get(role).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.values().all(Vec::is_empty)
    }
}

/// Parse one file, logging and returning `None` on failure so the rest of the
/// module's inputs can still be used
pub(crate) fn parse_or_skip<T>(
    file: &InputFile,
    parse: impl FnOnce(&str) -> Result<T, ParseError>,
) -> Option<T> {
    match parse(&file.content) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Skipping {}: {}", file.file_name, e);
            None
        }
    }
}
