//! The assembled report: sections, general statistics and data files.
//!
//! Modules add to a [`Report`] as they run. Plot and table ids go through the
//! report's [`IdRegistry`](ids::IdRegistry) so every element id is unique.
//!
//! ## Example
//!
//! ```rust
//! use ab_report::report::{DataFormat, Report};
//!
//! let mut report = Report::new();
//! report.add_data_file("ab_methods", serde_json::json!({"authors": "A. Author"}));
//!
//! let dir = tempfile::tempdir().unwrap();
//! let written = ab_report::report::writer::write_report(&report, dir.path(), DataFormat::Yaml).unwrap();
//! assert_eq!(written.len(), 2);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::core::ordered::OrderedMap;
use crate::modules::methods::MethodsContent;
use crate::modules::ModuleInfo;
use crate::plot::linegraph::LinePlot;
use crate::plot::scatter::ScatterPlot;
use crate::plot::table::{GeneralStats, TablePlot};

pub mod ids;
pub mod writer;

use ids::IdRegistry;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Serialization format for data files
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DataFormat {
    #[default]
    Json,
    Yaml,
}

impl DataFormat {
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            DataFormat::Json => "json",
            DataFormat::Yaml => "yaml",
        }
    }
}

/// What a section displays
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum SectionContent {
    Scatter(ScatterPlot),
    Line(LinePlot),
    Table(TablePlot),
    Methods(Box<MethodsContent>),
}

impl SectionContent {
    /// Short name of the content kind
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            SectionContent::Scatter(_) => "scatter",
            SectionContent::Line(_) => "xy_line",
            SectionContent::Table(_) => "table",
            SectionContent::Methods(_) => "methods",
        }
    }

    /// Number of datasets (plots), rows (tables) or pipelines (methods)
    #[must_use]
    pub fn dataset_count(&self) -> usize {
        match self {
            SectionContent::Scatter(plot) => plot.datasets.len(),
            SectionContent::Line(plot) => plot.datasets.len(),
            SectionContent::Table(table) => table.rows.len(),
            SectionContent::Methods(methods) => methods.pipelines.len(),
        }
    }

    /// Number of plotted points or line series; 0 for text content
    #[must_use]
    pub fn item_count(&self) -> usize {
        match self {
            SectionContent::Scatter(plot) => plot.point_count(),
            SectionContent::Line(plot) => plot.series_count(),
            SectionContent::Table(_) | SectionContent::Methods(_) => 0,
        }
    }
}

/// One report block produced by a module
#[derive(Debug, Clone, Serialize)]
pub struct Section {
    pub module: &'static str,
    pub module_anchor: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<&'static str>,
    pub info: &'static str,
    pub anchor: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub helptext: Option<String>,
    pub content: SectionContent,
}

impl Section {
    pub fn new(module: &ModuleInfo, anchor: &str, content: SectionContent) -> Self {
        Self {
            module: module.name,
            module_anchor: module.anchor,
            href: module.href,
            info: module.info,
            anchor: anchor.to_string(),
            description: String::new(),
            helptext: None,
            content,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn helptext(mut self, helptext: impl Into<String>) -> Self {
        self.helptext = Some(helptext.into());
        self
    }
}

#[derive(Debug, Serialize)]
pub struct Report {
    pub created_at: DateTime<Utc>,
    pub sections: Vec<Section>,
    pub general_stats: GeneralStats,
    pub data_files: OrderedMap<serde_json::Value>,
    #[serde(skip)]
    ids: IdRegistry,
    #[serde(skip)]
    anchors: IdRegistry,
}

impl Default for Report {
    fn default() -> Self {
        Self::new()
    }
}

impl Report {
    #[must_use]
    pub fn new() -> Self {
        Self {
            created_at: Utc::now(),
            sections: Vec::new(),
            general_stats: GeneralStats::default(),
            data_files: OrderedMap::new(),
            ids: IdRegistry::new(),
            anchors: IdRegistry::new(),
        }
    }

    /// Registry handing out plot and table ids
    pub fn ids(&mut self) -> &mut IdRegistry {
        &mut self.ids
    }

    /// Append a section. Its anchor is sanitized and made unique.
    pub fn add_section(&mut self, mut section: Section) {
        section.anchor = self.anchors.register(Some(&section.anchor));
        debug!("Adding section '{}' ({})", section.anchor, section.content.kind());
        self.sections.push(section);
    }

    /// Record a data file to be written next to the report. A later file with
    /// the same name replaces the earlier one.
    pub fn add_data_file(&mut self, name: &str, value: serde_json::Value) {
        self.data_files.insert(name, value);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty() && self.general_stats.is_empty() && self.data_files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plot::config::PlotConfig;
    use crate::plot::linegraph;

    const INFO: ModuleInfo = ModuleInfo {
        name: "Test",
        anchor: "test-module",
        href: None,
        info: "is a test",
    };

    fn line_section(report: &mut Report, anchor: &str) -> Section {
        let plot = linegraph::plot(Vec::new(), PlotConfig::new("lines"), report.ids());
        Section::new(&INFO, anchor, SectionContent::Line(plot))
    }

    #[test]
    fn test_section_anchors_unique() {
        let mut report = Report::new();
        let first = line_section(&mut report, "plot");
        report.add_section(first);
        let second = line_section(&mut report, "plot");
        report.add_section(second);

        assert_eq!(report.sections[0].anchor, "plot");
        assert_eq!(report.sections[1].anchor, "plot-1");
        // Plot ids are tracked separately from anchors
        match &report.sections[1].content {
            SectionContent::Line(plot) => assert_eq!(plot.config.id.as_deref(), Some("lines-1")),
            other => panic!("unexpected content {}", other.kind()),
        }
    }

    #[test]
    fn test_report_serializes_created_at() {
        let report = Report::new();
        let value = serde_json::to_value(&report).unwrap();
        let stamp = value["created_at"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(stamp).is_ok());
        assert!(value.get("ids").is_none());
    }

    #[test]
    fn test_data_file_replaced() {
        let mut report = Report::new();
        report.add_data_file("x", serde_json::json!(1));
        report.add_data_file("x", serde_json::json!(2));
        assert_eq!(report.data_files.len(), 1);
        assert_eq!(report.data_files.get("x"), Some(&serde_json::json!(2)));
    }

    #[test]
    fn test_data_format_extension() {
        assert_eq!(DataFormat::Json.extension(), "json");
        assert_eq!(DataFormat::Yaml.extension(), "yaml");
    }
}
