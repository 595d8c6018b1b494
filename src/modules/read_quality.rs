//! Raw read quality table combining NanoStat metrics with minimap2 alignment
//! categories.
//!
//! The two summaries are laid side by side: row `i` holds the `i`-th NanoStat
//! metric and the `i`-th minimap2 category.

use serde_json::{json, Map, Value};
use tracing::{info, warn};

use crate::core::ordered::OrderedMap;
use crate::modules::{parse_or_skip, InputRole, ModuleError, ModuleInfo, ModuleInputs};
use crate::parsing::read_quality::{parse_minimap2_summary, parse_nanostat_summary, AlignmentCategory};
use crate::plot::table::{self, TableHeader, TableRows};
use crate::report::{Report, Section, SectionContent};
use crate::web::format_detection::InputKind;

pub const INFO: ModuleInfo = ModuleInfo {
    name: "Raw read quality",
    anchor: "read-quality",
    href: None,
    info: ". Nanoplot was used to derive basic raw read set characteristics and quality measures. \
           Sequencing error rates were estimated by aligning the reads to the reference genome using minimap2.",
};

pub const ROLES: &[InputRole] = &[
    InputRole {
        name: "minimap2",
        kind: InputKind::YamlMapping,
        description: "minimap2 alignment summary (category: base count)",
    },
    InputRole {
        name: "nanostats",
        kind: InputKind::NanoStat,
        description: "NanoStat report",
    },
];

pub const TABLE_ID: &str = "ab_read_quality_table";
pub const DATA_FILE: &str = "multiqc_readqual_summary";

const DESCRIPTION: &str = "Read length and general quality measures were calculated using NanoStat. \
    Matches, substitutions, deletions and insertions with respect to a given reference, \
    after alignment with Minimap2.";

/// # Errors
///
/// Returns `ModuleError::NoData` unless both a minimap2 summary and a NanoStat
/// summary have entries.
pub fn run(inputs: &ModuleInputs, report: &mut Report) -> Result<(), ModuleError> {
    // Categories from several files are merged by name
    let mut categories: OrderedMap<AlignmentCategory> = OrderedMap::new();
    for file in inputs.files("minimap2") {
        if let Some(parsed) = parse_or_skip(file, parse_minimap2_summary) {
            for category in parsed {
                categories.insert(category.name.clone(), category);
            }
        }
    }
    if categories.is_empty() {
        return Err(ModuleError::NoData(INFO.name));
    }
    info!("Found minimap2 alignment summary");

    // A later NanoStat report replaces an earlier one
    let mut metrics: Vec<(String, Value)> = Vec::new();
    for file in inputs.files("nanostats") {
        if let Some(parsed) = parse_or_skip(file, parse_nanostat_summary) {
            metrics = parsed;
        }
    }
    if metrics.is_empty() {
        return Err(ModuleError::NoData(INFO.name));
    }
    info!("Found NanoStat summary");

    report.add_data_file(DATA_FILE, summary_data(&categories, &metrics));

    let rows = fuse(&metrics, &categories);
    let plot = table::plot(rows, headers(), TABLE_ID, TABLE_ID, report.ids());
    report.add_section(
        Section::new(&INFO, "read-quality", SectionContent::Table(plot)).description(DESCRIPTION),
    );
    Ok(())
}

/// Zip NanoStat metrics with alignment categories by position
fn fuse(metrics: &[(String, Value)], categories: &OrderedMap<AlignmentCategory>) -> TableRows {
    if metrics.len() != categories.len() {
        warn!(
            "NanoStat has {} metrics but minimap2 has {} categories; table is truncated",
            metrics.len(),
            categories.len()
        );
    }

    metrics
        .iter()
        .zip(categories.values())
        .map(|((metric, value), category)| {
            let mut cols = OrderedMap::new();
            cols.insert("ns_value", value.clone());
            cols.insert("mm_name", Value::String(category.name.clone()));
            cols.insert("absolute", json!(category.absolute));
            cols.insert("relative", json!(category.relative));
            (metric.clone(), cols)
        })
        .collect()
}

fn headers() -> OrderedMap<TableHeader> {
    let mut headers = OrderedMap::new();
    headers.insert("ns_value", TableHeader::new("Value", "metric value"));
    headers.insert("mm_name", TableHeader::new(" ", "metric name"));
    headers.insert(
        "absolute",
        TableHeader::new("N", "Base counts of each alignment category")
            .min(0.0)
            .scale("RdYlGn")
            .format("{:.2e}"),
    );
    headers.insert(
        "relative",
        TableHeader::new("%", "Fraction of total block alignment length")
            .min(0.0)
            .max(100.0),
    );
    headers
}

fn summary_data(categories: &OrderedMap<AlignmentCategory>, metrics: &[(String, Value)]) -> Value {
    let minimap2: Map<String, Value> = categories
        .iter()
        .map(|(name, c)| {
            (
                name.to_string(),
                json!({"absolute": c.absolute, "relative": c.relative}),
            )
        })
        .collect();
    let nanostats: Map<String, Value> = metrics.iter().cloned().collect();
    json!({"minimap2": minimap2, "nanostats": nanostats})
}
