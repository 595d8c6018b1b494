//! Contig alignment plots from minimap2-derived coordinate tables.

use crate::core::segment::AxisRange;
use crate::core::series::PlotSeries;
use crate::core::types::DataLabel;
use crate::modules::{parse_or_skip, InputRole, ModuleError, ModuleInfo, ModuleInputs, ModuleSettings};
use crate::parsing::alignment_tsv::parse_alignment_tsv;
use crate::plot::config::PlotConfig;
use crate::plot::rasterize::{rasterize_tracking, PointBudget, RasterConfig, ALIGNMENT_STEP_SIZE};
use crate::plot::scatter;
use crate::report::{Report, Section, SectionContent};
use crate::web::format_detection::InputKind;

pub const INFO: ModuleInfo = ModuleInfo {
    name: "Alignment plots",
    anchor: "alignmentplot-module",
    href: None,
    info: "were based on an alignment made using minimap2.",
};

pub const ROLES: &[InputRole] = &[InputRole {
    name: "alignments",
    kind: InputKind::AlignmentTsv,
    description: "Tab-separated contig alignment coordinates",
}];

/// Removed from sample names when no prefix is configured
pub const DEFAULT_LABEL_PREFIX: &str = "minimap2_aligns_";

/// Sample name with `prefix` removed, for display
fn display_name<'a>(sample: &'a str, prefix: Option<&str>) -> &'a str {
    prefix
        .and_then(|p| sample.strip_prefix(p))
        .filter(|rest| !rest.is_empty())
        .unwrap_or(sample)
}

/// # Errors
///
/// Returns `ModuleError::NoData` if no file yields a point, or
/// `ModuleError::Raster` for a zero step size or too many points.
#[allow(clippy::cast_precision_loss)] // genomic coordinates fit in f64 mantissa
pub fn run(inputs: &ModuleInputs, settings: &ModuleSettings, report: &mut Report) -> Result<(), ModuleError> {
    let raster = RasterConfig::new(settings.step_size.unwrap_or(ALIGNMENT_STEP_SIZE))?;
    let prefix = Some(settings.label_prefix.as_deref().unwrap_or(DEFAULT_LABEL_PREFIX));
    let mut budget = PointBudget::new();

    let mut range = AxisRange::new();
    let mut datasets: Vec<Vec<PlotSeries>> = Vec::new();
    let mut labels = Vec::new();

    for file in inputs.files("alignments") {
        let Some(segments) = parse_or_skip(file, parse_alignment_tsv) else {
            continue;
        };
        let mut file_range = AxisRange::new();
        let series = rasterize_tracking(
            file.sample_name.clone(),
            &segments,
            &raster,
            &mut budget,
            &mut file_range,
        )?;
        if series.is_empty() {
            continue;
        }
        range.merge(&file_range);
        labels.push(DataLabel::versus_reference(display_name(&file.sample_name, prefix)));
        datasets.push(vec![series]);
    }

    if datasets.is_empty() {
        return Err(ModuleError::NoData(INFO.name));
    }

    let max = range.square_max() as f64;
    let config = PlotConfig::new("contig_alignment_plot")
        .title("Contig alignment plot")
        .dense_markers()
        .square()
        .x_range(0.0, max)
        .y_range(0.0, max)
        .data_labels(labels);

    let plot = scatter::plot(&datasets, config, report.ids());
    report.add_section(Section::new(
        &INFO,
        "contig_alignment_plots",
        SectionContent::Scatter(plot),
    ));
    Ok(())
}
