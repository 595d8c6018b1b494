//! QUAST synteny plots: pipe coordinate dumps rasterized into one scatter
//! dataset per assembly.

use crate::core::ordered::OrderedMap;
use crate::core::series::PlotSeries;
use crate::core::types::DataLabel;
use crate::modules::{parse_or_skip, InputRole, ModuleError, ModuleInfo, ModuleInputs, ModuleSettings};
use crate::parsing::coords::parse_pipe_coords;
use crate::plot::config::PlotConfig;
use crate::plot::rasterize::{rasterize_segments, PointBudget, RasterConfig, SYNTENY_STEP_SIZE};
use crate::plot::scatter;
use crate::report::{Report, Section, SectionContent};
use crate::web::format_detection::InputKind;

pub const INFO: ModuleInfo = ModuleInfo {
    name: "Synteny plots",
    anchor: "mummerplot-module",
    href: Some("http://mummer.sourceforge.net/"),
    info: "Synteny plots were based on an alignment made using Nucmer (included in Quast).",
};

pub const ROLES: &[InputRole] = &[InputRole {
    name: "coords",
    kind: InputKind::PipeCoords,
    description: "QUAST synteny coordinate files",
}];

/// # Errors
///
/// Returns `ModuleError::NoData` if no file yields a point, or
/// `ModuleError::Raster` for a zero step size or too many points.
pub fn run(inputs: &ModuleInputs, settings: &ModuleSettings, report: &mut Report) -> Result<(), ModuleError> {
    let raster = RasterConfig::new(settings.step_size.unwrap_or(SYNTENY_STEP_SIZE))?;
    let mut budget = PointBudget::new();

    let mut samples: OrderedMap<PlotSeries> = OrderedMap::new();
    for file in inputs.files("coords") {
        let Some(segments) = parse_or_skip(file, |text| parse_pipe_coords(text, 0)) else {
            continue;
        };
        let name = file.sample_name.replace('_', " ");
        let series = rasterize_segments(name.clone(), &segments, &raster, &mut budget)?;
        samples.insert(name, series);
    }

    // Empty series stay in the plot but do not count as data
    if samples.values().all(PlotSeries::is_empty) {
        return Err(ModuleError::NoData(INFO.name));
    }

    let labels = samples.keys().map(DataLabel::versus_reference).collect();
    let datasets: Vec<Vec<PlotSeries>> = samples.into_iter().map(|(_, s)| vec![s]).collect();

    let config = PlotConfig::new("syntenyplot")
        .title("Synteny plot")
        .dense_markers()
        .square()
        .data_labels(labels);

    let plot = scatter::plot(&datasets, config, report.ids());
    report.add_section(Section::new(&INFO, "syntenyplot", SectionContent::Scatter(plot)));
    Ok(())
}
