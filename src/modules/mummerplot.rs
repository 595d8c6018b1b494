//! mummerplot synteny plots from gnuplot `.fplot`/`.rplot` files.
//!
//! The forward and reverse files of one assembly are merged into a single
//! dataset, forward points first.

use std::collections::BTreeMap;

use crate::core::series::{PlotSeries, RenderPoint};
use crate::core::types::{DataLabel, Orientation};
use crate::modules::{parse_or_skip, InputRole, ModuleError, ModuleInfo, ModuleInputs, ModuleSettings};
use crate::parsing::gnuplot::parse_gnuplot_segments;
use crate::plot::config::PlotConfig;
use crate::plot::rasterize::{
    rasterize_segments, OrientationPolicy, PointBudget, RasterConfig, SYNTENY_STEP_SIZE,
};
use crate::plot::scatter;
use crate::report::{Report, Section, SectionContent};
use crate::web::format_detection::InputKind;

pub const INFO: ModuleInfo = ModuleInfo {
    name: "Synteny plots",
    anchor: "syntenyplot-module",
    href: None,
    info: "were generated based on alignment by Nucmer, as included in Quast.",
};

pub const ROLES: &[InputRole] = &[
    InputRole {
        name: "fplot",
        kind: InputKind::Gnuplot,
        description: "Forward-strand mummerplot data (.fplot)",
    },
    InputRole {
        name: "rplot",
        kind: InputKind::Gnuplot,
        description: "Reverse-strand mummerplot data (.rplot)",
    },
];

#[derive(Default)]
struct StrandPoints {
    fwd: Vec<RenderPoint>,
    rev: Vec<RenderPoint>,
}

/// # Errors
///
/// Returns `ModuleError::NoData` if there are no fplot or rplot files, or
/// `ModuleError::Raster` for a zero step size or too many points.
pub fn run(inputs: &ModuleInputs, settings: &ModuleSettings, report: &mut Report) -> Result<(), ModuleError> {
    let step_size = settings.step_size.unwrap_or(SYNTENY_STEP_SIZE);
    let base = RasterConfig::new(step_size)?.with_point_labels(true);
    let mut budget = PointBudget::new();

    // Sorted by sample name
    let mut samples: BTreeMap<String, StrandPoints> = BTreeMap::new();
    let mut found = false;

    for (role, orientation) in [("fplot", Orientation::Fwd), ("rplot", Orientation::Rev)] {
        let raster = base.with_policy(OrientationPolicy::Fixed(orientation));
        for file in inputs.files(role) {
            let Some(segments) = parse_or_skip(file, parse_gnuplot_segments) else {
                continue;
            };
            found = true;
            let series = rasterize_segments(file.sample_name.clone(), &segments, &raster, &mut budget)?;
            let entry = samples.entry(file.sample_name.clone()).or_default();
            match orientation {
                Orientation::Fwd => entry.fwd = series.points,
                Orientation::Rev => entry.rev = series.points,
            }
        }
    }

    if !found {
        return Err(ModuleError::NoData(INFO.name));
    }

    let labels = samples.keys().map(DataLabel::versus_reference).collect();
    let datasets: Vec<Vec<PlotSeries>> = samples
        .into_iter()
        .map(|(name, mut strands)| {
            strands.fwd.append(&mut strands.rev);
            vec![PlotSeries::new(name, strands.fwd)]
        })
        .collect();

    let config = PlotConfig::new("mummerplot")
        .dense_markers()
        .square()
        .data_labels(labels);

    let plot = scatter::plot(&datasets, config, report.ids());
    report.add_section(Section::new(&INFO, "mummerplot", SectionContent::Scatter(plot)));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{FWD_COLOR, REV_COLOR};
    use crate::parsing::input::InputFile;
    use crate::plot::scatter::ScatterEntry;

    #[test]
    fn test_forward_and_reverse_merged() {
        let mut inputs = ModuleInputs::new();
        inputs.add("rplot", InputFile::from_text("flye.rplot", "#-- rev\n9000 0 1\n0 9000 1\n\n\n"));
        inputs.add("fplot", InputFile::from_text("flye.fplot", "#-- fwd\n0 0 1\n4000 4000 1\n\n\n"));
        inputs.add("fplot", InputFile::from_text("canu.fplot", "0 0 1\n100 100 1\n"));

        let mut report = Report::new();
        run(&inputs, &ModuleSettings::default(), &mut report).unwrap();

        let SectionContent::Scatter(plot) = &report.sections[0].content else {
            panic!("expected a scatter plot");
        };
        let labels: Vec<&str> = plot.config.data_labels.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(labels, vec!["canu", "flye"]);

        let flye: Vec<(String, Option<String>)> = plot.datasets[1]
            .iter()
            .map(|entry| match entry {
                ScatterEntry::Point(p) => (p.name.clone(), p.color.clone()),
                ScatterEntry::Series(_) => panic!("unexpected series"),
            })
            .collect();
        // 2 forward points, then 3 reverse points
        assert_eq!(flye.len(), 5);
        assert_eq!(flye[0], ("flye: fwd".to_string(), Some(FWD_COLOR.to_string())));
        assert_eq!(flye[2], ("flye: rev".to_string(), Some(REV_COLOR.to_string())));
    }

    #[test]
    fn test_comment_only_files_still_count() {
        let mut inputs = ModuleInputs::new();
        inputs.add("rplot", InputFile::from_text("asm.rplot", "#-- reverse hits\n"));
        let mut report = Report::new();
        run(&inputs, &ModuleSettings::default(), &mut report).unwrap();
        assert_eq!(report.sections.len(), 1);
    }

    #[test]
    fn test_no_files_is_no_data() {
        let result = run(&ModuleInputs::new(), &ModuleSettings::default(), &mut Report::new());
        assert!(matches!(result, Err(ModuleError::NoData(_))));
    }
}
