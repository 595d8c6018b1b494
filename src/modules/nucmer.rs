//! nucmer synteny line plot: every alignment becomes a two-point line,
//! colored by orientation.

use tracing::debug;

use crate::core::ordered::OrderedMap;
use crate::core::types::DataLabel;
use crate::modules::{parse_or_skip, InputRole, ModuleError, ModuleInfo, ModuleInputs};
use crate::parsing::coords::{parse_pipe_coords, NUCMER_HEADER_LINES};
use crate::plot::config::PlotConfig;
use crate::plot::linegraph::{self, LineSeries};
use crate::report::{Report, Section, SectionContent};
use crate::web::format_detection::InputKind;

pub const INFO: ModuleInfo = ModuleInfo {
    name: "Synteny plots",
    anchor: "syntenyplot-module",
    href: None,
    info: "Synteny plots were based on an alignment made using Nucmer.",
};

pub const ROLES: &[InputRole] = &[InputRole {
    name: "coords",
    kind: InputKind::PipeCoords,
    description: "nucmer show-coords output",
}];

/// # Errors
///
/// Returns `ModuleError::NoData` if no file has a usable alignment.
#[allow(clippy::cast_precision_loss)] // genomic coordinates fit in f64 mantissa
pub fn run(inputs: &ModuleInputs, report: &mut Report) -> Result<(), ModuleError> {
    let mut samples: OrderedMap<Vec<LineSeries>> = OrderedMap::new();

    for file in inputs.files("coords") {
        let Some(segments) = parse_or_skip(file, |text| parse_pipe_coords(text, NUCMER_HEADER_LINES))
        else {
            continue;
        };

        let lines: Vec<LineSeries> = segments
            .iter()
            .filter_map(|segment| {
                let Some(orientation) = segment.orientation() else {
                    debug!("Skipping zero-length alignment in {}", file.file_name);
                    return None;
                };
                let data = vec![
                    (segment.x_start as f64, segment.y_start as f64),
                    (segment.x_stop as f64, segment.y_stop as f64),
                ];
                Some(LineSeries::new(orientation.label(), data).with_color(orientation.color()))
            })
            .collect();

        if !lines.is_empty() {
            samples.insert(file.sample_name.clone(), lines);
        }
    }

    if samples.is_empty() {
        return Err(ModuleError::NoData(INFO.name));
    }

    let labels = samples.keys().map(DataLabel::versus_reference).collect();
    let datasets = samples.into_iter().map(|(_, lines)| lines).collect();

    let mut config = PlotConfig::new("mummerplot")
        .title("nucmer: synteny plot")
        .square()
        .data_labels(labels);
    config.enable_mouse_tracking = Some(false);

    let plot = linegraph::plot(datasets, config, report.ids());
    report.add_section(Section::new(&INFO, "mummerplot", SectionContent::Line(plot)));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{FWD_COLOR, REV_COLOR};
    use crate::parsing::input::InputFile;

    const COORDS: &str = "/ref.fasta /asm.fasta\n\
                          NUCMER\n\
                          1 12000 | 5 12004 | 12000 12000 | 99.5 | chr1 tig1\n\
                          50000 40001 | 700 10699 | 10000 10000 | 98.2 | chr1 tig2\n";

    #[test]
    fn test_lines_per_alignment() {
        let mut inputs = ModuleInputs::new();
        inputs.add("coords", InputFile::from_text("canu.coords", COORDS));
        inputs.add("coords", InputFile::from_text("empty.coords", "header\nNUCMER\n"));

        let mut report = Report::new();
        run(&inputs, &mut report).unwrap();

        let SectionContent::Line(plot) = &report.sections[0].content else {
            panic!("expected a line plot");
        };
        // Samples without alignments are left out
        assert_eq!(plot.datasets.len(), 1);
        assert_eq!(plot.config.data_labels[0].name, "canu");

        let lines = &plot.datasets[0];
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].name, "fwd");
        assert_eq!(lines[0].color.as_deref(), Some(FWD_COLOR));
        assert_eq!(lines[0].data, vec![(1.0, 5.0), (12000.0, 12004.0)]);
        assert_eq!(lines[1].name, "rev");
        assert_eq!(lines[1].color.as_deref(), Some(REV_COLOR));
        assert_eq!(plot.config.title.as_deref(), Some("nucmer: synteny plot"));
    }

    #[test]
    fn test_no_alignments_is_no_data() {
        let mut inputs = ModuleInputs::new();
        inputs.add("coords", InputFile::from_text("a.coords", "h\nh\n5 5 | 1 2\n"));
        let result = run(&inputs, &mut Report::new());
        assert!(matches!(result, Err(ModuleError::NoData(_))));
    }
}
