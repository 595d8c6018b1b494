//! Jellyfish k-mer plots.
//!
//! Histograms become a frequency line plot. Two or more dumps become a
//! pairwise k-mer count comparison scatter plot over the full k-mer space.

use std::collections::BTreeSet;

use tracing::info;

use crate::core::ordered::OrderedMap;
use crate::core::series::{PlotSeries, RenderPoint};
use crate::core::types::{DataLabel, FWD_COLOR};
use crate::modules::{parse_or_skip, InputRole, ModuleError, ModuleInfo, ModuleInputs};
use crate::parsing::input::InputFile;
use crate::parsing::jellyfish::{all_kmers, parse_dump, parse_histogram, KmerCounts};
use crate::plot::config::PlotConfig;
use crate::plot::linegraph::{self, LineSeries};
use crate::plot::rasterize::PointBudget;
use crate::plot::scatter;
use crate::report::{Report, Section, SectionContent};
use crate::web::format_detection::InputKind;

pub const INFO: ModuleInfo = ModuleInfo {
    name: "Jellyfish",
    anchor: "jellyfish",
    href: Some("http://www.cbcb.umd.edu/software/jellyfish/"),
    info: "is a tool for fast, memory-efficient counting of k-mers in DNA.",
};

pub const ROLES: &[InputRole] = &[
    InputRole {
        name: "histogram",
        kind: InputKind::JellyfishHistogram,
        description: "jellyfish histo output",
    },
    InputRole {
        name: "dump",
        kind: InputKind::JellyfishDump,
        description: "jellyfish dump -c output",
    },
];

/// Below this peak occurrence the x axis is fixed at [`MIN_X_RANGE`]
const PEAK_THRESHOLD: u64 = 100;
const MIN_X_RANGE: u64 = 200;

const HISTOGRAM_HELP: &str = "\
A possible way to assess the complexity of a library even in absence of a \
reference sequence is to look at the k-mer profile of the reads. The idea is \
to count all the k-mers (i.e., sequences of length k) that occur in the reads. \
In this way it is possible to know how many k-mers occur 1, 2, ..., N times and \
represent this as a plot. This plot tells us for each x, how many k-mers \
(y-axis) are present in the dataset in exactly x copies.

In an ideal world (no errors in sequencing, no bias, no repeated regions) this \
plot should be as close as possible to a gaussian distribution. In reality we \
will always see a peak for x=1 (i.e., the errors) and another peak close to the \
expected coverage. If the genome is highly heterozygous a second peak at half \
of the coverage can be expected.";

/// Upper x bound for the histogram plot given the largest peak occurrence
#[must_use]
pub fn histogram_x_max(max_peak: u64) -> u64 {
    if max_peak < PEAK_THRESHOLD {
        MIN_X_RANGE
    } else {
        max_peak.saturating_mul(2)
    }
}

/// # Errors
///
/// Returns `ModuleError::NoData` if there is no histogram and fewer than two
/// dumps, `ModuleError::Inconsistent` if the dumps disagree on symbols or k,
/// or `ModuleError::Raster` if the comparison would have too many points.
pub fn run(inputs: &ModuleInputs, report: &mut Report) -> Result<(), ModuleError> {
    let mut histograms: OrderedMap<Vec<(f64, f64)>> = OrderedMap::new();
    let mut max_peak: u64 = 0;

    for file in inputs.files("histogram") {
        let Some(histogram) = parse_or_skip(file, parse_histogram) else {
            continue;
        };
        let Some(peak) = histogram.peak() else {
            continue;
        };
        max_peak = max_peak.max(peak);
        histograms.insert(file.sample_name.clone(), to_points(&histogram.bins));
    }

    let mut dumps: OrderedMap<(String, KmerCounts)> = OrderedMap::new();
    for file in inputs.files("dump") {
        if let Some(counts) = parse_or_skip(file, parse_dump) {
            dumps.insert(file.file_name.clone(), (dump_label(file), counts));
        }
    }

    if histograms.is_empty() && dumps.len() < 2 {
        return Err(ModuleError::NoData(INFO.name));
    }
    info!("Found {} histogram files", histograms.len());
    info!("Found {} count (dump) files", dumps.len());

    // Check the dumps before adding anything to the report
    let comparison = if dumps.len() >= 2 {
        Some(comparison_plot(&dumps)?)
    } else {
        None
    };

    if !histograms.is_empty() {
        frequencies_plot(histograms, histogram_x_max(max_peak), report);
    }
    if let Some((datasets, config)) = comparison {
        let plot = scatter::plot(&datasets, config, report.ids());
        report.add_section(
            Section::new(&INFO, "jellyfish_kmer_comparison_plot", SectionContent::Scatter(plot))
                .description(
                    "Compare how often k-mers occur in different assemblies and the reference genome.",
                ),
        );
    }
    Ok(())
}

#[allow(clippy::cast_precision_loss)] // counts fit in f64 mantissa
fn to_points(bins: &[(u64, u64)]) -> Vec<(f64, f64)> {
    bins.iter().map(|&(x, y)| (x as f64, y as f64)).collect()
}

/// File stem with underscores shown as spaces
fn dump_label(file: &InputFile) -> String {
    file.stem().replace('_', " ")
}

#[allow(clippy::cast_precision_loss)]
fn frequencies_plot(histograms: OrderedMap<Vec<(f64, f64)>>, x_max: u64, report: &mut Report) {
    let series = histograms
        .into_iter()
        .map(|(name, data)| LineSeries::new(name, data))
        .collect();

    let mut config = PlotConfig::new("Jellyfish_kmer_plot")
        .title("Jellyfish: K-mer plot")
        .axis_labels("k-mer frequency", "Counts");
    config.x_decimals = Some(false);
    config.xmin = Some(0.0);
    config.xmax = Some(x_max as f64);

    let plot = linegraph::plot(vec![series], config, report.ids());
    report.add_section(
        Section::new(&INFO, "jellyfish_kmer_plot", SectionContent::Line(plot))
            .description(
                "The K-mer plot lets you estimate library complexity and coverage from k-mer content.",
            )
            .helptext(HISTOGRAM_HELP),
    );
}

/// Scatter datasets comparing every unordered pair of dumps, in input order
#[allow(clippy::cast_precision_loss)]
fn comparison_plot(
    dumps: &OrderedMap<(String, KmerCounts)>,
) -> Result<(Vec<Vec<PlotSeries>>, PlotConfig), ModuleError> {
    let (symbols, k) = shared_space(dumps)?;
    let kmers = all_kmers(&symbols, k).map_err(|source| ModuleError::Parse {
        file: "jellyfish dumps".to_string(),
        source,
    })?;

    let entries: Vec<(&str, &(String, KmerCounts))> = dumps.iter().collect();
    let pairs = entries.len() * entries.len().saturating_sub(1) / 2;
    let per_pair = u64::try_from(kmers.len()).unwrap_or(u64::MAX);
    PointBudget::new().reserve(u64::try_from(pairs).unwrap_or(u64::MAX).saturating_mul(per_pair))?;
    let mut datasets = Vec::new();
    let mut labels = Vec::new();
    let mut max_value: u64 = 0;

    for (i, (name_a, (label_a, counts_a))) in entries.iter().enumerate() {
        for (name_b, (label_b, counts_b)) in &entries[i + 1..] {
            let pair_name = format!("{name_a} vs {name_b}");
            let points: Vec<RenderPoint> = kmers
                .iter()
                .map(|kmer| {
                    let x = counts_a.count(kmer);
                    max_value = max_value.max(x);
                    RenderPoint::new(x as f64, counts_b.count(kmer) as f64).with_name(kmer.as_str())
                })
                .collect();
            labels.push(DataLabel::new(pair_name.clone(), label_a.clone(), label_b.clone()));
            datasets.push(vec![PlotSeries::new(pair_name, points)]);
        }
    }

    let max = max_value as f64;
    let mut config = PlotConfig::new("jellyfish_kmer_scatterplot")
        .title("Jellyfish: K-mer plot")
        .x_range(0.0, max)
        .y_range(0.0, max)
        .square()
        .data_labels(labels);
    config.marker_size = Some(2.0);
    config.marker_line_color = Some("#FFF".to_string());
    config.marker_colour = Some(FWD_COLOR.to_string());

    Ok((datasets, config))
}

/// The symbol set and k shared by every dump
fn shared_space(dumps: &OrderedMap<(String, KmerCounts)>) -> Result<(BTreeSet<char>, usize), ModuleError> {
    let mut values = dumps.values().map(|(_, counts)| counts);
    let Some(first) = values.next() else {
        return Err(ModuleError::NoData(INFO.name));
    };

    for counts in values {
        if counts.symbols() != first.symbols() {
            return Err(ModuleError::Inconsistent(
                "Not all count files deal with the same symbols".to_string(),
            ));
        }
        if counts.k() != first.k() {
            return Err(ModuleError::Inconsistent(format!(
                "Found varying k-mer lengths in jellyfish files: {} and {}",
                first.k(),
                counts.k()
            )));
        }
    }
    Ok((first.symbols().clone(), first.k()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plot::rasterize::RasterError;
    use crate::plot::scatter::ScatterEntry;

    fn inputs(role: &str, files: &[(&str, &str)]) -> ModuleInputs {
        let mut inputs = ModuleInputs::new();
        for (name, content) in files {
            inputs.add(role, InputFile::from_text(*name, *content));
        }
        inputs
    }

    #[test]
    fn test_histogram_x_max() {
        assert_eq!(histogram_x_max(0), 200);
        assert_eq!(histogram_x_max(99), 200);
        assert_eq!(histogram_x_max(100), 200);
        assert_eq!(histogram_x_max(150), 300);
    }

    #[test]
    fn test_histogram_plot() {
        let inputs = inputs(
            "histogram",
            &[("reads.histo", "1 1000\n2 10\n30 50\n31 5\n1000 99999\n")],
        );
        let mut report = Report::new();
        run(&inputs, &mut report).unwrap();

        assert_eq!(report.sections.len(), 1);
        let section = &report.sections[0];
        assert_eq!(section.anchor, "jellyfish_kmer_plot");
        assert!(section.helptext.is_some());
        let SectionContent::Line(plot) = &section.content else {
            panic!("expected a line plot");
        };
        assert_eq!(plot.config.xmax, Some(200.0));
        assert_eq!(plot.config.x_decimals, Some(false));
        assert_eq!(plot.datasets[0][0].name, "reads");
        assert_eq!(
            plot.datasets[0][0].data,
            vec![(1.0, 1000.0), (2.0, 20.0), (30.0, 1500.0), (31.0, 155.0)]
        );
    }

    #[test]
    fn test_dump_comparison() {
        let inputs = inputs(
            "dump",
            &[
                ("ref_genome.dump", "AA 4\nAT 1\nTT 2\n"),
                ("canu.dump", "AA 3\nTA 7\n"),
                ("flye.dump", "TT 1\nAA 1\n"),
            ],
        );
        let mut report = Report::new();
        run(&inputs, &mut report).unwrap();

        assert_eq!(report.sections.len(), 1);
        let SectionContent::Scatter(plot) = &report.sections[0].content else {
            panic!("expected a scatter plot");
        };
        // 3 choose 2 pairs, each over AA AT TA TT
        assert_eq!(plot.datasets.len(), 3);
        assert!(plot.datasets.iter().all(|d| d.len() == 4));

        let label = &plot.config.data_labels[0];
        assert_eq!(label.name, "ref_genome.dump vs canu.dump");
        assert_eq!(label.xlab, "ref genome");
        assert_eq!(label.ylab, "canu");
        assert_eq!(plot.config.data_labels[2].name, "canu.dump vs flye.dump");

        let ScatterEntry::Point(first) = &plot.datasets[0][0] else {
            panic!("expected a point");
        };
        assert_eq!(first.name, "ref_genome.dump vs canu.dump: AA");
        assert_eq!((first.x, first.y), (4.0, 3.0));
        // Largest x over all pairs: canu TA = 7
        assert_eq!(plot.config.xmax, Some(7.0));
        assert_eq!(plot.config.marker_colour.as_deref(), Some(FWD_COLOR));
    }

    #[test]
    fn test_mismatched_symbols() {
        let inputs = inputs("dump", &[("a.dump", "AC 1\n"), ("b.dump", "AG 1\n")]);
        let mut report = Report::new();
        let result = run(&inputs, &mut report);
        assert!(matches!(result, Err(ModuleError::Inconsistent(_))));
        assert!(report.sections.is_empty());
    }

    #[test]
    fn test_mismatched_k() {
        let inputs = inputs("dump", &[("a.dump", "AC 1\nCA 2\n"), ("b.dump", "ACA 1\nCAC 3\n")]);
        let result = run(&inputs, &mut Report::new());
        assert!(matches!(result, Err(ModuleError::Inconsistent(_))));
    }

    #[test]
    fn test_comparison_point_limit() {
        // 4^10 k-mers for each of 66 pairs
        let mut inputs = ModuleInputs::new();
        for i in 0..12 {
            inputs.add("dump", InputFile::from_text(format!("asm_{i}.dump"), "ACGTACGTAC 1\n"));
        }
        let mut report = Report::new();
        let result = run(&inputs, &mut report);
        assert!(matches!(result, Err(ModuleError::Raster(RasterError::TooManyPoints(_)))));
        assert!(report.sections.is_empty());
    }

    #[test]
    fn test_single_dump_is_no_data() {
        let inputs = inputs("dump", &[("a.dump", "AC 1\n")]);
        let result = run(&inputs, &mut Report::new());
        assert!(matches!(result, Err(ModuleError::NoData(_))));
    }
}
