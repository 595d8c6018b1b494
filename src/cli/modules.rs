use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use crate::cli::output::print_report;
use crate::cli::OutputFormat;
use crate::modules::{ModuleKind, ModuleInputs, ModuleSettings};
use crate::report::writer::write_report;
use crate::report::{DataFormat, Report};

/// Where and how to write report files
#[derive(Args)]
pub struct WriteArgs {
    /// Directory to write report.json and data files to
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Serialization of data files
    #[arg(long, value_enum, default_value = "json")]
    pub data_format: DataFormat,
}

#[derive(Args)]
pub struct SyntenyArgs {
    /// QUAST coords files (`|`-separated columns)
    #[arg(required = true)]
    pub coords: Vec<PathBuf>,

    /// Rasterization step along the reference axis
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub step_size: Option<u64>,

    #[command(flatten)]
    pub write: WriteArgs,
}

#[derive(Args)]
pub struct NucmerArgs {
    /// nucmer show-coords files
    #[arg(required = true)]
    pub coords: Vec<PathBuf>,

    #[command(flatten)]
    pub write: WriteArgs,
}

#[derive(Args)]
pub struct MummerplotArgs {
    /// Forward-strand gnuplot files (.fplot)
    #[arg(long)]
    pub fplot: Vec<PathBuf>,

    /// Reverse-strand gnuplot files (.rplot)
    #[arg(long)]
    pub rplot: Vec<PathBuf>,

    /// Rasterization step along the reference axis
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub step_size: Option<u64>,

    #[command(flatten)]
    pub write: WriteArgs,
}

#[derive(Args)]
pub struct Minimap2Args {
    /// Tab-separated alignment tables with a header row
    #[arg(required = true)]
    pub alignments: Vec<PathBuf>,

    /// Rasterization step along the reference axis
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub step_size: Option<u64>,

    /// Prefix removed from sample names in plot labels [default: minimap2_aligns_]
    #[arg(long)]
    pub label_prefix: Option<String>,

    #[command(flatten)]
    pub write: WriteArgs,
}

#[derive(Args)]
pub struct JellyfishArgs {
    /// Jellyfish histogram files (`occurrence count` lines)
    #[arg(long)]
    pub histogram: Vec<PathBuf>,

    /// Jellyfish dump files (`kmer count` lines); two or more for a comparison
    #[arg(long)]
    pub dump: Vec<PathBuf>,

    #[command(flatten)]
    pub write: WriteArgs,
}

#[derive(Args)]
pub struct CpuTimesArgs {
    /// YAML files mapping tool name to CPU seconds
    #[arg(required = true)]
    pub times: Vec<PathBuf>,

    #[command(flatten)]
    pub write: WriteArgs,
}

#[derive(Args)]
pub struct ReadQualityArgs {
    /// minimap2 alignment summary YAML
    #[arg(long, required = true)]
    pub minimap2: Vec<PathBuf>,

    /// NanoStat report
    #[arg(long, required = true)]
    pub nanostats: Vec<PathBuf>,

    #[command(flatten)]
    pub write: WriteArgs,
}

#[derive(Args)]
pub struct MethodsArgs {
    /// Publication info (`key="value"` lines)
    #[arg(long)]
    pub publication_info: Vec<PathBuf>,

    /// Analysis tool versions YAML
    #[arg(long)]
    pub tool_versions: Vec<PathBuf>,

    /// Assembler command scripts
    #[arg(long)]
    pub assembler_commands: Vec<PathBuf>,

    /// Assembler log files, matched to scripts by file stem
    #[arg(long)]
    pub log_files: Vec<PathBuf>,

    #[command(flatten)]
    pub write: WriteArgs,
}

pub fn run_synteny(args: SyntenyArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let settings = ModuleSettings {
        step_size: args.step_size,
        label_prefix: None,
    };
    run_module(
        ModuleKind::Synteny,
        &[("coords", &args.coords)],
        &settings,
        &args.write,
        format,
        verbose,
    )
}

pub fn run_nucmer(args: NucmerArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    run_module(
        ModuleKind::Nucmer,
        &[("coords", &args.coords)],
        &ModuleSettings::default(),
        &args.write,
        format,
        verbose,
    )
}

pub fn run_mummerplot(args: MummerplotArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    if args.fplot.is_empty() && args.rplot.is_empty() {
        anyhow::bail!("Provide at least one --fplot or --rplot file");
    }
    let settings = ModuleSettings {
        step_size: args.step_size,
        label_prefix: None,
    };
    run_module(
        ModuleKind::Mummerplot,
        &[("fplot", &args.fplot), ("rplot", &args.rplot)],
        &settings,
        &args.write,
        format,
        verbose,
    )
}

pub fn run_minimap2(args: Minimap2Args, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let settings = ModuleSettings {
        step_size: args.step_size,
        label_prefix: args.label_prefix,
    };
    run_module(
        ModuleKind::Minimap2,
        &[("alignments", &args.alignments)],
        &settings,
        &args.write,
        format,
        verbose,
    )
}

pub fn run_jellyfish(args: JellyfishArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    if args.histogram.is_empty() && args.dump.is_empty() {
        anyhow::bail!("Provide at least one --histogram or --dump file");
    }
    run_module(
        ModuleKind::Jellyfish,
        &[("histogram", &args.histogram), ("dump", &args.dump)],
        &ModuleSettings::default(),
        &args.write,
        format,
        verbose,
    )
}

pub fn run_cpu_times(args: CpuTimesArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    run_module(
        ModuleKind::CpuTimes,
        &[("times", &args.times)],
        &ModuleSettings::default(),
        &args.write,
        format,
        verbose,
    )
}

pub fn run_read_quality(args: ReadQualityArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    run_module(
        ModuleKind::ReadQuality,
        &[("minimap2", &args.minimap2), ("nanostats", &args.nanostats)],
        &ModuleSettings::default(),
        &args.write,
        format,
        verbose,
    )
}

pub fn run_methods(args: MethodsArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    run_module(
        ModuleKind::Methods,
        &[
            ("publication_info", &args.publication_info),
            ("tool_versions", &args.tool_versions),
            ("assembler_commands", &args.assembler_commands),
            ("log_files", &args.log_files),
        ],
        &ModuleSettings::default(),
        &args.write,
        format,
        verbose,
    )
}

fn run_module(
    kind: ModuleKind,
    roles: &[(&str, &Vec<PathBuf>)],
    settings: &ModuleSettings,
    write: &WriteArgs,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    let mut inputs = ModuleInputs::new();
    for (role, paths) in roles {
        inputs.load_paths(role, paths)?;
    }

    if verbose {
        eprintln!(
            "Running {} on {} files",
            kind,
            roles.iter().map(|(_, paths)| paths.len()).sum::<usize>()
        );
    }

    let mut report = Report::new();
    kind.run(&inputs, settings, &mut report)
        .with_context(|| format!("Module '{kind}' failed"))?;

    let written = match &write.output_dir {
        Some(dir) => write_report(&report, dir, write.data_format)
            .with_context(|| format!("Failed to write report to {}", dir.display()))?,
        None => Vec::new(),
    };

    print_report(&report, &written, format)
}
