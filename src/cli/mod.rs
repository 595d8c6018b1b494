//! Command-line interface for ab-report.
//!
//! This module implements the CLI using clap. Every report module has its own
//! subcommand; `report` runs several modules from a YAML run configuration and
//! `serve` starts the upload API.
//!
//! ## Usage
//!
//! ```text
//! # Synteny plot from QUAST coords files
//! ab-report synteny canu.coords flye.coords
//!
//! # Contig alignment plot, writing report files
//! ab-report minimap2 minimap2_aligns_*.tsv --label-prefix minimap2_aligns_ -o out/
//!
//! # mummerplot with forward and reverse files
//! ab-report mummerplot --fplot canu.fplot --rplot canu.rplot
//!
//! # Several modules at once
//! ab-report report --config run.yaml --data-format yaml
//!
//! # JSON output for scripting
//! ab-report cpu-times cpu.yaml --format json
//!
//! # Start the upload API
//! ab-report serve --port 8080 --open
//! ```

use clap::{Parser, Subcommand};

pub mod modules;
pub mod output;
pub mod report;

#[derive(Parser)]
#[command(name = "ab-report")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Turn de novo assembler benchmark outputs into report sections")]
#[command(
    long_about = "ab-report parses the outputs of a de novo assembler benchmark (QUAST/nucmer coords, mummerplot, minimap2 alignments, Jellyfish, NanoStat, CPU times and pipeline scripts) into report sections.\n\nEach section carries plot data ready for rendering:\n- Synteny and contig alignment scatter plots\n- k-mer histograms and pairwise k-mer comparisons\n- Read quality tables and a methods text"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Synteny scatter plot from QUAST coords files
    Synteny(modules::SyntenyArgs),

    /// Synteny line plot from nucmer show-coords files
    Nucmer(modules::NucmerArgs),

    /// Synteny scatter plot from mummerplot .fplot/.rplot files
    Mummerplot(modules::MummerplotArgs),

    /// Contig alignment plot from minimap2 alignment tables
    Minimap2(modules::Minimap2Args),

    /// k-mer histograms and pairwise k-mer comparisons
    Jellyfish(modules::JellyfishArgs),

    /// CPU times per tool as a general statistics column
    CpuTimes(modules::CpuTimesArgs),

    /// Raw read quality table from NanoStat and minimap2 summaries
    ReadQuality(modules::ReadQualityArgs),

    /// Methods text from publication info, tool versions and pipeline scripts
    Methods(modules::MethodsArgs),

    /// Run several modules from a YAML run configuration
    Report(report::ReportArgs),

    /// Start the web server
    Serve(ServeArgs),
}

#[derive(clap::Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(short, long, default_value = "8080")]
    pub port: u16,

    /// Address to bind to
    #[arg(short, long, default_value = "127.0.0.1")]
    pub address: String,

    /// Open browser automatically
    #[arg(long)]
    pub open: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}
