//! # ab-report
//!
//! A library for turning de novo assembler benchmark outputs into report
//! sections.
//!
//! A benchmark run leaves behind alignment coordinates, mummerplot data,
//! Jellyfish k-mer counts, read quality summaries, CPU times and the pipeline
//! scripts themselves. `ab-report` parses each of these into plot data,
//! tables and text that a report renderer can display directly.
//!
//! ## Features
//!
//! - **Segment rasterization**: Samples alignment segments at a fixed step so
//!   they can be drawn as scatter plots
//! - **Synteny plots**: From QUAST coords, nucmer coords and mummerplot files
//! - **Contig alignment plots**: From minimap2 alignment tables, on a square axis
//! - **k-mer plots**: Jellyfish histograms and pairwise k-mer count comparisons
//! - **Tables and text**: Read quality, CPU times and a methods section
//!
//! ## Example
//!
//! ```rust
//! use ab_report::modules::{ModuleInputs, ModuleKind, ModuleSettings};
//! use ab_report::parsing::input::InputFile;
//! use ab_report::report::Report;
//!
//! let mut inputs = ModuleInputs::new();
//! inputs.add(
//!     "coords",
//!     InputFile::from_text("canu.coords", "header\n1 12000 | 5 12004 | chr1 tig1\n"),
//! );
//!
//! let mut report = Report::new();
//! ModuleKind::Synteny
//!     .run(&inputs, &ModuleSettings::default(), &mut report)
//!     .unwrap();
//!
//! for section in &report.sections {
//!     println!("{}: {} points", section.anchor, section.content.item_count());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Segments, orientations and plot series
//! - [`parsing`]: Parsers for every benchmark input format
//! - [`plot`]: Rasterizer and scatter, line and table builders
//! - [`modules`]: Report modules, one per benchmark tool output
//! - [`report`]: The assembled report and its writer
//! - [`config`]: YAML run configuration
//! - [`cli`]: Command-line interface implementation
//! - [`web`]: Web server for running modules on uploads

pub mod cli;
pub mod config;
pub mod core;
pub mod modules;
pub mod parsing;
pub mod plot;
pub mod report;
pub mod utils;
pub mod web;

// Re-export commonly used types for convenience
pub use core::segment::AlignmentSegment;
pub use core::types::*;
pub use modules::{ModuleError, ModuleInputs, ModuleKind, ModuleSettings};
pub use report::{Report, Section, SectionContent};
