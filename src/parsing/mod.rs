//! Parsers for benchmark tool outputs.
//!
//! This module provides parsers for:
//!
//! - **Pipe coordinate dumps**: QUAST synteny files and nucmer `show-coords`
//! - **Alignment TSV**: minimap2-derived coordinate tables
//! - **Gnuplot data**: mummerplot `.fplot`/`.rplot` files
//! - **Jellyfish**: `histo` histograms and `dump -c` k-mer counts
//! - **CPU times**: YAML `tool: seconds` mappings
//! - **Read quality**: minimap2 alignment summaries and NanoStat reports
//! - **Methods**: publication info, tool versions, assembler scripts and logs
//!
//! Every parser takes the full file text and returns an immutable value.
//! Coordinate parsers are lenient: malformed lines are skipped.
//!
//! ## Example
//!
//! ```rust
//! use ab_report::parsing::coords::parse_pipe_coords;
//!
//! let text = "0 10000 | 0 10000\n10000 0 | 0 10000\n";
//! let segments = parse_pipe_coords(text, 0).unwrap();
//! assert_eq!(segments.len(), 2);
//! ```

use thiserror::Error;

pub mod alignment_tsv;
pub mod coords;
pub mod cpu_times;
pub mod gnuplot;
pub mod input;
pub mod jellyfish;
pub mod methods;
pub mod read_quality;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Too many segments: {0} exceeds maximum allowed (1000000)")]
    TooManySegments(usize),

    #[error("K-mer space too large: {symbols} symbols at k={k}")]
    KmerSpaceTooLarge { symbols: usize, k: usize },

    #[error("{file} decompresses to more than {limit} bytes")]
    DecompressedTooLarge { file: String, limit: u64 },
}
