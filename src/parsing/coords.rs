//! Parser for pipe-delimited alignment coordinate dumps.
//!
//! Each data line reads `<x_start> <x_stop> | <y_start> <y_stop> [| ...]`,
//! the layout shared by QUAST synteny files and nucmer `show-coords` output.
//! Anything after the second `|`-separated field is ignored.

use tracing::debug;

use crate::core::segment::AlignmentSegment;
use crate::parsing::ParseError;
use crate::utils::validation::check_segment_limit;

/// Header lines at the top of a nucmer coords file
pub const NUCMER_HEADER_LINES: usize = 2;

/// Parse pipe-delimited coordinates after skipping `skip_lines` header lines.
///
/// Lines with missing columns or non-numeric coordinates are skipped.
///
/// # Errors
///
/// Returns `ParseError::TooManySegments` if the segment limit is exceeded.
pub fn parse_pipe_coords(text: &str, skip_lines: usize) -> Result<Vec<AlignmentSegment>, ParseError> {
    let mut segments = Vec::new();

    for (i, line) in text.lines().enumerate().skip(skip_lines) {
        if line.trim().is_empty() {
            continue;
        }

        let Some(segment) = parse_pipe_line(line) else {
            debug!("Skipping malformed coordinate line {}: '{}'", i + 1, line);
            continue;
        };

        if check_segment_limit(segments.len()).is_some() {
            return Err(ParseError::TooManySegments(segments.len()));
        }
        segments.push(segment);
    }

    Ok(segments)
}

fn parse_pipe_line(line: &str) -> Option<AlignmentSegment> {
    let mut fields = line.split('|');
    let (x_start, x_stop) = parse_pair(fields.next()?)?;
    let (y_start, y_stop) = parse_pair(fields.next()?)?;
    Some(AlignmentSegment::new(x_start, x_stop, y_start, y_stop))
}

/// First two whitespace-separated integers of a field
fn parse_pair(field: &str) -> Option<(i64, i64)> {
    let mut values = field.split_whitespace();
    let start = values.next()?.parse().ok()?;
    let stop = values.next()?.parse().ok()?;
    Some((start, stop))
}
