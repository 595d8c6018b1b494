//! Parser for tab-delimited alignment coordinate tables.
//!
//! The first row is a header. Rows need at least five columns; the first four
//! are `x_start, x_stop, y_start, y_stop`.

use tracing::debug;

use crate::core::segment::AlignmentSegment;
use crate::parsing::ParseError;
use crate::utils::validation::check_segment_limit;

/// Minimum number of columns for a row to be considered
pub const MIN_COLUMNS: usize = 5;

/// Parse an alignment TSV.
///
/// Short rows and rows with non-numeric coordinates are skipped.
///
/// # Errors
///
/// Returns `ParseError::Csv` if the text cannot be read as delimited records,
/// or `ParseError::TooManySegments` if the segment limit is exceeded.
pub fn parse_alignment_tsv(text: &str) -> Result<Vec<AlignmentSegment>, ParseError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut segments = Vec::new();

    for (i, record) in reader.records().enumerate() {
        let record = record?;
        if record.len() < MIN_COLUMNS {
            continue;
        }

        let coords: Option<Vec<i64>> = record
            .iter()
            .take(4)
            .map(|field| field.trim().parse().ok())
            .collect();
        let Some(coords) = coords else {
            // Header is row 1
            debug!("Skipping non-numeric alignment row {}", i + 2);
            continue;
        };

        if check_segment_limit(segments.len()).is_some() {
            return Err(ParseError::TooManySegments(segments.len()));
        }
        segments.push(AlignmentSegment::new(
            coords[0], coords[1], coords[2], coords[3],
        ));
    }

    Ok(segments)
}
