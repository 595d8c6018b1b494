//! Parser for mummerplot gnuplot data files (`.fplot`, `.rplot`).
//!
//! Comment lines start with `#`. Each segment is a block of two lines,
//! `x y value`, and blocks are separated by blank lines.

use tracing::debug;

use crate::core::segment::AlignmentSegment;
use crate::parsing::ParseError;
use crate::utils::validation::check_segment_limit;

/// Parse gnuplot segment blocks. Blocks that are not exactly two numeric
/// lines are skipped.
///
/// # Errors
///
/// Returns `ParseError::TooManySegments` if the segment limit is exceeded.
pub fn parse_gnuplot_segments(text: &str) -> Result<Vec<AlignmentSegment>, ParseError> {
    let mut segments = Vec::new();
    let mut block: Vec<&str> = Vec::new();

    let lines = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.starts_with('#'))
        .chain(std::iter::once(""));

    for line in lines {
        if !line.is_empty() {
            block.push(line);
            continue;
        }
        if block.is_empty() {
            continue;
        }

        match parse_block(&block) {
            Some(segment) => {
                if check_segment_limit(segments.len()).is_some() {
                    return Err(ParseError::TooManySegments(segments.len()));
                }
                segments.push(segment);
            }
            None => debug!("Skipping malformed gnuplot block: {:?}", block),
        }
        block.clear();
    }

    Ok(segments)
}

fn parse_block(block: &[&str]) -> Option<AlignmentSegment> {
    let [start, stop] = block else {
        return None;
    };
    let (x_start, y_start) = parse_point(start)?;
    let (x_stop, y_stop) = parse_point(stop)?;
    Some(AlignmentSegment::new(x_start, x_stop, y_start, y_stop))
}

fn parse_point(line: &str) -> Option<(i64, i64)> {
    let mut fields = line.split_whitespace();
    let x = fields.next()?.parse().ok()?;
    let y = fields.next()?.parse().ok()?;
    Some((x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fplot() {
        let text = "#-- forward hits sorted by %sim\n\
                    0 0 100\n\
                    10000 10050 100\n\
                    \n\
                    \n\
                    20000 30000 95.5\n\
                    25000 35000 95.5\n\
                    \n\
                    \n";
        let segments = parse_gnuplot_segments(text).unwrap();
        assert_eq!(
            segments,
            vec![
                AlignmentSegment::new(0, 10000, 0, 10050),
                AlignmentSegment::new(20000, 25000, 30000, 35000),
            ]
        );
    }

    #[test]
    fn test_trailing_block_without_blank_line() {
        let segments = parse_gnuplot_segments("5 9 1\n1 2 1").unwrap();
        assert_eq!(segments, vec![AlignmentSegment::new(5, 1, 9, 2)]);
    }

    #[test]
    fn test_malformed_blocks_skipped() {
        let text = "1 2 3\n\n\n1 2 3\n4 5 6\n7 8 9\n\n\na b c\n1 1 1\n\n\n10 20 1\n30 40 1\n";
        let segments = parse_gnuplot_segments(text).unwrap();
        assert_eq!(segments, vec![AlignmentSegment::new(10, 30, 20, 40)]);
    }

    #[test]
    fn test_comments_only() {
        assert!(parse_gnuplot_segments("#-- reverse hits\n#\n")
            .unwrap()
            .is_empty());
    }
}
