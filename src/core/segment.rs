use serde::{Deserialize, Serialize};

use crate::core::types::Orientation;

/// One matched block between a reference axis (x) and a query axis (y).
///
/// Coordinates are kept as reported; `x_start > x_stop` is a reverse-strand
/// segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AlignmentSegment {
    pub x_start: i64,
    pub x_stop: i64,
    pub y_start: i64,
    pub y_stop: i64,
}

impl AlignmentSegment {
    #[must_use]
    pub fn new(x_start: i64, x_stop: i64, y_start: i64, y_stop: i64) -> Self {
        Self {
            x_start,
            x_stop,
            y_start,
            y_stop,
        }
    }

    /// A segment with no extent on the reference axis has no slope
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.x_start == self.x_stop
    }

    /// Slope of the segment, or `None` when degenerate
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // genomic coordinates fit in f64 mantissa
    pub fn slope(&self) -> Option<f64> {
        if self.is_degenerate() {
            return None;
        }
        // i64 differences can overflow
        let dy = (i128::from(self.y_stop) - i128::from(self.y_start)) as f64;
        let dx = (i128::from(self.x_stop) - i128::from(self.x_start)) as f64;
        Some(dy / dx)
    }

    #[must_use]
    pub fn orientation(&self) -> Option<Orientation> {
        self.slope().map(Orientation::from_slope)
    }

    /// Largest coordinate on either axis
    #[must_use]
    pub fn max_coord(&self) -> i64 {
        self.x_start
            .max(self.x_stop)
            .max(self.y_start)
            .max(self.y_stop)
    }
}

/// Running minimum and maximum of segment coordinates on both axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AxisRange {
    pub x_min: Option<i64>,
    pub x_max: Option<i64>,
    pub y_min: Option<i64>,
    pub y_max: Option<i64>,
}

impl AxisRange {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn include(&mut self, segment: &AlignmentSegment) {
        for x in [segment.x_start, segment.x_stop] {
            self.x_min = Some(self.x_min.map_or(x, |m| m.min(x)));
            self.x_max = Some(self.x_max.map_or(x, |m| m.max(x)));
        }
        for y in [segment.y_start, segment.y_stop] {
            self.y_min = Some(self.y_min.map_or(y, |m| m.min(y)));
            self.y_max = Some(self.y_max.map_or(y, |m| m.max(y)));
        }
    }

    pub fn merge(&mut self, other: &AxisRange) {
        let min = |a: Option<i64>, b: Option<i64>| match (a, b) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        let max = |a: Option<i64>, b: Option<i64>| match (a, b) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
        self.x_min = min(self.x_min, other.x_min);
        self.x_max = max(self.x_max, other.x_max);
        self.y_min = min(self.y_min, other.y_min);
        self.y_max = max(self.y_max, other.y_max);
    }

    /// Largest value on either axis, or 0 when nothing was included.
    /// Used as the shared bound of square plots.
    #[must_use]
    pub fn square_max(&self) -> i64 {
        self.x_max.unwrap_or(0).max(self.y_max.unwrap_or(0)).max(0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x_max.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slope_and_orientation() {
        let fwd = AlignmentSegment::new(0, 100, 0, 50);
        assert_eq!(fwd.slope(), Some(0.5));
        assert_eq!(fwd.orientation(), Some(Orientation::Fwd));

        // Both deltas negative is still forward
        let fwd_desc = AlignmentSegment::new(100, 0, 50, 0);
        assert_eq!(fwd_desc.orientation(), Some(Orientation::Fwd));

        let rev = AlignmentSegment::new(100, 0, 0, 50);
        assert_eq!(rev.orientation(), Some(Orientation::Rev));

        let flat = AlignmentSegment::new(0, 100, 7, 7);
        assert_eq!(flat.orientation(), Some(Orientation::Rev));
    }

    #[test]
    fn test_extreme_coordinates_slope() {
        let seg = AlignmentSegment::new(-9_000_000_000_000_000_000, 9_000_000_000_000_000_000, 0, 1);
        assert!(seg.slope().unwrap() > 0.0);
        assert_eq!(seg.orientation(), Some(Orientation::Fwd));

        let seg = AlignmentSegment::new(0, 1, i64::MAX, i64::MIN);
        assert!(seg.slope().unwrap() < 0.0);
        assert_eq!(seg.orientation(), Some(Orientation::Rev));
    }

    #[test]
    fn test_degenerate_segment_has_no_slope() {
        let seg = AlignmentSegment::new(100, 100, 0, 500);
        assert!(seg.is_degenerate());
        assert_eq!(seg.slope(), None);
        assert_eq!(seg.orientation(), None);
    }

    #[test]
    fn test_axis_range_tracks_both_axes() {
        let mut range = AxisRange::new();
        assert!(range.is_empty());
        assert_eq!(range.square_max(), 0);

        range.include(&AlignmentSegment::new(500, 100, 20, 9_000));
        range.include(&AlignmentSegment::new(40, 700, 300, 10));

        assert_eq!(range.x_min, Some(40));
        assert_eq!(range.x_max, Some(700));
        assert_eq!(range.y_min, Some(10));
        assert_eq!(range.y_max, Some(9_000));
        assert_eq!(range.square_max(), 9_000);
    }

    #[test]
    fn test_axis_range_merge() {
        let mut a = AxisRange::new();
        a.include(&AlignmentSegment::new(0, 10, 0, 10));
        let mut b = AxisRange::new();
        b.include(&AlignmentSegment::new(-5, 20, 3, 4));

        a.merge(&b);
        assert_eq!(a.x_min, Some(-5));
        assert_eq!(a.x_max, Some(20));
        assert_eq!(a.y_max, Some(10));

        let mut empty = AxisRange::new();
        empty.merge(&a);
        assert_eq!(empty, a);
    }
}
