//! Step-sampling of alignment segments into render points.
//!
//! Every non-degenerate segment becomes a run of points starting at
//! `(x_start, y_start)`, stepping by `step_size` along the reference axis
//! toward `x_stop`, and always ending at exactly `(x_stop, y_stop)`.

use thiserror::Error;

use crate::core::segment::{AlignmentSegment, AxisRange};
use crate::core::series::{PlotSeries, RenderPoint};
use crate::core::types::Orientation;
use crate::utils::validation::check_point_limit;

/// Default step for synteny and mummerplot plots
pub const SYNTENY_STEP_SIZE: u64 = 5_000;

/// Default step for minimap2 contig alignment plots
pub const ALIGNMENT_STEP_SIZE: u64 = 10_000;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RasterError {
    #[error("Step size must be a positive integer")]
    InvalidStepSize,

    #[error("{0}")]
    TooManyPoints(String),
}

/// Points emitted so far in one module run, bounded by
/// [`MAX_POINTS`](crate::utils::validation::MAX_POINTS)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PointBudget {
    used: u64,
}

impl PointBudget {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve room for `count` more points.
    ///
    /// # Errors
    ///
    /// Returns `RasterError::TooManyPoints` if the run would exceed the limit.
    pub fn reserve(&mut self, count: u64) -> Result<(), RasterError> {
        if let Some(message) = check_point_limit(self.used, count) {
            return Err(RasterError::TooManyPoints(message));
        }
        self.used += count;
        Ok(())
    }

    #[must_use]
    pub fn used(&self) -> u64 {
        self.used
    }
}

/// How each segment's orientation tag is decided
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrientationPolicy {
    /// Forward when the slope is strictly positive, reverse otherwise
    BySlope,
    /// Every segment gets the same tag (input already split by strand)
    Fixed(Orientation),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterConfig {
    step_size: u64,
    pub policy: OrientationPolicy,
    /// Attach the orientation label (`fwd`/`rev`) as each point's name
    pub label_points: bool,
}

impl RasterConfig {
    /// # Errors
    ///
    /// Returns `RasterError::InvalidStepSize` if `step_size` is zero.
    pub fn new(step_size: u64) -> Result<Self, RasterError> {
        if step_size == 0 {
            return Err(RasterError::InvalidStepSize);
        }
        Ok(Self {
            step_size,
            policy: OrientationPolicy::BySlope,
            label_points: false,
        })
    }

    #[must_use]
    pub fn with_policy(mut self, policy: OrientationPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn with_point_labels(mut self, label_points: bool) -> Self {
        self.label_points = label_points;
        self
    }

    #[must_use]
    pub fn step_size(&self) -> u64 {
        self.step_size
    }
}

/// Number of positions [`sample_positions`] yields, computed without
/// allocating
#[must_use]
pub fn position_count(x_start: i64, x_stop: i64, step_size: u64) -> u64 {
    let span = (i128::from(x_stop) - i128::from(x_start)).unsigned_abs();
    let steps = span.div_ceil(u128::from(step_size.max(1)));
    u64::try_from(steps + 1).unwrap_or(u64::MAX)
}

/// Reference-axis positions sampled from `x_start` toward `x_stop`.
///
/// The final position is always `x_stop`. Bound the size first with
/// [`position_count`].
#[must_use]
pub fn sample_positions(x_start: i64, x_stop: i64, step_size: u64) -> Vec<i64> {
    let count = position_count(x_start, x_stop, step_size);
    let direction = if x_start <= x_stop { 1 } else { -1 };
    let step = i128::from(step_size.max(1)) * direction;

    // Every position before the last lies strictly between the endpoints
    let mut positions: Vec<i64> = (0..count.saturating_sub(1))
        .map_while(|i| i64::try_from(i128::from(x_start) + i128::from(i) * step).ok())
        .collect();
    positions.push(x_stop);
    positions
}

/// Rasterize a single segment. Degenerate segments yield no points.
///
/// # Errors
///
/// Returns `RasterError::TooManyPoints` if the segment alone would exceed the
/// point limit.
#[allow(clippy::cast_precision_loss)] // genomic coordinates fit in f64 mantissa
pub fn rasterize_segment(
    segment: &AlignmentSegment,
    config: &RasterConfig,
) -> Result<Vec<RenderPoint>, RasterError> {
    let Some(slope) = segment.slope() else {
        return Ok(Vec::new());
    };
    let count = position_count(segment.x_start, segment.x_stop, config.step_size);
    if let Some(message) = check_point_limit(0, count) {
        return Err(RasterError::TooManyPoints(message));
    }

    let orientation = match config.policy {
        OrientationPolicy::BySlope => Orientation::from_slope(slope),
        OrientationPolicy::Fixed(orientation) => orientation,
    };

    let (x_start, y_start) = (segment.x_start as f64, segment.y_start as f64);
    let points = sample_positions(segment.x_start, segment.x_stop, config.step_size)
        .into_iter()
        .map(|x| {
            let y = if x == segment.x_stop {
                segment.y_stop as f64
            } else {
                y_start + slope * (x as f64 - x_start)
            };
            let point = RenderPoint::new(x as f64, y).with_orientation(orientation);
            if config.label_points {
                point.with_name(orientation.label())
            } else {
                point
            }
        })
        .collect();
    Ok(points)
}

/// Rasterize all segments of one sample into a series, preserving segment order
///
/// # Errors
///
/// Returns `RasterError::TooManyPoints` once `budget` is exhausted.
pub fn rasterize_segments<'a>(
    name: impl Into<String>,
    segments: impl IntoIterator<Item = &'a AlignmentSegment>,
    config: &RasterConfig,
    budget: &mut PointBudget,
) -> Result<PlotSeries, RasterError> {
    let mut points = Vec::new();
    for segment in segments {
        if segment.is_degenerate() {
            continue;
        }
        budget.reserve(position_count(segment.x_start, segment.x_stop, config.step_size))?;
        points.extend(rasterize_segment(segment, config)?);
    }
    Ok(PlotSeries::new(name, points))
}

/// Like [`rasterize_segments`], also folding every non-degenerate segment
/// into `range`
///
/// # Errors
///
/// Returns `RasterError::TooManyPoints` once `budget` is exhausted.
pub fn rasterize_tracking<'a>(
    name: impl Into<String>,
    segments: impl IntoIterator<Item = &'a AlignmentSegment>,
    config: &RasterConfig,
    budget: &mut PointBudget,
    range: &mut AxisRange,
) -> Result<PlotSeries, RasterError> {
    let mut points = Vec::new();
    for segment in segments {
        if segment.is_degenerate() {
            continue;
        }
        budget.reserve(position_count(segment.x_start, segment.x_stop, config.step_size))?;
        range.include(segment);
        points.extend(rasterize_segment(segment, config)?);
    }
    Ok(PlotSeries::new(name, points))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(step: u64) -> RasterConfig {
        RasterConfig::new(step).unwrap()
    }

    fn xy(points: &[RenderPoint]) -> Vec<(f64, f64)> {
        points.iter().map(|p| (p.x, p.y)).collect()
    }

    #[test]
    fn test_zero_step_rejected() {
        assert_eq!(RasterConfig::new(0), Err(RasterError::InvalidStepSize));
    }

    #[test]
    fn test_exact_multiple_of_step() {
        let seg = AlignmentSegment::new(0, 10_000, 0, 10_000);
        let points = rasterize_segment(&seg, &config(5_000)).unwrap();
        assert_eq!(
            xy(&points),
            vec![(0.0, 0.0), (5_000.0, 5_000.0), (10_000.0, 10_000.0)]
        );
        assert!(points.iter().all(|p| p.orientation == Some(Orientation::Fwd)));
    }

    #[test]
    fn test_endpoint_appended_when_not_on_step() {
        let seg = AlignmentSegment::new(0, 7_000, 0, 7_000);
        let points = rasterize_segment(&seg, &config(5_000)).unwrap();
        let xs: Vec<f64> = points.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 5_000.0, 7_000.0]);
        assert_eq!(points.last().unwrap().y, 7_000.0);
    }

    #[test]
    fn test_degenerate_segment_emits_nothing() {
        let seg = AlignmentSegment::new(100, 100, 0, 5_000);
        assert!(rasterize_segment(&seg, &config(5_000)).unwrap().is_empty());
    }

    #[test]
    fn test_reverse_segment_steps_downward() {
        let seg = AlignmentSegment::new(10_000, 0, 0, 10_000);
        let points = rasterize_segment(&seg, &config(5_000)).unwrap();
        assert_eq!(
            xy(&points),
            vec![(10_000.0, 0.0), (5_000.0, 5_000.0), (0.0, 10_000.0)]
        );
        assert!(points.iter().all(|p| p.orientation == Some(Orientation::Rev)));
    }

    #[test]
    fn test_short_segment_keeps_both_ends() {
        let seg = AlignmentSegment::new(200, 900, 1_000, 300);
        let points = rasterize_segment(&seg, &config(5_000)).unwrap();
        assert_eq!(xy(&points), vec![(200.0, 1_000.0), (900.0, 300.0)]);
    }

    #[test]
    fn test_flat_segment_is_reverse() {
        // Zero slope lands in the reverse bucket
        let seg = AlignmentSegment::new(0, 12_000, 400, 400);
        let points = rasterize_segment(&seg, &config(5_000)).unwrap();
        assert_eq!(points.len(), 4);
        assert!(points.iter().all(|p| p.orientation == Some(Orientation::Rev)));
        assert!(points.iter().all(|p| (p.y - 400.0).abs() < f64::EPSILON));
    }

    #[test]
    fn test_first_and_last_points_are_exact() {
        let segments = [
            AlignmentSegment::new(3, 99_998, 17, 33_331),
            AlignmentSegment::new(123_457, 1, 7, 777_777),
            AlignmentSegment::new(-50, 4_999, 10, -10),
        ];
        for seg in &segments {
            let points = rasterize_segment(seg, &config(7)).unwrap();
            let first = points.first().unwrap();
            let last = points.last().unwrap();
            assert_eq!((first.x, first.y), (seg.x_start as f64, seg.y_start as f64));
            assert_eq!((last.x, last.y), (seg.x_stop as f64, seg.y_stop as f64));
        }
    }

    #[test]
    fn test_orientation_matches_delta_signs() {
        let cases = [
            (AlignmentSegment::new(0, 10, 0, 10), Orientation::Fwd),
            (AlignmentSegment::new(10, 0, 10, 0), Orientation::Fwd),
            (AlignmentSegment::new(0, 10, 10, 0), Orientation::Rev),
            (AlignmentSegment::new(10, 0, 0, 10), Orientation::Rev),
            (AlignmentSegment::new(0, 10, 5, 5), Orientation::Rev),
        ];
        for (seg, expected) in cases {
            let points = rasterize_segment(&seg, &config(3)).unwrap();
            assert!(points.iter().all(|p| p.orientation == Some(expected)), "{seg:?}");
        }
    }

    #[test]
    fn test_fixed_policy_and_point_labels() {
        let cfg = config(5_000)
            .with_policy(OrientationPolicy::Fixed(Orientation::Rev))
            .with_point_labels(true);
        // Positive slope, but the policy overrides it
        let seg = AlignmentSegment::new(0, 6_000, 0, 6_000);
        let points = rasterize_segment(&seg, &cfg).unwrap();
        assert_eq!(points.len(), 3);
        assert!(points.iter().all(|p| p.orientation == Some(Orientation::Rev)));
        assert!(points.iter().all(|p| p.name.as_deref() == Some("rev")));
    }

    #[test]
    fn test_rasterizing_is_repeatable() {
        let segments = vec![
            AlignmentSegment::new(0, 23_456, 100, 20_000),
            AlignmentSegment::new(50_000, 40_000, 0, 9_999),
        ];
        let rasterize = || {
            rasterize_segments("A", &segments, &config(5_000), &mut PointBudget::new()).unwrap()
        };
        assert_eq!(rasterize(), rasterize());
    }

    #[test]
    fn test_series_concatenates_in_segment_order() {
        let segments = vec![
            AlignmentSegment::new(0, 5_000, 0, 5_000),
            AlignmentSegment::new(9, 9, 0, 1),
            AlignmentSegment::new(20_000, 15_000, 0, 5_000),
        ];
        let mut budget = PointBudget::new();
        let series = rasterize_segments("A", &segments, &config(5_000), &mut budget).unwrap();
        assert_eq!(budget.used(), 4);
        let xs: Vec<f64> = series.points.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 5_000.0, 20_000.0, 15_000.0]);
    }

    #[test]
    fn test_tracking_skips_degenerate_segments() {
        let segments = vec![
            AlignmentSegment::new(1_000_000, 1_000_000, 0, 2_000_000),
            AlignmentSegment::new(0, 8_000, 100, 9_000),
        ];
        let mut range = AxisRange::new();
        let mut budget = PointBudget::new();
        let series =
            rasterize_tracking("A", &segments, &config(5_000), &mut budget, &mut range).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(range.x_max, Some(8_000));
        assert_eq!(range.y_max, Some(9_000));
        assert_eq!(range.square_max(), 9_000);
    }

    #[test]
    fn test_sample_positions_directions() {
        assert_eq!(sample_positions(0, 10, 4), vec![0, 4, 8, 10]);
        assert_eq!(sample_positions(10, 0, 4), vec![10, 6, 2, 0]);
        assert_eq!(sample_positions(0, 3, 10), vec![0, 3]);
    }

    #[test]
    fn test_position_count_matches_sampling() {
        for (start, stop, step) in [(0, 10, 4), (10, 0, 4), (0, 3, 10), (0, 10_000, 5_000), (-50, 4_999, 7)] {
            let expected = sample_positions(start, stop, step).len() as u64;
            assert_eq!(position_count(start, stop, step), expected, "{start}..{stop} by {step}");
        }
        assert_eq!(position_count(i64::MIN, i64::MAX, 1), u64::MAX);
    }

    #[test]
    fn test_long_segment_with_small_step_rejected() {
        // One line asking for 50 million points
        let seg = AlignmentSegment::new(0, 50_000_000, 0, 50_000_000);
        assert!(matches!(
            rasterize_segment(&seg, &config(1)),
            Err(RasterError::TooManyPoints(_))
        ));

        let seg = AlignmentSegment::new(0, 5_000_000_000_000, 0, 1);
        assert!(matches!(
            rasterize_segment(&seg, &config(SYNTENY_STEP_SIZE)),
            Err(RasterError::TooManyPoints(_))
        ));
    }

    #[test]
    fn test_budget_shared_across_segments() {
        // Each segment fits on its own, together they do not
        let segments = vec![AlignmentSegment::new(0, 6_000_000, 0, 6_000_000); 2];
        let mut budget = PointBudget::new();
        let result = rasterize_segments("A", &segments, &config(1), &mut budget);
        assert!(matches!(result, Err(RasterError::TooManyPoints(_))));
    }

    #[test]
    fn test_extreme_coordinates_keep_orientation() {
        let seg = AlignmentSegment::new(-9_000_000_000_000_000_000, 9_000_000_000_000_000_000, 0, 1);
        let points = rasterize_segment(&seg, &config(u64::MAX)).unwrap();
        assert_eq!(points.len(), 2);
        assert!(points.iter().all(|p| p.orientation == Some(Orientation::Fwd)));
    }
}
