//! Core data types shared by parsers, plot builders and modules.
//!
//! - [`AlignmentSegment`](segment::AlignmentSegment): one aligned block between
//!   a reference and an assembly coordinate system
//! - [`AxisRange`](segment::AxisRange): running coordinate bounds
//! - [`Orientation`](types::Orientation): forward or reverse, from slope sign
//! - [`RenderPoint`](series::RenderPoint), [`PlotSeries`](series::PlotSeries):
//!   sampled points ready for a scatter plot
//! - [`OrderedMap`](ordered::OrderedMap): insertion-ordered, last-write-wins map
//!   keyed by sample name

pub mod ordered;
pub mod segment;
pub mod series;
pub mod types;
