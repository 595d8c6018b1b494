//! Plot-data builders shared by the report modules.
//!
//! - [`rasterize`]: step-sampling of alignment segments into render points
//! - [`scatter`]: scatter datasets with axis clipping, naming and coloring
//! - [`linegraph`]: line datasets
//! - [`table`]: general statistics columns and standalone tables
//! - [`config`]: plot-wide configuration shared by all of the above
//!
//! The builders only shape data; drawing is left to the renderer that
//! consumes the serialized output.

pub mod config;
pub mod linegraph;
pub mod rasterize;
pub mod scatter;
pub mod table;
