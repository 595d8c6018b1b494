use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::core::types::Orientation;

/// One sampled point handed to the plot renderer.
///
/// Serializes as `{x, y, color?, name?}`.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPoint {
    pub x: f64,
    pub y: f64,
    pub orientation: Option<Orientation>,
    pub name: Option<String>,
}

impl RenderPoint {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            orientation: None,
            name: None,
        }
    }

    #[must_use]
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = Some(orientation);
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn color(&self) -> Option<&'static str> {
        self.orientation.map(Orientation::color)
    }
}

impl Serialize for RenderPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = 2 + usize::from(self.orientation.is_some()) + usize::from(self.name.is_some());
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("x", &self.x)?;
        map.serialize_entry("y", &self.y)?;
        if let Some(color) = self.color() {
            map.serialize_entry("color", color)?;
        }
        if let Some(name) = &self.name {
            map.serialize_entry("name", name)?;
        }
        map.end()
    }
}

/// Render points for one sample, in emission order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotSeries {
    pub name: String,
    pub points: Vec<RenderPoint>,
}

impl PlotSeries {
    pub fn new(name: impl Into<String>, points: Vec<RenderPoint>) -> Self {
        Self {
            name: name.into(),
            points,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_point_serialization_shape() {
        let point = RenderPoint::new(5000.0, 2500.5).with_orientation(Orientation::Fwd);
        let json = serde_json::to_value(&point).unwrap();
        assert_eq!(json["x"], 5000.0);
        assert_eq!(json["y"], 2500.5);
        assert_eq!(json["color"], "rgba(251, 128, 114, 1)");
        assert!(json.get("name").is_none());

        let named = RenderPoint::new(1.0, 2.0).with_name("ACGTA");
        let json = serde_json::to_value(&named).unwrap();
        assert_eq!(json["name"], "ACGTA");
        assert!(json.get("color").is_none());
    }

    #[test]
    fn test_plot_series_len() {
        let series = PlotSeries::new("A", vec![RenderPoint::new(0.0, 0.0)]);
        assert_eq!(series.len(), 1);
        assert!(!series.is_empty());
        assert!(PlotSeries::new("B", Vec::new()).is_empty());
    }
}
