use std::collections::BTreeMap;

use serde::Serialize;

use crate::core::types::DataLabel;

/// Plot-wide configuration passed through to the renderer.
///
/// Field names on the wire follow the renderer's keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlotConfig {
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub xlab: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ylab: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub xmin: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub xmax: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ymin: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ymax: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub square: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker_size: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker_line_width: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker_line_color: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker_colour: Option<String>,

    #[serde(rename = "enableMouseTracking", skip_serializing_if = "Option::is_none")]
    pub enable_mouse_tracking: Option<bool>,

    #[serde(rename = "xDecimals", skip_serializing_if = "Option::is_none")]
    pub x_decimals: Option<bool>,

    /// Fallback point colors by sample name
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub colors: BTreeMap<String, String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub data_labels: Vec<DataLabel>,

    /// Annotation series appended to the dataset with the same index
    #[serde(skip)]
    pub extra_series: Vec<Vec<serde_json::Value>>,
}

impl PlotConfig {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn axis_labels(mut self, xlab: impl Into<String>, ylab: impl Into<String>) -> Self {
        self.xlab = Some(xlab.into());
        self.ylab = Some(ylab.into());
        self
    }

    #[must_use]
    pub fn x_range(mut self, min: f64, max: f64) -> Self {
        self.xmin = Some(min);
        self.xmax = Some(max);
        self
    }

    #[must_use]
    pub fn y_range(mut self, min: f64, max: f64) -> Self {
        self.ymin = Some(min);
        self.ymax = Some(max);
        self
    }

    #[must_use]
    pub fn square(mut self) -> Self {
        self.square = Some(true);
        self
    }

    /// Small borderless markers without hover tracking, used by the
    /// alignment dot plots
    #[must_use]
    pub fn dense_markers(mut self) -> Self {
        self.marker_line_width = Some(0.0);
        self.marker_size = Some(2.0);
        self.enable_mouse_tracking = Some(false);
        self
    }

    #[must_use]
    pub fn data_labels(mut self, labels: Vec<DataLabel>) -> Self {
        self.data_labels = labels;
        self
    }

    /// Whether a point lies inside every configured axis bound
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let above = |v: f64, min: Option<f64>| min.map_or(true, |m| v >= m);
        let below = |v: f64, max: Option<f64>| max.map_or(true, |m| v <= m);
        above(x, self.xmin) && below(x, self.xmax) && above(y, self.ymin) && below(y, self.ymax)
    }
}
