use serde::Serialize;

use crate::plot::config::PlotConfig;
use crate::report::ids::IdRegistry;

/// A named line of `[x, y]` pairs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSeries {
    pub name: String,
    pub data: Vec<(f64, f64)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl LineSeries {
    pub fn new(name: impl Into<String>, data: Vec<(f64, f64)>) -> Self {
        Self {
            name: name.into(),
            data,
            color: None,
        }
    }

    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinePlot {
    pub plot_type: &'static str,
    pub datasets: Vec<Vec<LineSeries>>,
    pub config: PlotConfig,
}

impl LinePlot {
    #[must_use]
    pub fn series_count(&self) -> usize {
        self.datasets.iter().map(Vec::len).sum()
    }
}

/// Build a line graph. Each dataset is shown on its own tab.
#[must_use]
pub fn plot(datasets: Vec<Vec<LineSeries>>, mut config: PlotConfig, ids: &mut IdRegistry) -> LinePlot {
    config.id = Some(ids.register(config.id.as_deref()));
    LinePlot {
        plot_type: "xy_line",
        datasets,
        config,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_plot_shape() {
        let series = LineSeries::new("fwd", vec![(0.0, 0.0), (10.0, 12.0)]).with_color("#fff");
        let plot = plot(
            vec![vec![series.clone()], vec![series]],
            PlotConfig::new("mummerplot"),
            &mut IdRegistry::new(),
        );
        assert_eq!(plot.series_count(), 2);

        let json = serde_json::to_value(&plot).unwrap();
        assert_eq!(json["plot_type"], "xy_line");
        assert_eq!(json["datasets"][0][0]["data"][1][1], 12.0);
        assert_eq!(json["datasets"][1][0]["color"], "#fff");
        assert_eq!(json["config"]["id"], "mummerplot");
    }
}
