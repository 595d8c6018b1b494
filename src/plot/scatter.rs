//! Scatter plot datasets in the renderer's point format.

use serde::Serialize;

use crate::core::series::PlotSeries;
use crate::plot::config::PlotConfig;
use crate::report::ids::IdRegistry;

/// One point as the renderer expects it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// A dataset entry: a regular point, or an annotation series from the config
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ScatterEntry {
    Point(ScatterPoint),
    Series(serde_json::Value),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPlot {
    pub plot_type: &'static str,
    pub datasets: Vec<Vec<ScatterEntry>>,
    pub config: PlotConfig,
}

impl ScatterPlot {
    /// Number of regular points across all datasets
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.datasets
            .iter()
            .flatten()
            .filter(|e| matches!(e, ScatterEntry::Point(_)))
            .count()
    }
}

/// Build a scatter plot from datasets of per-sample series.
///
/// Points outside the configured axis bounds are dropped. Each point is
/// named `"<sample>: <point name>"` (or just the sample) and colored by its
/// own color, else by `config.colors[sample]`.
#[must_use]
pub fn plot(datasets: &[Vec<PlotSeries>], mut config: PlotConfig, ids: &mut IdRegistry) -> ScatterPlot {
    let bounds = &config;
    let mut plot_data: Vec<Vec<ScatterEntry>> = datasets
        .iter()
        .map(|dataset| {
            dataset
                .iter()
                .flat_map(move |series| {
                    series
                        .points
                        .iter()
                        .filter(move |p| bounds.contains(p.x, p.y))
                        .map(move |p| {
                            let name = match &p.name {
                                Some(point_name) => format!("{}: {}", series.name, point_name),
                                None => series.name.clone(),
                            };
                            let color = p
                                .color()
                                .map(str::to_string)
                                .or_else(|| bounds.colors.get(&series.name).cloned());
                            ScatterEntry::Point(ScatterPoint {
                                x: p.x,
                                y: p.y,
                                name,
                                color,
                            })
                        })
                })
                .collect()
        })
        .collect();

    for (i, extra) in config.extra_series.iter().enumerate() {
        if let Some(dataset) = plot_data.get_mut(i) {
            dataset.extend(extra.iter().cloned().map(ScatterEntry::Series));
        }
    }

    config.id = Some(ids.register(config.id.as_deref()));

    ScatterPlot {
        plot_type: "scatter",
        datasets: plot_data,
        config,
    }
}
