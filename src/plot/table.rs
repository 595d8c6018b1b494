use serde::Serialize;

use crate::core::ordered::OrderedMap;
use crate::report::ids::IdRegistry;

/// Column metadata for table renderers
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableHeader {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl TableHeader {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    #[must_use]
    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    #[must_use]
    pub fn scale(mut self, scale: impl Into<String>) -> Self {
        self.scale = Some(scale.into());
        self
    }

    #[must_use]
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }
}

/// Row name -> column key -> value
pub type TableRows = OrderedMap<OrderedMap<serde_json::Value>>;

/// A standalone two-column table section
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TablePlot {
    pub plot_type: &'static str,
    pub id: String,
    pub namespace: String,
    pub headers: OrderedMap<TableHeader>,
    pub rows: TableRows,
}

#[must_use]
pub fn plot(
    rows: TableRows,
    headers: OrderedMap<TableHeader>,
    id: &str,
    namespace: &str,
    ids: &mut IdRegistry,
) -> TablePlot {
    TablePlot {
        plot_type: "table",
        id: ids.register(Some(id)),
        namespace: namespace.to_string(),
        headers,
        rows,
    }
}

/// The report-wide per-sample summary table
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GeneralStats {
    pub headers: OrderedMap<TableHeader>,
    pub rows: TableRows,
}

impl GeneralStats {
    /// Merge columns into the table. Existing cells are overwritten.
    pub fn add_cols(&mut self, rows: TableRows, headers: OrderedMap<TableHeader>) {
        for (key, header) in headers {
            self.headers.insert(key, header);
        }
        for (sample, cols) in rows {
            match self.rows.get_mut(&sample) {
                Some(existing) => {
                    for (col, value) in cols {
                        existing.insert(col, value);
                    }
                }
                None => {
                    self.rows.insert(sample, cols);
                }
            }
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(pairs: &[(&str, serde_json::Value)]) -> OrderedMap<serde_json::Value> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_general_stats_merge() {
        let mut stats = GeneralStats::default();

        let mut rows = TableRows::new();
        rows.insert("canu", row(&[("CPU time", json!("1:00:00"))]));
        stats.add_cols(rows, OrderedMap::new());

        let mut rows = TableRows::new();
        rows.insert("canu", row(&[("N50", json!(12)), ("CPU time", json!("2:00:00"))]));
        rows.insert("flye", row(&[("N50", json!(7))]));
        stats.add_cols(rows, OrderedMap::new());

        let canu = stats.rows.get("canu").unwrap();
        assert_eq!(canu.get("CPU time"), Some(&json!("2:00:00")));
        assert_eq!(canu.len(), 2);
        assert_eq!(stats.rows.len(), 2);
    }

    #[test]
    fn test_table_header_serialization() {
        let header = TableHeader::new("N", "Base counts")
            .min(0.0)
            .scale("RdYlGn")
            .format("{:.2e}");
        let json = serde_json::to_value(&header).unwrap();
        assert_eq!(json["title"], "N");
        assert_eq!(json["scale"], "RdYlGn");
        assert!(json.get("max").is_none());
    }
}
