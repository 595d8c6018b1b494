//! Parsers for raw read quality summaries.
//!
//! - minimap2 alignment summary: YAML mapping `category: base count`
//! - NanoStat report: tab-separated text whose lines 2-5 become a YAML mapping
//!   once tabs are replaced by spaces

use serde::Serialize;

use crate::parsing::cpu_times::yaml_key_to_string;
use crate::parsing::ParseError;
use crate::utils::validation::RATIO_EPSILON;

/// Lines of a NanoStat report holding the general summary metrics
const NANOSTAT_FIRST_LINE: usize = 1;
const NANOSTAT_LINES: usize = 4;

/// One alignment category from a minimap2 summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignmentCategory {
    #[serde(skip)]
    pub name: String,
    pub absolute: f64,
    /// Percentage of the total over all categories
    pub relative: f64,
}

/// Parse a minimap2 alignment summary.
///
/// # Errors
///
/// Returns `ParseError::Yaml` if the text is not a YAML mapping, or
/// `ParseError::InvalidFormat` if a count is not numeric.
pub fn parse_minimap2_summary(text: &str) -> Result<Vec<AlignmentCategory>, ParseError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    let mapping: serde_yaml::Mapping = serde_yaml::from_str(text)?;

    let mut counts = Vec::with_capacity(mapping.len());
    for (key, value) in &mapping {
        let name = yaml_key_to_string(key)?;
        let absolute = value.as_f64().ok_or_else(|| {
            ParseError::InvalidFormat(format!("Base count for '{name}' is not numeric"))
        })?;
        counts.push((name, absolute));
    }

    let total: f64 = counts.iter().map(|(_, c)| c).sum();
    let total = if total == 0.0 { RATIO_EPSILON } else { total };

    Ok(counts
        .into_iter()
        .map(|(name, absolute)| AlignmentCategory {
            name,
            absolute,
            relative: absolute / total * 100.0,
        })
        .collect())
}

/// Parse the general summary block of a NanoStat report.
///
/// # Errors
///
/// Returns `ParseError::Yaml` if the summary lines are not a YAML mapping.
pub fn parse_nanostat_summary(text: &str) -> Result<Vec<(String, serde_json::Value)>, ParseError> {
    let block = text
        .lines()
        .skip(NANOSTAT_FIRST_LINE)
        .take(NANOSTAT_LINES)
        .map(|line| line.replace('\t', " "))
        .collect::<Vec<_>>()
        .join("\n");

    if block.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mapping: serde_yaml::Mapping = serde_yaml::from_str(&block)?;
    let mut metrics = Vec::with_capacity(mapping.len());
    for (key, value) in &mapping {
        let name = yaml_key_to_string(key)?;
        let value = serde_json::to_value(value)
            .map_err(|e| ParseError::InvalidFormat(format!("Unsupported value for '{name}': {e}")))?;
        metrics.push((name, value));
    }
    Ok(metrics)
}
