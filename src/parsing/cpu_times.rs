//! Parser for CPU time YAML files (`tool: seconds`).

use chrono::Duration;

use crate::parsing::ParseError;

/// Parse a CPU times mapping, keeping file order.
///
/// # Errors
///
/// Returns `ParseError::Yaml` if the text is not a YAML mapping, or
/// `ParseError::InvalidFormat` if a value is not a non-negative number.
pub fn parse_cpu_times(text: &str) -> Result<Vec<(String, f64)>, ParseError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mapping: serde_yaml::Mapping = serde_yaml::from_str(text)?;
    let mut entries = Vec::with_capacity(mapping.len());

    for (key, value) in mapping {
        let tool = yaml_key_to_string(&key)?;
        let seconds = value
            .as_f64()
            .filter(|s| s.is_finite() && *s >= 0.0)
            .ok_or_else(|| {
                ParseError::InvalidFormat(format!("CPU time for '{tool}' is not a non-negative number"))
            })?;
        entries.push((tool, seconds));
    }

    Ok(entries)
}

pub(crate) fn yaml_key_to_string(key: &serde_yaml::Value) -> Result<String, ParseError> {
    match key {
        serde_yaml::Value::String(s) => Ok(s.clone()),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        other => Err(ParseError::InvalidFormat(format!("Unsupported mapping key: {other:?}"))),
    }
}

/// Format seconds as `H:MM:SS`, with `.ffffff` when there are microseconds and
/// an `N day(s), ` prefix past 24 hours.
#[must_use]
#[allow(clippy::cast_possible_truncation)] // bounded by the i64 microsecond range check
pub fn format_cpu_time(seconds: f64) -> String {
    let micros = (seconds * 1_000_000.0).round();
    let micros = if micros.is_finite() && micros >= 0.0 && micros < i64::MAX as f64 {
        micros as i64
    } else {
        0
    };
    let duration = Duration::microseconds(micros);

    let days = duration.num_days();
    let hours = duration.num_hours() - days * 24;
    let minutes = duration.num_minutes() - duration.num_hours() * 60;
    let secs = duration.num_seconds() - duration.num_minutes() * 60;
    let frac = micros - duration.num_seconds() * 1_000_000;

    let mut out = String::new();
    if days > 0 {
        let unit = if days == 1 { "day" } else { "days" };
        out.push_str(&format!("{days} {unit}, "));
    }
    out.push_str(&format!("{hours}:{minutes:02}:{secs:02}"));
    if frac > 0 {
        out.push_str(&format!(".{frac:06}"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cpu_times() {
        let entries = parse_cpu_times("canu: 3600\nflye: 90.5\n").unwrap();
        assert_eq!(
            entries,
            vec![("canu".to_string(), 3600.0), ("flye".to_string(), 90.5)]
        );
    }

    #[test]
    fn test_negative_rejected() {
        assert!(matches!(
            parse_cpu_times("canu: -1\n"),
            Err(ParseError::InvalidFormat(_))
        ));
        assert!(parse_cpu_times("canu: fast\n").is_err());
    }

    #[test]
    fn test_not_a_mapping() {
        assert!(matches!(parse_cpu_times("- 1\n- 2\n"), Err(ParseError::Yaml(_))));
    }

    #[test]
    fn test_empty() {
        assert!(parse_cpu_times("  \n").unwrap().is_empty());
    }

    #[test]
    fn test_format_cpu_time() {
        assert_eq!(format_cpu_time(0.0), "0:00:00");
        assert_eq!(format_cpu_time(3600.0), "1:00:00");
        assert_eq!(format_cpu_time(3725.0), "1:02:05");
        assert_eq!(format_cpu_time(90.5), "0:01:30.500000");
        assert_eq!(format_cpu_time(86_400.0), "1 day, 0:00:00");
        assert_eq!(format_cpu_time(200_000.0), "2 days, 7:33:20");
    }
}
