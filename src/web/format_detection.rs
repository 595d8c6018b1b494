//! Input kind sniffing for uploaded files.

use std::path::Path;

use serde::Serialize;

/// Lines sampled from the top of a file when sniffing
const SAMPLE_LINES: usize = 20;

/// Kinds of text input the plug-in modules accept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    /// `x1 x2 | y1 y2` coordinate dumps (QUAST synteny, nucmer show-coords)
    PipeCoords,
    /// Tab-delimited alignment coordinates with a header row
    AlignmentTsv,
    /// mummerplot `.fplot`/`.rplot` gnuplot data
    Gnuplot,
    /// `jellyfish histo` output
    JellyfishHistogram,
    /// `jellyfish dump -c` output
    JellyfishDump,
    /// YAML mapping
    YamlMapping,
    /// NanoStat summary report
    NanoStat,
    /// `key=value` lines
    KeyValue,
    /// Shell script
    ShellScript,
    /// Free-form log text
    Log,
}

/// Errors that can occur during format detection
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum FormatError {
    #[error("Unable to detect file format from content and filename")]
    UnknownFormat,
    #[error("File appears to be binary")]
    UnsupportedBinary,
}

impl InputKind {
    /// Get the display name for this kind
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            InputKind::PipeCoords => "Pipe-delimited coordinates",
            InputKind::AlignmentTsv => "Alignment TSV",
            InputKind::Gnuplot => "Gnuplot segment data",
            InputKind::JellyfishHistogram => "Jellyfish histogram",
            InputKind::JellyfishDump => "Jellyfish dump",
            InputKind::YamlMapping => "YAML mapping",
            InputKind::NanoStat => "NanoStat summary",
            InputKind::KeyValue => "key=value list",
            InputKind::ShellScript => "Shell script",
            InputKind::Log => "Log file",
        }
    }
}

/// Detect input kind from content and optional filename
///
/// # Errors
///
/// Returns `FormatError::UnsupportedBinary` for content with control
/// characters, or `FormatError::UnknownFormat` if nothing matches.
pub fn detect_kind(content: &str, filename: Option<&str>) -> Result<InputKind, FormatError> {
    if let Some(kind) = filename.and_then(detect_kind_from_filename) {
        if matches_kind(content, kind) {
            return Ok(kind);
        }
    }

    detect_kind_from_content(content)
}

fn detect_kind_from_filename(filename: &str) -> Option<InputKind> {
    let lower = filename.to_lowercase();
    let lower = lower
        .strip_suffix(".gz")
        .or_else(|| lower.strip_suffix(".bgz"))
        .unwrap_or(&lower);

    let extension = Path::new(lower).extension()?.to_str()?;
    match extension {
        "coords" => Some(InputKind::PipeCoords),
        "tsv" | "paf" => Some(InputKind::AlignmentTsv),
        "fplot" | "rplot" | "gp" => Some(InputKind::Gnuplot),
        "histo" => Some(InputKind::JellyfishHistogram),
        "dump" | "jf" => Some(InputKind::JellyfishDump),
        "yaml" | "yml" => Some(InputKind::YamlMapping),
        "sh" => Some(InputKind::ShellScript),
        "log" => Some(InputKind::Log),
        _ => None,
    }
}

fn detect_kind_from_content(content: &str) -> Result<InputKind, FormatError> {
    if content.trim().is_empty() {
        return Err(FormatError::UnknownFormat);
    }

    if content
        .chars()
        .any(|c| c.is_control() && c != '\n' && c != '\r' && c != '\t')
    {
        return Err(FormatError::UnsupportedBinary);
    }

    // Most specific first
    let ordered = [
        InputKind::PipeCoords,
        InputKind::AlignmentTsv,
        InputKind::JellyfishHistogram,
        InputKind::JellyfishDump,
        InputKind::Gnuplot,
        InputKind::ShellScript,
        InputKind::NanoStat,
        InputKind::KeyValue,
        InputKind::YamlMapping,
    ];
    ordered
        .into_iter()
        .find(|&kind| content_has_shape(content, kind))
        .ok_or(FormatError::UnknownFormat)
}

/// Whether the content could be read as `kind`
#[must_use]
pub fn matches_kind(content: &str, kind: InputKind) -> bool {
    match kind {
        // Assembler logs are free-form
        InputKind::Log => !content.trim().is_empty(),
        // Scripts without a shebang are still accepted for a known role
        InputKind::ShellScript => !content.trim().is_empty(),
        _ => content_has_shape(content, kind),
    }
}

fn sample_lines(content: &str) -> impl Iterator<Item = &str> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(SAMPLE_LINES)
}

fn is_int(field: &str) -> bool {
    field.parse::<i64>().is_ok()
}

fn content_has_shape(content: &str, kind: InputKind) -> bool {
    match kind {
        InputKind::PipeCoords => sample_lines(content).any(|line| {
            let mut fields = line.split('|');
            let first = fields.next().unwrap_or_default();
            fields.next().is_some()
                && first.split_whitespace().take(2).filter(|f| is_int(f)).count() == 2
        }),
        InputKind::AlignmentTsv => content.lines().next().is_some_and(|header| {
            header.split('\t').count() >= 5
                && sample_lines(content)
                    .skip(1)
                    .all(|line| line.contains('\t'))
        }),
        InputKind::Gnuplot => {
            let mut data = sample_lines(content).filter(|line| !line.starts_with('#')).peekable();
            let has_comment = sample_lines(content).any(|line| line.starts_with('#'));
            (data.peek().is_some() || has_comment)
                && data.all(|line| {
                    let fields: Vec<&str> = line.split_whitespace().collect();
                    fields.len() == 3 && is_int(fields[0]) && is_int(fields[1])
                })
        }
        InputKind::JellyfishHistogram => all_sampled(content, |line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            fields.len() == 2 && fields[0].parse::<u64>().is_ok() && fields[1].parse::<u64>().is_ok()
        }),
        InputKind::JellyfishDump => all_sampled(content, |line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            fields.len() == 2
                && fields[0].chars().all(|c| c.is_ascii_alphabetic())
                && fields[1].parse::<u64>().is_ok()
        }),
        InputKind::YamlMapping => serde_yaml::from_str::<serde_yaml::Mapping>(content).is_ok(),
        InputKind::NanoStat => sample_lines(content)
            .skip(1)
            .any(|line| line.contains(':') && line.contains('\t')),
        InputKind::KeyValue => all_sampled(content, |line| {
            line.split_once('=')
                .is_some_and(|(key, _)| !key.trim().is_empty())
        }),
        InputKind::ShellScript => content.trim_start().starts_with("#!"),
        InputKind::Log => !content.trim().is_empty(),
    }
}

fn all_sampled(content: &str, predicate: impl Fn(&str) -> bool) -> bool {
    let mut lines = sample_lines(content).peekable();
    lines.peek().is_some() && lines.all(predicate)
}
