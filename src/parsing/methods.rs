//! Parsers for the inputs of the methods section.
//!
//! - Publication info: `key="value"` lines
//! - Analysis tool versions: YAML mapping `tool: version`
//! - Assembler command scripts with `# TOOL DESCRIPTION`, `# VERSIONS` and
//!   `# COMMANDS-------` comment sections
//! - Assembler log files with an auto-printed version block

use serde::Serialize;

use crate::core::ordered::OrderedMap;
use crate::parsing::cpu_times::yaml_key_to_string;
use crate::parsing::ParseError;

pub const DEFAULT_DESCRIPTION: &str = "No description available";
pub const DEFAULT_COMMAND: &str =
    "No command in script or not parsed. Check files in assembler_scripts folder.";

const DESCRIPTION_START: &str = "# TOOL DESCRIPTION";
const DESCRIPTION_END: &str = "VERSIONS---";
const VERSIONS_START: &str = "# VERSIONS";
const VERSIONS_END: &str = "COMMANDS";
const COMMANDS_START: &str = "# COMMANDS-------";
const LOG_VERSIONS_START: &str = "START AUTO VERSION PRINTING\n";
const LOG_VERSIONS_END: &str = "END AUTO VERSION PRINTING";

/// Parse `key="value"` lines. Blank lines are ignored.
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` if a line has no `=`.
pub fn parse_publication_info(text: &str) -> Result<OrderedMap<String>, ParseError> {
    let mut info = OrderedMap::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let (key, value) = line.split_once('=').ok_or_else(|| {
            ParseError::InvalidFormat(format!("Expected key=value, found '{line}'"))
        })?;
        info.insert(key.trim(), value.trim().trim_matches('"').to_string());
    }
    Ok(info)
}

/// Parse a YAML mapping of tool names to versions. Versions are kept as text.
///
/// # Errors
///
/// Returns `ParseError::Yaml` if the text is not a YAML mapping.
pub fn parse_tool_versions(text: &str) -> Result<OrderedMap<String>, ParseError> {
    if text.trim().is_empty() {
        return Ok(OrderedMap::new());
    }
    let mapping: serde_yaml::Mapping = serde_yaml::from_str(text)?;
    mapping_to_strings(&mapping)
}

fn mapping_to_strings(mapping: &serde_yaml::Mapping) -> Result<OrderedMap<String>, ParseError> {
    let mut out = OrderedMap::new();
    for (key, value) in mapping {
        let value = match value {
            serde_yaml::Value::Null => String::new(),
            other => yaml_key_to_string(other)?,
        };
        out.insert(yaml_key_to_string(key)?, value);
    }
    Ok(out)
}

/// What an assembler command script says about its pipeline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssemblerCommand {
    pub tool_description: String,
    pub version_info: OrderedMap<String>,
    pub command: String,
}

/// Parse an assembler command script.
///
/// Each section is optional and falls back to a default.
///
/// # Errors
///
/// Returns `ParseError::Yaml` if the version lines are not a YAML mapping.
pub fn parse_assembler_command(text: &str) -> Result<AssemblerCommand, ParseError> {
    let tool_description = section(text, DESCRIPTION_START, DESCRIPTION_END)
        .map(|block| {
            block
                .replace('#', "")
                .split('\n')
                .skip(1)
                .collect::<String>()
                .trim()
                .to_string()
        })
        .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string());

    let version_info = match section(text, VERSIONS_START, VERSIONS_END) {
        Some(block) => parse_version_comments(block)?,
        None => OrderedMap::new(),
    };

    let command = match text.find(COMMANDS_START) {
        Some(start) if text.len() > start + COMMANDS_START.len() => text[start..]
            .split('\n')
            .skip(1)
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string(),
        _ => DEFAULT_COMMAND.to_string(),
    };

    Ok(AssemblerCommand {
        tool_description,
        version_info,
        command,
    })
}

/// Text from the first `start` up to the last `end` after it, if non-empty
fn section<'a>(text: &'a str, start: &str, end: &str) -> Option<&'a str> {
    let from = text.find(start)?;
    let to = text.rfind(end)?;
    (to > from + start.len()).then(|| &text[from..to])
}

/// `tool: version` pairs written after a `#` in the versions block
fn parse_version_comments(block: &str) -> Result<OrderedMap<String>, ParseError> {
    let lines: Vec<&str> = block
        .lines()
        .filter_map(|line| {
            let rest = &line[line.find('#')? + 1..];
            let colon = rest.find(':')?;
            (colon > 0 && colon + 1 < rest.len()).then(|| rest.trim())
        })
        .collect();

    if lines.is_empty() {
        return Ok(OrderedMap::new());
    }
    let mapping: serde_yaml::Mapping = serde_yaml::from_str(&lines.join("\n"))?;
    mapping_to_strings(&mapping)
}

/// Tool names and versions printed into an assembler log
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VersionBlock {
    pub tools: Vec<String>,
    pub versions: Vec<String>,
}

impl VersionBlock {
    /// Tools paired with their versions, `None` if the counts differ
    #[must_use]
    pub fn pairs(&self) -> Option<Vec<(&str, &str)>> {
        (self.tools.len() == self.versions.len()).then(|| {
            self.tools
                .iter()
                .map(String::as_str)
                .zip(self.versions.iter().map(String::as_str))
                .collect()
        })
    }
}

/// Extract the auto-printed version block from an assembler log.
///
/// Lines starting with `#` name a tool, other lines are versions. Returns
/// `None` when the log has no version block.
#[must_use]
pub fn parse_version_log(text: &str) -> Option<VersionBlock> {
    let start = text.find(LOG_VERSIONS_START)? + LOG_VERSIONS_START.len();
    let end = text.rfind(LOG_VERSIONS_END)?;
    if end <= start {
        return None;
    }

    let mut block = VersionBlock::default();
    for line in text[start..end].trim_matches('\n').split('\n') {
        if line.is_empty() {
            continue;
        }
        match line.strip_prefix('#') {
            Some(tool) => block.tools.push(tool.trim().to_string()),
            None => block.versions.push(line.to_string()),
        }
    }
    Some(block)
}
