//! Methods section: publication metadata, per-assembler pipeline details and
//! the analysis tools used.
//!
//! Exactly one publication info file and one tool versions file are expected.
//! Assembler command scripts and their log files are matched by file stem, so
//! `canu.sh` and `canu.log` describe the same pipeline.

use serde::Serialize;
use tracing::{error, info, warn};

use crate::core::ordered::OrderedMap;
use crate::modules::{parse_or_skip, InputRole, ModuleError, ModuleInfo, ModuleInputs};
use crate::parsing::input::InputFile;
use crate::parsing::methods::{
    parse_assembler_command, parse_publication_info, parse_tool_versions, parse_version_log,
    AssemblerCommand,
};
use crate::parsing::ParseError;
use crate::report::{Report, Section, SectionContent};
use crate::web::format_detection::InputKind;

pub const INFO: ModuleInfo = ModuleInfo {
    name: "Methods",
    anchor: "ab_methods_section",
    href: None,
    info: "",
};

pub const ROLES: &[InputRole] = &[
    InputRole {
        name: "publication_info",
        kind: InputKind::KeyValue,
        description: "key=\"value\" lines: authors, organism, flowcell, kit, basecaller",
    },
    InputRole {
        name: "tool_versions",
        kind: InputKind::YamlMapping,
        description: "YAML mapping of analysis tool to version",
    },
    InputRole {
        name: "assembler_commands",
        kind: InputKind::ShellScript,
        description: "Assembler pipeline scripts",
    },
    InputRole {
        name: "log_files",
        kind: InputKind::Log,
        description: "Assembler logs with an auto-printed version block",
    },
];

pub const DATA_FILE: &str = "ab_methods";

const PUBLICATION_INFO: &str = "publication info";
const TOOL_VERSIONS: &str = "analysis tool versions";

/// Text of the methods section
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodsContent {
    pub authors: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    /// Keyed by command script stem
    pub pipelines: OrderedMap<AssemblerCommand>,
    pub readset_quality: String,
    pub assembly_quality: String,
}

/// # Errors
///
/// Returns `ModuleError::NoData` without publication info,
/// `ModuleError::MissingField` if publication info or tool versions lack a
/// value the text needs, `ModuleError::Inconsistent` for a log whose tool and
/// version counts differ, and `ModuleError::Parse` for unreadable publication
/// info or tool versions.
pub fn run(inputs: &ModuleInputs, report: &mut Report) -> Result<(), ModuleError> {
    let publication_info = singleton(inputs, "publication_info", PUBLICATION_INFO)
        .map(|file| parse_required(file, parse_publication_info))
        .transpose()?;
    let tool_versions = singleton(inputs, "tool_versions", TOOL_VERSIONS)
        .map(|file| parse_required(file, parse_tool_versions))
        .transpose()?
        .unwrap_or_default();

    let mut pipelines: OrderedMap<AssemblerCommand> = OrderedMap::new();
    for file in inputs.files("assembler_commands") {
        if let Some(command) = parse_or_skip(file, parse_assembler_command) {
            pipelines.insert(file.stem(), command);
        }
    }
    for file in inputs.files("log_files") {
        apply_log_versions(file, &mut pipelines)?;
    }

    let Some(publication_info) = publication_info else {
        return Err(ModuleError::NoData(INFO.name));
    };
    info!("Found {} assembler pipelines", pipelines.len());

    let content = build_content(&publication_info, &tool_versions, pipelines)?;

    report.add_data_file(DATA_FILE, serde_json::to_value(&content)?);
    report.add_section(Section::new(
        &INFO,
        "methods",
        SectionContent::Methods(Box::new(content)),
    ));
    Ok(())
}

/// The single file for `role`, or `None` (logged) when there are zero or several
fn singleton<'a>(inputs: &'a ModuleInputs, role: &str, label: &str) -> Option<&'a InputFile> {
    match inputs.files(role) {
        [file] => Some(file),
        [] => {
            error!("No {} file found!", label);
            None
        }
        files => {
            error!("More than one {} file found! ({} files)", label, files.len());
            None
        }
    }
}

fn parse_required<T>(
    file: &InputFile,
    parse: impl FnOnce(&str) -> Result<T, ParseError>,
) -> Result<T, ModuleError> {
    parse(&file.content).map_err(|source| ModuleError::Parse {
        file: file.file_name.clone(),
        source,
    })
}

/// Update versions of tools already listed for the log's pipeline
fn apply_log_versions(
    file: &InputFile,
    pipelines: &mut OrderedMap<AssemblerCommand>,
) -> Result<(), ModuleError> {
    let pipeline_name = file.stem();
    let Some(pipeline) = pipelines.get_mut(pipeline_name) else {
        warn!(
            "Log file {} has no matching assembler command script. Skipping",
            file.file_name
        );
        return Ok(());
    };

    let Some(block) = parse_version_log(&file.content) else {
        warn!("No version information found for pipeline {}. Skipping", pipeline_name);
        return Ok(());
    };

    let pairs = block.pairs().ok_or_else(|| {
        ModuleError::Inconsistent(format!(
            "Assembler log {} lists {} tools but {} versions",
            file.file_name,
            block.tools.len(),
            block.versions.len()
        ))
    })?;

    for (tool, version) in pairs {
        if pipeline.version_info.contains(tool) {
            pipeline.version_info.insert(tool, version.to_string());
        } else {
            warn!(
                "Tool {} is in assembler log file for pipeline {}, but not in command file. Skipping...",
                tool, pipeline_name
            );
        }
    }
    Ok(())
}

fn field<'a>(
    values: &'a OrderedMap<String>,
    key: &str,
    source_name: &'static str,
) -> Result<&'a str, ModuleError> {
    values
        .get(key)
        .map(String::as_str)
        .ok_or_else(|| ModuleError::MissingField {
            field: key.to_string(),
            source_name,
        })
}

fn build_content(
    publication_info: &OrderedMap<String>,
    tool_versions: &OrderedMap<String>,
    pipelines: OrderedMap<AssemblerCommand>,
) -> Result<MethodsContent, ModuleError> {
    let publication = |key: &str| field(publication_info, key, PUBLICATION_INFO);
    let version = |key: &str| field(tool_versions, key, TOOL_VERSIONS);

    let authors = publication("authors")?.to_string();

    let abstract_text = format!(
        "The MinION is a portable DNA sequencer that generates long error-prone reads. As both the \
         hardware and analysis software are updated regularly, the most suitable pipeline for \
         subsequent analyses of a dataset generated with a given combination of hardware and \
         software for a given organism is not always clear. Here we present a benchmark for a \
         selection of de novo assemblers available to MinION users, on a read set of {organism}. \
         This benchmark is based on a benchmarking routine, designed to facilitate easy \
         replication on a read set of choice and addition of other de novo assembly pipelines.",
        organism = publication("organism")?,
    );

    let readset_quality = format!(
        "Reads in this dataset were generated on a Minion with {flowcell} flowcell with {kit} kit. \
         The reads were basecalled using {basecaller}. Prior to assembly, the quality of the \
         untreated readset was analysed using NanoPlot (version: {nanoplot}) and mapped using \
         Minimap2 (version: {minimap2}).",
        flowcell = publication("flowcell")?,
        kit = publication("kit")?,
        basecaller = publication("basecaller")?.replace('_', " "),
        nanoplot = version("Nanoplot")?,
        minimap2 = version("Minimap2")?,
    );

    let assembly_quality = format!(
        "Produced assemblies were analyzed and compared on continuity and agreement with the \
         reference genome. Quast (version: {quast}) was used to determine a wide array of quality \
         metrics in both quality categories and produce synteny plots. To elucidate any bias in \
         the occurrence of certain sequences, 5-mers in the assemblies and the reference genomes \
         were compared using Jellyfish (version: {jellyfish}). Finally, results were summarized \
         into this report.",
        quast = version("Quast")?,
        jellyfish = version("Jellyfish")?,
    );

    Ok(MethodsContent {
        authors,
        abstract_text,
        pipelines,
        readset_quality,
        assembly_quality,
    })
}
