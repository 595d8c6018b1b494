//! CPU times per tool, added as a general statistics column.

use tracing::info;

use crate::core::ordered::OrderedMap;
use crate::modules::{parse_or_skip, InputRole, ModuleError, ModuleInfo, ModuleInputs};
use crate::parsing::cpu_times::{format_cpu_time, parse_cpu_times};
use crate::plot::table::{TableHeader, TableRows};
use crate::report::Report;
use crate::web::format_detection::InputKind;

pub const INFO: ModuleInfo = ModuleInfo {
    name: "assembler benchmark CPU times",
    anchor: "ab-cpu-times",
    href: Some("https://www.github.com/cvdelannoy/MinION_assembler_benchmark"),
    info: "is a tiny custom module to parse a yaml file containing CPU running times of several \
           tools included in a de novo assembler benchmarking tool",
};

pub const ROLES: &[InputRole] = &[InputRole {
    name: "times",
    kind: InputKind::YamlMapping,
    description: "YAML mapping of tool name to CPU seconds",
}];

pub const CPU_TIME_COLUMN: &str = "CPU time";

/// # Errors
///
/// Returns `ModuleError::NoData` if no file has an entry.
pub fn run(inputs: &ModuleInputs, report: &mut Report) -> Result<(), ModuleError> {
    let mut rows: TableRows = OrderedMap::new();

    for file in inputs.files("times") {
        let Some(entries) = parse_or_skip(file, parse_cpu_times) else {
            continue;
        };
        for (tool, seconds) in entries {
            let mut cols = OrderedMap::new();
            cols.insert(CPU_TIME_COLUMN, serde_json::Value::String(format_cpu_time(seconds)));
            rows.insert(tool, cols);
        }
    }

    if rows.is_empty() {
        return Err(ModuleError::NoData(INFO.name));
    }
    info!("Found {} CPU time entries", rows.len());

    let mut headers = OrderedMap::new();
    headers.insert(
        CPU_TIME_COLUMN,
        TableHeader::new(CPU_TIME_COLUMN, "CPU time used by the tool (H:MM:SS)"),
    );
    report.general_stats.add_cols(rows, headers);
    Ok(())
}
