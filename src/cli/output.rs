//! Printing a finished report in the selected output format.

use std::path::PathBuf;

use crate::cli::OutputFormat;
use crate::report::Report;

/// Print `report` to stdout. `written` lists files already written to disk.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn print_report(report: &Report, written: &[PathBuf], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => print_text(report, written),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
        OutputFormat::Tsv => print_tsv(report),
    }
    Ok(())
}

fn print_text(report: &Report, written: &[PathBuf]) {
    println!("Report Summary");
    println!("{}", "=".repeat(60));

    if report.sections.is_empty() {
        println!("\nNo sections.");
    } else {
        println!("\nSections:");
        for section in &report.sections {
            println!(
                "  {} [{}] ({}): {} datasets, {} items",
                section.module,
                section.anchor,
                section.content.kind(),
                section.content.dataset_count(),
                section.content.item_count(),
            );
        }
    }

    if !report.general_stats.is_empty() {
        println!("\nGeneral statistics:");
        for (sample, cols) in report.general_stats.rows.iter() {
            let cells: Vec<String> = cols
                .iter()
                .map(|(col, value)| match value {
                    serde_json::Value::String(s) => format!("{col}={s}"),
                    other => format!("{col}={other}"),
                })
                .collect();
            println!("  {}: {}", sample, cells.join(", "));
        }
    }

    if !report.data_files.is_empty() {
        println!("\nData files:");
        for name in report.data_files.keys() {
            println!("  {name}");
        }
    }

    if !written.is_empty() {
        println!("\nWritten:");
        for path in written {
            println!("  {}", path.display());
        }
    }
}

fn print_tsv(report: &Report) {
    println!("module\tanchor\tkind\tdatasets\titems");
    for section in &report.sections {
        println!(
            "{}\t{}\t{}\t{}\t{}",
            section.module,
            section.anchor,
            section.content.kind(),
            section.content.dataset_count(),
            section.content.item_count(),
        );
    }
    for (sample, cols) in report.general_stats.rows.iter() {
        for (col, value) in cols.iter() {
            let value = match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            println!("general_stats\t{sample}\t{col}\t\t{value}");
        }
    }
}
