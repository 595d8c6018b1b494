//! Writing a report and its data files to an output directory.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::report::{DataFormat, Report, ReportError};

/// Name of the report file inside the output directory
pub const REPORT_FILE_NAME: &str = "report.json";

/// Write every data file as `<name>.<ext>` and the full report as
/// `report.json`, creating `dir` if needed. Returns the written paths.
///
/// # Errors
///
/// Returns `ReportError` if the directory or a file cannot be written or a
/// value fails to serialize.
pub fn write_report(report: &Report, dir: &Path, format: DataFormat) -> Result<Vec<PathBuf>, ReportError> {
    fs::create_dir_all(dir)?;
    let mut written = Vec::with_capacity(report.data_files.len() + 1);

    for (name, value) in report.data_files.iter() {
        let path = dir.join(format!("{name}.{}", format.extension()));
        write_value(&path, value, format)?;
        written.push(path);
    }

    let report_path = dir.join(REPORT_FILE_NAME);
    let mut writer = BufWriter::new(fs::File::create(&report_path)?);
    serde_json::to_writer_pretty(&mut writer, report)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    written.push(report_path);

    info!("Wrote {} files to {}", written.len(), dir.display());
    Ok(written)
}

fn write_value(path: &Path, value: &serde_json::Value, format: DataFormat) -> Result<(), ReportError> {
    let mut writer = BufWriter::new(fs::File::create(path)?);
    match format {
        DataFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, value)?;
            writer.write_all(b"\n")?;
        }
        DataFormat::Yaml => serde_yaml::to_writer(&mut writer, value)?,
    }
    writer.flush()?;
    Ok(())
}
