use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::{info, warn};

use crate::cli::output::print_report;
use crate::cli::OutputFormat;
use crate::config::RunConfig;
use crate::modules::{ModuleError, ModuleInputs};
use crate::report::writer::write_report;
use crate::report::{DataFormat, Report};

#[derive(Args)]
pub struct ReportArgs {
    /// YAML run configuration listing modules and their inputs
    #[arg(short, long, required = true)]
    pub config: PathBuf,

    /// Output directory (overrides the config's output_dir)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Serialization of data files (overrides the config's data_format)
    #[arg(long, value_enum)]
    pub data_format: Option<DataFormat>,
}

pub fn run(args: ReportArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let config = RunConfig::load(&args.config)
        .with_context(|| format!("Failed to load {}", args.config.display()))?;

    if verbose {
        eprintln!("Loaded {} module runs from {}", config.modules.len(), args.config.display());
    }

    let mut report = Report::new();
    for module_run in &config.modules {
        let kind = module_run.kind()?;

        let mut inputs = ModuleInputs::new();
        for (role, paths) in &module_run.inputs {
            inputs
                .load_paths(role, paths)
                .with_context(|| format!("Failed to load inputs for module '{kind}'"))?;
        }

        match kind.run(&inputs, &module_run.settings(), &mut report) {
            Ok(()) => info!("Module '{}' done", kind),
            Err(ModuleError::NoData(name)) => {
                warn!("No usable input for {}; skipping section", name);
            }
            Err(e) => return Err(e).with_context(|| format!("Module '{kind}' failed")),
        }
    }

    if report.is_empty() {
        anyhow::bail!("No module produced any output");
    }

    let output_dir = args.output_dir.unwrap_or(config.output_dir);
    let data_format = args.data_format.unwrap_or(config.data_format);
    let written = write_report(&report, &output_dir, data_format)
        .with_context(|| format!("Failed to write report to {}", output_dir.display()))?;

    print_report(&report, &written, format)
}
