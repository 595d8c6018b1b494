use clap::Parser;
use tracing_subscriber::EnvFilter;

use ab_report::cli::{self, Commands};
use ab_report::web;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("ab_report=debug,info")
    } else {
        EnvFilter::new("ab_report=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let (format, verbose) = (cli.format, cli.verbose);
    match cli.command {
        Commands::Synteny(args) => cli::modules::run_synteny(args, format, verbose)?,
        Commands::Nucmer(args) => cli::modules::run_nucmer(args, format, verbose)?,
        Commands::Mummerplot(args) => cli::modules::run_mummerplot(args, format, verbose)?,
        Commands::Minimap2(args) => cli::modules::run_minimap2(args, format, verbose)?,
        Commands::Jellyfish(args) => cli::modules::run_jellyfish(args, format, verbose)?,
        Commands::CpuTimes(args) => cli::modules::run_cpu_times(args, format, verbose)?,
        Commands::ReadQuality(args) => cli::modules::run_read_quality(args, format, verbose)?,
        Commands::Methods(args) => cli::modules::run_methods(args, format, verbose)?,
        Commands::Report(args) => cli::report::run(args, format, verbose)?,
        Commands::Serve(args) => web::server::run(args)?,
    }

    Ok(())
}
