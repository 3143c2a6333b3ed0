use clap::Parser;
use tracing_subscriber::EnvFilter;

use ledgerview::cli::report::ReportArgs;
use ledgerview::cli::{self, Cli, Commands};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Report {
            report_type,
            period,
            account_filter,
            include_zero,
            details,
            group_by_type,
            html,
            export,
            output_dir,
        } => cli::report::run(ReportArgs {
            report_type,
            period,
            account_filter,
            include_zero,
            details,
            group_by_type,
            html,
            export,
            output_dir,
        }),
        Commands::ExportAll { period, output_dir } => cli::export::all(period, output_dir),
        Commands::RemoteExport {
            report_type,
            format,
            period,
            account_filter,
            output_dir,
        } => cli::export::remote(&report_type, format, period, account_filter, output_dir),
        Commands::Config {
            base_url,
            company,
            currency,
            export_dir,
        } => cli::config::run(base_url, company, currency, export_dir),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
