use std::path::PathBuf;

use crate::cli::{export_options, PeriodArgs};
use crate::controller::ReportController;
use crate::error::Result;
use crate::fetch::HttpReportSource;
use crate::models::{AccountFilter, ExportFormat, ReportType};
use crate::settings::load_settings;

/// One PDF with every report type for the period.
pub fn all(period: PeriodArgs, output_dir: Option<PathBuf>) -> Result<()> {
    let range = period.resolve()?;
    let settings = load_settings()?;
    let controller = ReportController::new(ReportType::TrialBalance, range, settings.currency);
    let source = HttpReportSource::new(&settings);
    let path = controller.export_all(&source, &export_options(&settings, output_dir))?;
    println!("Wrote {}", path.display());
    Ok(())
}

/// Backend-assembled export file.
pub fn remote(
    report_type: &str,
    format: ExportFormat,
    period: PeriodArgs,
    account_filter: AccountFilter,
    output_dir: Option<PathBuf>,
) -> Result<()> {
    let report_type: ReportType = report_type.parse()?;
    let range = period.resolve()?;
    let settings = load_settings()?;
    let mut controller = ReportController::new(report_type, range, settings.currency);
    controller.set_account_filter(account_filter);
    let source = HttpReportSource::new(&settings);
    let path = controller.export_remote(&source, format, &export_options(&settings, output_dir))?;
    println!("Wrote {}", path.display());
    Ok(())
}
