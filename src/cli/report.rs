use std::path::PathBuf;

use colored::Colorize;

use crate::cli::{export_options, PeriodArgs};
use crate::controller::ReportController;
use crate::error::Result;
use crate::fetch::HttpReportSource;
use crate::models::{AccountFilter, LocalFormat, ReportType};
use crate::preview;
use crate::settings::load_settings;

pub struct ReportArgs {
    pub report_type: String,
    pub period: PeriodArgs,
    pub account_filter: AccountFilter,
    pub include_zero: bool,
    pub details: bool,
    pub group_by_type: bool,
    pub html: Option<PathBuf>,
    pub export: Option<LocalFormat>,
    pub output_dir: Option<PathBuf>,
}

pub fn run(args: ReportArgs) -> Result<()> {
    let report_type: ReportType = args.report_type.parse()?;
    let range = args.period.resolve()?;
    let settings = load_settings()?;

    let mut controller = ReportController::new(report_type, range, settings.currency);
    controller.set_account_filter(args.account_filter);
    controller.set_include_zero_balance(args.include_zero);
    controller.set_show_transaction_details(args.details);
    controller.set_group_by_account_type(args.group_by_type);

    let source = HttpReportSource::new(&settings);
    let report = controller.generate(&source)?;
    println!("{}", preview::render_text(report));

    if let Some(balanced) = report.is_balanced() {
        if balanced {
            println!("{}", "Balanced".green());
        } else {
            println!("{}", "NOT BALANCED".red().bold());
        }
    }

    if let Some(path) = &args.html {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, preview::render_page(report, &settings.company_name))?;
        println!("Wrote {}", path.display());
    }

    if let Some(format) = args.export {
        let opts = export_options(&settings, args.output_dir);
        let path = controller.export(format, &opts)?;
        println!("Wrote {}", path.display());
    }

    Ok(())
}
