pub mod config;
pub mod export;
pub mod report;

use std::path::PathBuf;

use chrono::{Datelike, NaiveDate};
use clap::{ArgAction, Args, Parser, Subcommand};

use crate::error::Result;
use crate::export::ExportOptions;
use crate::models::{parse_date, AccountFilter, DateRange, ExportFormat, LocalFormat};
use crate::settings::Settings;

#[derive(Parser)]
#[command(
    name = "ledgerview",
    version,
    about = "Generate and export accounting reports."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate one report and print it.
    Report {
        /// trial-balance, profit-loss, balance-sheet, cash-flow,
        /// chart-of-accounts, journal-entries, general-ledger,
        /// account-summary, aging-analysis
        report_type: String,
        #[command(flatten)]
        period: PeriodArgs,
        /// all, assets, liabilities, equity, revenue, expenses
        #[arg(long = "account-filter", default_value = "all")]
        account_filter: AccountFilter,
        /// Keep accounts whose debit and credit are both zero
        #[arg(long = "include-zero")]
        include_zero: bool,
        /// Show transaction descriptions (true/false)
        #[arg(long, default_value_t = true, action = ArgAction::Set)]
        details: bool,
        /// Insert a section row before each account type
        #[arg(long = "group-by-type")]
        group_by_type: bool,
        /// Also write the HTML preview to this file
        #[arg(long)]
        html: Option<PathBuf>,
        /// Export after generating: pdf, csv, json (spreadsheets: remote-export)
        #[arg(long)]
        export: Option<LocalFormat>,
        /// Directory for exported files (default: configured export dir)
        #[arg(long = "output-dir")]
        output_dir: Option<PathBuf>,
    },
    /// Export every report type for a period into one PDF.
    ExportAll {
        #[command(flatten)]
        period: PeriodArgs,
        #[arg(long = "output-dir")]
        output_dir: Option<PathBuf>,
    },
    /// Ask the backend to assemble an export file (real .xlsx for excel).
    RemoteExport {
        report_type: String,
        /// pdf, excel, csv, json
        #[arg(long)]
        format: ExportFormat,
        #[command(flatten)]
        period: PeriodArgs,
        #[arg(long = "account-filter", default_value = "all")]
        account_filter: AccountFilter,
        #[arg(long = "output-dir")]
        output_dir: Option<PathBuf>,
    },
    /// Show or update settings.
    Config {
        /// Accounting API base URL
        #[arg(long = "base-url")]
        base_url: Option<String>,
        /// Company name printed on PDF exports
        #[arg(long)]
        company: Option<String>,
        /// EGP or USD
        #[arg(long)]
        currency: Option<String>,
        /// Default directory for exports
        #[arg(long = "export-dir")]
        export_dir: Option<String>,
    },
}

#[derive(Args, Clone, Debug)]
pub struct PeriodArgs {
    /// Start date (YYYY-MM-DD, default: January 1st)
    #[arg(long = "from", value_parser = parse_date)]
    pub from: Option<NaiveDate>,
    /// End date (YYYY-MM-DD, default: today)
    #[arg(long = "to", value_parser = parse_date)]
    pub to: Option<NaiveDate>,
}

impl PeriodArgs {
    /// Missing bounds default to the current year to date. A lone `--to`
    /// starts on January 1st of that year.
    pub fn resolve(&self) -> Result<DateRange> {
        let ytd = DateRange::year_to_date();
        let end = self.to.unwrap_or(ytd.end());
        let start = match (self.from, self.to) {
            (Some(from), _) => from,
            (None, Some(to)) => NaiveDate::from_ymd_opt(to.year(), 1, 1).unwrap_or(to),
            (None, None) => ytd.start(),
        };
        DateRange::new(start, end)
    }
}

pub(crate) fn export_options(settings: &Settings, output_dir: Option<PathBuf>) -> ExportOptions {
    ExportOptions {
        output_dir: output_dir.unwrap_or_else(|| settings.export_dir()),
        company: settings.company_name.clone(),
    }
}
