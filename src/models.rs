use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{ReportError, Result};

// ---------------------------------------------------------------------------
// Report type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportType {
    TrialBalance,
    ProfitLoss,
    BalanceSheet,
    CashFlow,
    ChartOfAccounts,
    JournalEntries,
    GeneralLedger,
    AccountSummary,
    AgingAnalysis,
}

impl ReportType {
    /// Every report type, in the order the "export all" document lays them out.
    pub const ALL: [ReportType; 9] = [
        ReportType::TrialBalance,
        ReportType::ProfitLoss,
        ReportType::BalanceSheet,
        ReportType::CashFlow,
        ReportType::ChartOfAccounts,
        ReportType::JournalEntries,
        ReportType::GeneralLedger,
        ReportType::AccountSummary,
        ReportType::AgingAnalysis,
    ];

    /// Wire name, also the endpoint slug.
    pub fn as_str(self) -> &'static str {
        match self {
            ReportType::TrialBalance => "trial-balance",
            ReportType::ProfitLoss => "profit-loss",
            ReportType::BalanceSheet => "balance-sheet",
            ReportType::CashFlow => "cash-flow",
            ReportType::ChartOfAccounts => "chart-of-accounts",
            ReportType::JournalEntries => "journal-entries",
            ReportType::GeneralLedger => "general-ledger",
            ReportType::AccountSummary => "account-summary",
            ReportType::AgingAnalysis => "aging-analysis",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ReportType::TrialBalance => "Trial Balance",
            ReportType::ProfitLoss => "Profit & Loss Statement",
            ReportType::BalanceSheet => "Balance Sheet",
            ReportType::CashFlow => "Cash Flow Statement",
            ReportType::ChartOfAccounts => "Chart of Accounts",
            ReportType::JournalEntries => "Journal Entries",
            ReportType::GeneralLedger => "General Ledger",
            ReportType::AccountSummary => "Account Summary",
            ReportType::AgingAnalysis => "Aging Analysis",
        }
    }

    /// Filename stem: `trial_balance`, `profit_loss`, ...
    pub fn kind(self) -> String {
        self.as_str().replace('-', "_")
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportType {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self> {
        ReportType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ReportError::UnsupportedReportType(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Asset,
    Liability,
    Equity,
    Revenue,
    Expense,
}

impl AccountType {
    pub const ALL: [AccountType; 5] = [
        AccountType::Asset,
        AccountType::Liability,
        AccountType::Equity,
        AccountType::Revenue,
        AccountType::Expense,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AccountType::Asset => "Asset",
            AccountType::Liability => "Liability",
            AccountType::Equity => "Equity",
            AccountType::Revenue => "Revenue",
            AccountType::Expense => "Expense",
        }
    }

    /// Section heading used when rows are grouped by account type.
    pub fn section(self) -> &'static str {
        match self {
            AccountType::Asset => "ASSETS",
            AccountType::Liability => "LIABILITIES",
            AccountType::Equity => "EQUITY",
            AccountType::Revenue => "REVENUE",
            AccountType::Expense => "EXPENSES",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountFilter {
    #[default]
    All,
    Assets,
    Liabilities,
    Equity,
    Revenue,
    Expenses,
}

impl AccountFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            AccountFilter::All => "all",
            AccountFilter::Assets => "assets",
            AccountFilter::Liabilities => "liabilities",
            AccountFilter::Equity => "equity",
            AccountFilter::Revenue => "revenue",
            AccountFilter::Expenses => "expenses",
        }
    }
}

impl FromStr for AccountFilter {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "all" => Ok(AccountFilter::All),
            "assets" => Ok(AccountFilter::Assets),
            "liabilities" => Ok(AccountFilter::Liabilities),
            "equity" => Ok(AccountFilter::Equity),
            "revenue" => Ok(AccountFilter::Revenue),
            "expenses" => Ok(AccountFilter::Expenses),
            other => Err(format!("unknown account filter: {other}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Dates
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

/// Goes through [`DateRange::new`] so a stored range can't be inverted.
impl<'de> Deserialize<'de> for DateRange {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Bounds {
            start: NaiveDate,
            end: NaiveDate,
        }
        let b = Bounds::deserialize(deserializer)?;
        DateRange::new(b.start, b.end).map_err(serde::de::Error::custom)
    }
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(ReportError::InvalidDateRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// January 1st of the current year through today.
    pub fn year_to_date() -> Self {
        let today = chrono::Local::now().date_naive();
        let start = NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today);
        Self { start, end: today }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn label(&self) -> String {
        format!("{} to {}", self.start, self.end)
    }
}

/// Parse a `YYYY-MM-DD` command-line date.
pub fn parse_date(s: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("invalid date '{s}': {e}"))
}

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// Snapshot of the report controls at the moment "generate" is pressed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    pub report_type: ReportType,
    pub range: DateRange,
    pub account_filter: AccountFilter,
    pub include_zero_balance: bool,
    pub show_transaction_details: bool,
    pub group_by_account_type: bool,
}

impl ReportRequest {
    pub fn new(report_type: ReportType, range: DateRange) -> Self {
        Self {
            report_type,
            range,
            account_filter: AccountFilter::All,
            include_zero_balance: false,
            show_transaction_details: true,
            group_by_account_type: false,
        }
    }

    /// Query string pairs sent with the report GET.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("startDate", self.range.start().to_string()),
            ("endDate", self.range.end().to_string()),
            ("accountFilter", self.account_filter.as_str().to_string()),
            ("includeZeroBalance", self.include_zero_balance.to_string()),
            ("showTransactionDetails", self.show_transaction_details.to_string()),
            ("groupByAccountType", self.group_by_account_type.to_string()),
        ]
    }
}

// ---------------------------------------------------------------------------
// Export format
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Pdf,
    Excel,
    Csv,
    Json,
}

impl ExportFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Excel => "excel",
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Excel => "xlsx",
            other => other.as_str(),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pdf" => Ok(ExportFormat::Pdf),
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(format!("unknown export format: {other}")),
        }
    }
}

/// Formats rendered in-process from the displayed report. Spreadsheets are
/// assembled by the backend instead ([`ExportFormat::Excel`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalFormat {
    Pdf,
    Csv,
    Json,
}

impl LocalFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            LocalFormat::Pdf => "pdf",
            LocalFormat::Csv => "csv",
            LocalFormat::Json => "json",
        }
    }

    pub fn extension(self) -> &'static str {
        self.as_str()
    }
}

impl From<LocalFormat> for ExportFormat {
    fn from(format: LocalFormat) -> Self {
        match format {
            LocalFormat::Pdf => ExportFormat::Pdf,
            LocalFormat::Csv => ExportFormat::Csv,
            LocalFormat::Json => ExportFormat::Json,
        }
    }
}

impl FromStr for LocalFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pdf" => Ok(LocalFormat::Pdf),
            "csv" => Ok(LocalFormat::Csv),
            "json" => Ok(LocalFormat::Json),
            "excel" | "xlsx" => Err(
                "spreadsheets are built by the backend; use `remote-export --format excel`".into(),
            ),
            other => Err(format!("unknown export format: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn test_deserialized_range_is_validated() {
        let forward = r#"{"start": "2025-01-01", "end": "2025-03-31"}"#;
        let ok: DateRange = serde_json::from_str(forward).unwrap();
        assert_eq!(ok.end(), d("2025-03-31"));

        let inverted = r#"{"start": "2025-04-01", "end": "2025-03-31"}"#;
        let err = serde_json::from_str::<DateRange>(inverted).unwrap_err();
        assert!(err.to_string().contains("Invalid date range"));
    }

    #[test]
    fn test_report_type_roundtrips_through_wire_name() {
        for t in ReportType::ALL {
            assert_eq!(t.as_str().parse::<ReportType>().unwrap(), t);
        }
    }

    #[test]
    fn test_unknown_report_type_is_unsupported() {
        let err = "tax-return".parse::<ReportType>().unwrap_err();
        assert!(matches!(err, ReportError::UnsupportedReportType(ref s) if s == "tax-return"));
    }

    #[test]
    fn test_report_kind_uses_underscores() {
        assert_eq!(ReportType::ChartOfAccounts.kind(), "chart_of_accounts");
    }

    #[test]
    fn test_date_range_rejects_inverted_bounds() {
        assert!(DateRange::new(d("2025-01-01"), d("2025-12-31")).is_ok());
        assert!(DateRange::new(d("2025-03-01"), d("2025-03-01")).is_ok());
        let err = DateRange::new(d("2025-12-31"), d("2025-01-01")).unwrap_err();
        assert!(matches!(err, ReportError::InvalidDateRange { .. }));
    }

    #[test]
    fn test_year_to_date_is_ordered() {
        let r = DateRange::year_to_date();
        assert!(r.start() <= r.end());
        assert_eq!(r.start().ordinal(), 1);
    }

    #[test]
    fn test_query_pairs() {
        let range = DateRange::new(d("2025-01-01"), d("2025-06-30")).unwrap();
        let mut req = ReportRequest::new(ReportType::TrialBalance, range);
        req.account_filter = AccountFilter::Assets;
        req.include_zero_balance = true;
        let pairs = req.query_pairs();
        assert!(pairs.contains(&("startDate", "2025-01-01".to_string())));
        assert!(pairs.contains(&("endDate", "2025-06-30".to_string())));
        assert!(pairs.contains(&("accountFilter", "assets".to_string())));
        assert!(pairs.contains(&("includeZeroBalance", "true".to_string())));
    }

    #[test]
    fn test_export_extension() {
        assert_eq!(ExportFormat::Excel.extension(), "xlsx");
        assert_eq!(ExportFormat::Pdf.extension(), "pdf");
        assert_eq!(ExportFormat::Csv.extension(), "csv");
        assert_eq!("xlsx".parse::<ExportFormat>().unwrap(), ExportFormat::Excel);
        assert_eq!("json".parse::<LocalFormat>().unwrap(), LocalFormat::Json);
        assert!("excel".parse::<LocalFormat>().unwrap_err().contains("remote-export"));
        assert_eq!(ExportFormat::from(LocalFormat::Csv).extension(), "csv");
    }
}
