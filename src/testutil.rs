//! Sample backend data shared by the unit tests.

use chrono::NaiveDate;

use crate::fmt::Currency;
use crate::models::{AccountType, DateRange, ReportRequest, ReportType};
use crate::raw::*;
use crate::reports::{format, ReportResult};

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn range() -> DateRange {
    DateRange::new(date("2025-01-01"), date("2025-03-31")).unwrap()
}

pub fn sample_raw(t: ReportType) -> RawReportData {
    match t {
        ReportType::TrialBalance => RawReportData::TrialBalance(TrialBalanceData {
            accounts: vec![
                TrialBalanceAccount {
                    code: "1000".into(),
                    name: "Cash".into(),
                    account_type: AccountType::Asset,
                    debit: 50000.0,
                    credit: 0.0,
                },
                TrialBalanceAccount {
                    code: "1200".into(),
                    name: "Inventory, Pharmaceuticals".into(),
                    account_type: AccountType::Asset,
                    debit: 25000.0,
                    credit: 0.0,
                },
                TrialBalanceAccount {
                    code: "2000".into(),
                    name: "Accounts Payable".into(),
                    account_type: AccountType::Liability,
                    debit: 0.0,
                    credit: 15000.0,
                },
                TrialBalanceAccount {
                    code: "3000".into(),
                    name: "Owner's Capital".into(),
                    account_type: AccountType::Equity,
                    debit: 0.0,
                    credit: 60000.0,
                },
            ],
        }),
        ReportType::ProfitLoss => RawReportData::ProfitLoss(ProfitLossData {
            revenue: vec![NamedAmount {
                name: "Pharmacy Sales".into(),
                amount: 180000.0,
            }],
            expenses: vec![
                NamedAmount {
                    name: "Cost of Goods Sold".into(),
                    amount: 90000.0,
                },
                NamedAmount {
                    name: "Salaries".into(),
                    amount: 12000.0,
                },
            ],
        }),
        ReportType::BalanceSheet => RawReportData::BalanceSheet(BalanceSheetData {
            assets: vec![
                BalanceLine {
                    code: "1000".into(),
                    name: "Cash".into(),
                    balance: 50000.0,
                },
                BalanceLine {
                    code: "1200".into(),
                    name: "Inventory".into(),
                    balance: 25000.0,
                },
            ],
            liabilities: vec![BalanceLine {
                code: "2000".into(),
                name: "Accounts Payable".into(),
                balance: 15000.0,
            }],
            equity: vec![BalanceLine {
                code: "3000".into(),
                name: "Owner's Capital".into(),
                balance: 60000.0,
            }],
        }),
        ReportType::CashFlow => RawReportData::CashFlow(CashFlowData {
            beginning_cash: 20000.0,
            operating: CashActivity {
                inflows: 80000.0,
                outflows: 45000.0,
            },
            investing: CashActivity {
                inflows: 0.0,
                outflows: 10000.0,
            },
            financing: CashActivity {
                inflows: 5000.0,
                outflows: 0.0,
            },
        }),
        ReportType::ChartOfAccounts => RawReportData::ChartOfAccounts(ChartOfAccountsData {
            accounts: vec![
                ChartAccount {
                    code: "1000".into(),
                    name: "Cash".into(),
                    account_type: AccountType::Asset,
                    balance: 50000.0,
                },
                ChartAccount {
                    code: "5000".into(),
                    name: "Cost of Goods Sold".into(),
                    account_type: AccountType::Expense,
                    balance: 0.0,
                },
            ],
        }),
        ReportType::JournalEntries => RawReportData::JournalEntries(JournalEntriesData {
            entries: vec![
                JournalEntry {
                    date: date("2025-02-10"),
                    reference: "JE-002".into(),
                    description: "Supplier invoice \"Nile Pharma\"".into(),
                    account: "Inventory".into(),
                    debit: 12000.0,
                    credit: 0.0,
                },
                JournalEntry {
                    date: date("2025-01-05"),
                    reference: "JE-001".into(),
                    description: "Cash sale".into(),
                    account: "Sales".into(),
                    debit: 0.0,
                    credit: 3500.0,
                },
            ],
        }),
        ReportType::GeneralLedger => RawReportData::GeneralLedger(GeneralLedgerData {
            entries: vec![
                LedgerEntry {
                    date: date("2025-03-01"),
                    account_code: "1000".into(),
                    account_name: "Cash".into(),
                    description: "Rent".into(),
                    debit: 0.0,
                    credit: 4000.0,
                },
                LedgerEntry {
                    date: date("2025-01-15"),
                    account_code: "1000".into(),
                    account_name: "Cash".into(),
                    description: "Customer receipt".into(),
                    debit: 9000.0,
                    credit: 0.0,
                },
            ],
        }),
        ReportType::AccountSummary => RawReportData::AccountSummary(AccountSummaryData {
            accounts: vec![
                SummaryAccount {
                    account_type: AccountType::Asset,
                    debit: 75000.0,
                    credit: 0.0,
                },
                SummaryAccount {
                    account_type: AccountType::Revenue,
                    debit: 0.0,
                    credit: 180000.0,
                },
            ],
        }),
        ReportType::AgingAnalysis => RawReportData::AgingAnalysis(AgingData {
            current: AgingBucket {
                count: 2,
                amount: 7000.0,
            },
            days30: AgingBucket {
                count: 1,
                amount: 2000.0,
            },
            days60: AgingBucket {
                count: 0,
                amount: 0.0,
            },
            days90: AgingBucket {
                count: 0,
                amount: 0.0,
            },
        }),
    }
}

pub fn sample_result(t: ReportType) -> ReportResult {
    format(&ReportRequest::new(t, range()), &sample_raw(t), Currency::Egp).unwrap()
}
