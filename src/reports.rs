use std::collections::BTreeMap;

use chrono::{DateTime, Local};
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::{ReportError, Result};
use crate::fmt::{amounts_equal, is_zero, money, money_or_dash, percent, Currency};
use crate::models::{AccountType, DateRange, ReportRequest, ReportType};
use crate::raw::*;

// ---------------------------------------------------------------------------
// Generic tabular result
// ---------------------------------------------------------------------------

/// The one shape every report is reduced to. Rendering and every export
/// format read from this, so what is on screen is what gets exported.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResult {
    pub report_type: ReportType,
    pub range: DateRange,
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub totals: Option<Vec<String>>,
    pub summary: BTreeMap<String, Value>,
    pub generated_at: DateTime<Local>,
}

impl ReportResult {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// `summary.isBalanced`, for the reports that carry it.
    pub fn is_balanced(&self) -> Option<bool> {
        self.summary.get("isBalanced").and_then(Value::as_bool)
    }
}

/// Accumulates rows at a fixed width so every row matches the header count.
struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    summary: BTreeMap<String, Value>,
}

impl Table {
    fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
            summary: BTreeMap::new(),
        }
    }

    fn width(&self) -> usize {
        self.headers.len()
    }

    fn fit(&self, mut cells: Vec<String>) -> Vec<String> {
        cells.resize(self.width(), String::new());
        cells
    }

    fn row(&mut self, cells: Vec<String>) {
        let cells = self.fit(cells);
        self.rows.push(cells);
    }

    fn section(&mut self, label: &str) {
        self.row(vec![label.to_string()]);
    }

    fn blank(&mut self) {
        self.row(Vec::new());
    }

    fn set(&mut self, key: &str, value: Value) {
        self.summary.insert(key.to_string(), value);
    }

    fn finish(self, req: &ReportRequest, totals: Option<Vec<String>>) -> ReportResult {
        let totals = totals.map(|t| self.fit(t));
        ReportResult {
            report_type: req.report_type,
            range: req.range,
            title: req.report_type.title().to_string(),
            headers: self.headers,
            rows: self.rows,
            totals,
            summary: self.summary,
            generated_at: Local::now(),
        }
    }
}

/// Turn backend data into a [`ReportResult`]. The raw variant has to match the
/// requested report type.
pub fn format(
    req: &ReportRequest,
    raw: &RawReportData,
    currency: Currency,
) -> Result<ReportResult> {
    if raw.report_type() != req.report_type {
        return Err(ReportError::UnsupportedReportType(format!(
            "{} (received {} data)",
            req.report_type,
            raw.report_type()
        )));
    }
    let result = match raw {
        RawReportData::TrialBalance(d) => trial_balance(req, d, currency),
        RawReportData::ProfitLoss(d) => profit_loss(req, d, currency),
        RawReportData::BalanceSheet(d) => balance_sheet(req, d, currency),
        RawReportData::CashFlow(d) => cash_flow(req, d, currency),
        RawReportData::ChartOfAccounts(d) => chart_of_accounts(req, d, currency),
        RawReportData::JournalEntries(d) => journal_entries(req, d, currency),
        RawReportData::GeneralLedger(d) => general_ledger(req, d, currency),
        RawReportData::AccountSummary(d) => account_summary(req, d, currency),
        RawReportData::AgingAnalysis(d) => aging_analysis(req, d, currency),
    };
    Ok(result)
}

/// Order items by account type when grouping is on, emitting a section row
/// before each non-empty group. Input order is kept inside a group.
fn for_each_grouped<T>(
    table: &mut Table,
    items: &[&T],
    grouped: bool,
    account_type: impl Fn(&T) -> AccountType,
    mut emit: impl FnMut(&mut Table, &T),
) {
    if !grouped {
        for item in items {
            emit(table, *item);
        }
        return;
    }
    for ty in AccountType::ALL {
        let group: Vec<&&T> = items.iter().filter(|i| account_type(**i) == ty).collect();
        if group.is_empty() {
            continue;
        }
        table.section(ty.section());
        for item in group {
            emit(table, *item);
        }
    }
}

// ---------------------------------------------------------------------------
// Trial Balance
// ---------------------------------------------------------------------------

fn trial_balance(req: &ReportRequest, data: &TrialBalanceData, cur: Currency) -> ReportResult {
    let mut table = Table::new(&[
        "Account Code",
        "Account Name",
        "Debit Balance",
        "Credit Balance",
    ]);

    let shown: Vec<&TrialBalanceAccount> = data
        .accounts
        .iter()
        .filter(|a| req.include_zero_balance || !(is_zero(a.debit) && is_zero(a.credit)))
        .collect();

    for_each_grouped(
        &mut table,
        &shown,
        req.group_by_account_type,
        |a| a.account_type,
        |t, a| {
            t.row(vec![
                a.code.clone(),
                a.name.clone(),
                money_or_dash(a.debit, cur),
                money_or_dash(a.credit, cur),
            ])
        },
    );

    let total_debit: f64 = shown.iter().map(|a| a.debit).sum();
    let total_credit: f64 = shown.iter().map(|a| a.credit).sum();

    table.set("isBalanced", json!(amounts_equal(total_debit, total_credit)));
    table.set("accountCount", json!(shown.len()));
    table.set("totalDebit", json!(total_debit));
    table.set("totalCredit", json!(total_credit));

    let totals = vec![
        "Total".to_string(),
        String::new(),
        money(total_debit, cur),
        money(total_credit, cur),
    ];
    table.finish(req, Some(totals))
}

// ---------------------------------------------------------------------------
// Profit & Loss
// ---------------------------------------------------------------------------

fn profit_loss(req: &ReportRequest, data: &ProfitLossData, cur: Currency) -> ReportResult {
    let mut table = Table::new(&["Account", "Amount"]);

    let total_revenue: f64 = data.revenue.iter().map(|i| i.amount).sum();
    let total_expenses: f64 = data.expenses.iter().map(|i| i.amount).sum();
    let net_income = total_revenue - total_expenses;

    table.section("REVENUE");
    for item in &data.revenue {
        table.row(vec![item.name.clone(), money(item.amount, cur)]);
    }
    table.row(vec!["Total Revenue".into(), money(total_revenue, cur)]);
    table.blank();

    table.section("EXPENSES");
    for item in &data.expenses {
        table.row(vec![item.name.clone(), money(item.amount, cur)]);
    }
    table.row(vec!["Total Expenses".into(), money(total_expenses, cur)]);
    table.blank();

    table.row(vec!["NET INCOME".into(), money(net_income, cur)]);

    let margin = if is_zero(total_revenue) {
        0.0
    } else {
        net_income / total_revenue * 100.0
    };

    table.set("totalRevenue", json!(total_revenue));
    table.set("totalExpenses", json!(total_expenses));
    table.set("netIncome", json!(net_income));
    table.set("profitMargin", json!(percent(margin, 2)));

    table.finish(req, None)
}

// ---------------------------------------------------------------------------
// Balance Sheet
// ---------------------------------------------------------------------------

fn balance_sheet(req: &ReportRequest, data: &BalanceSheetData, cur: Currency) -> ReportResult {
    let mut table = Table::new(&["Account Code", "Account Name", "Balance"]);

    let section = |t: &mut Table, label: &str, total_label: &str, lines: &[BalanceLine]| {
        t.section(label);
        for line in lines {
            t.row(vec![line.code.clone(), line.name.clone(), money(line.balance, cur)]);
        }
        let total: f64 = lines.iter().map(|l| l.balance).sum();
        t.row(vec![total_label.to_string(), String::new(), money(total, cur)]);
        t.blank();
        total
    };

    let total_assets = section(&mut table, "ASSETS", "Total Assets", &data.assets);
    let total_liabilities =
        section(&mut table, "LIABILITIES", "Total Liabilities", &data.liabilities);
    let total_equity = section(&mut table, "EQUITY", "Total Equity", &data.equity);
    let liabilities_and_equity = total_liabilities + total_equity;

    table.set("totalAssets", json!(total_assets));
    table.set("totalLiabilities", json!(total_liabilities));
    table.set("totalEquity", json!(total_equity));
    table.set(
        "isBalanced",
        json!(amounts_equal(total_assets, liabilities_and_equity)),
    );

    let totals = vec![
        "Total Liabilities + Equity".to_string(),
        String::new(),
        money(liabilities_and_equity, cur),
    ];
    table.finish(req, Some(totals))
}

// ---------------------------------------------------------------------------
// Cash Flow
// ---------------------------------------------------------------------------

fn cash_flow(req: &ReportRequest, data: &CashFlowData, cur: Currency) -> ReportResult {
    let mut table = Table::new(&["Activity", "Amount"]);

    let activities = [
        ("Operating", &data.operating),
        ("Investing", &data.investing),
        ("Financing", &data.financing),
    ];

    let mut net_change = 0.0;
    for (label, activity) in activities {
        let net = activity.net();
        net_change += net;
        table.section(&format!("{} ACTIVITIES", label.to_uppercase()));
        table.row(vec!["Cash Inflows".into(), money(activity.inflows, cur)]);
        table.row(vec!["Cash Outflows".into(), money(-activity.outflows, cur)]);
        table.row(vec![
            format!("Net Cash from {label} Activities"),
            money(net, cur),
        ]);
        table.blank();
        table.set(&format!("net{label}"), json!(net));
    }

    let ending_cash = data.beginning_cash + net_change;
    table.row(vec!["Net Change in Cash".into(), money(net_change, cur)]);
    table.row(vec!["Beginning Cash".into(), money(data.beginning_cash, cur)]);

    table.set("netChange", json!(net_change));
    table.set("beginningCash", json!(data.beginning_cash));
    table.set("endingCash", json!(ending_cash));

    let totals = vec!["Ending Cash".to_string(), money(ending_cash, cur)];
    table.finish(req, Some(totals))
}

// ---------------------------------------------------------------------------
// Chart of Accounts
// ---------------------------------------------------------------------------

fn chart_of_accounts(
    req: &ReportRequest,
    data: &ChartOfAccountsData,
    cur: Currency,
) -> ReportResult {
    let mut table = Table::new(&["Account Code", "Account Name", "Account Type", "Balance"]);

    let accounts: Vec<&ChartAccount> = data.accounts.iter().collect();
    for_each_grouped(
        &mut table,
        &accounts,
        req.group_by_account_type,
        |a| a.account_type,
        |t, a| {
            t.row(vec![
                a.code.clone(),
                a.name.clone(),
                a.account_type.label().to_string(),
                money_or_dash(a.balance.abs(), cur),
            ])
        },
    );

    table.set("accountCount", json!(accounts.len()));
    table.finish(req, None)
}

// ---------------------------------------------------------------------------
// Journal Entries
// ---------------------------------------------------------------------------

fn journal_entries(req: &ReportRequest, data: &JournalEntriesData, cur: Currency) -> ReportResult {
    let mut table = Table::new(&["Date", "Reference", "Description", "Account", "Debit", "Credit"]);

    let mut entries: Vec<&JournalEntry> = data.entries.iter().collect();
    entries.sort_by_key(|e| e.date);

    for e in &entries {
        let description = if req.show_transaction_details {
            e.description.clone()
        } else {
            String::new()
        };
        table.row(vec![
            e.date.to_string(),
            e.reference.clone(),
            description,
            e.account.clone(),
            money_or_dash(e.debit, cur),
            money_or_dash(e.credit, cur),
        ]);
    }

    let total_debit: f64 = entries.iter().map(|e| e.debit).sum();
    let total_credit: f64 = entries.iter().map(|e| e.credit).sum();
    table.set("entryCount", json!(entries.len()));
    table.set("totalDebit", json!(total_debit));
    table.set("totalCredit", json!(total_credit));
    table.set("isBalanced", json!(amounts_equal(total_debit, total_credit)));

    let totals = vec![
        "Total".to_string(),
        String::new(),
        String::new(),
        String::new(),
        money(total_debit, cur),
        money(total_credit, cur),
    ];
    table.finish(req, Some(totals))
}

// ---------------------------------------------------------------------------
// General Ledger
// ---------------------------------------------------------------------------

fn general_ledger(req: &ReportRequest, data: &GeneralLedgerData, cur: Currency) -> ReportResult {
    let mut table = Table::new(&["Date", "Account", "Description", "Debit", "Credit", "Balance"]);

    let mut entries: Vec<&LedgerEntry> = data.entries.iter().collect();
    entries.sort_by_key(|e| e.date);

    let mut running = 0.0f64;
    for e in &entries {
        running += e.debit - e.credit;
        let description = if req.show_transaction_details {
            e.description.clone()
        } else {
            String::new()
        };
        table.row(vec![
            e.date.to_string(),
            format!("{} - {}", e.account_code, e.account_name),
            description,
            money_or_dash(e.debit, cur),
            money_or_dash(e.credit, cur),
            money(running, cur),
        ]);
    }

    let total_debit: f64 = entries.iter().map(|e| e.debit).sum();
    let total_credit: f64 = entries.iter().map(|e| e.credit).sum();
    table.set("entryCount", json!(entries.len()));
    table.set("totalDebit", json!(total_debit));
    table.set("totalCredit", json!(total_credit));
    table.set("closingBalance", json!(running));

    let totals = vec![
        "Total".to_string(),
        String::new(),
        String::new(),
        money(total_debit, cur),
        money(total_credit, cur),
        money(running, cur),
    ];
    table.finish(req, Some(totals))
}

// ---------------------------------------------------------------------------
// Account Summary
// ---------------------------------------------------------------------------

fn account_summary(req: &ReportRequest, data: &AccountSummaryData, cur: Currency) -> ReportResult {
    let mut table = Table::new(&["Account Type", "Accounts", "Total Debit", "Total Credit"]);

    let mut total_count = 0usize;
    let mut total_debit = 0.0f64;
    let mut total_credit = 0.0f64;
    for ty in AccountType::ALL {
        let group: Vec<&SummaryAccount> =
            data.accounts.iter().filter(|a| a.account_type == ty).collect();
        if group.is_empty() {
            continue;
        }
        let debit: f64 = group.iter().map(|a| a.debit).sum();
        let credit: f64 = group.iter().map(|a| a.credit).sum();
        total_count += group.len();
        total_debit += debit;
        total_credit += credit;
        table.row(vec![
            ty.label().to_string(),
            group.len().to_string(),
            money(debit, cur),
            money(credit, cur),
        ]);
    }

    table.set("accountCount", json!(total_count));
    table.set("totalDebit", json!(total_debit));
    table.set("totalCredit", json!(total_credit));

    let totals = vec![
        "Total".to_string(),
        total_count.to_string(),
        money(total_debit, cur),
        money(total_credit, cur),
    ];
    table.finish(req, Some(totals))
}

// ---------------------------------------------------------------------------
// Aging Analysis
// ---------------------------------------------------------------------------

fn aging_analysis(req: &ReportRequest, data: &AgingData, cur: Currency) -> ReportResult {
    let mut table = Table::new(&["Aging Period", "Count", "Amount"]);

    let buckets = [
        ("Current (0-30 days)", &data.current),
        ("31-60 days", &data.days30),
        ("61-90 days", &data.days60),
        ("Over 90 days", &data.days90),
    ];
    for (label, bucket) in buckets {
        table.row(vec![
            label.to_string(),
            bucket.count.to_string(),
            money(bucket.amount, cur),
        ]);
    }

    let total_count: u64 = buckets.iter().map(|(_, b)| u64::from(b.count)).sum();
    let total_amount: f64 = buckets.iter().map(|(_, b)| b.amount).sum();
    let overdue: f64 = buckets[1..].iter().map(|(_, b)| b.amount).sum();

    table.set("totalCount", json!(total_count));
    table.set("totalOutstanding", json!(total_amount));
    table.set("overdueAmount", json!(overdue));

    let totals = vec![
        "Total Outstanding".to_string(),
        total_count.to_string(),
        money(total_amount, cur),
    ];
    table.finish(req, Some(totals))
}
