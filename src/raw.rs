//! Typed backend payloads, one shape per report type.
//!
//! Every variant declares the exact fields it expects; a response that is
//! missing a field fails to decode rather than being patched up downstream.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::Result;
use crate::models::{AccountType, ReportType};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialBalanceAccount {
    pub code: String,
    pub name: String,
    pub account_type: AccountType,
    pub debit: f64,
    pub credit: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TrialBalanceData {
    pub accounts: Vec<TrialBalanceAccount>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NamedAmount {
    pub name: String,
    pub amount: f64,
}

/// Revenue and expense lines are both positive in the normal case. A negative
/// expense (rebate, reversal) lowers total expenses; amounts are summed with
/// their sign.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProfitLossData {
    pub revenue: Vec<NamedAmount>,
    pub expenses: Vec<NamedAmount>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BalanceLine {
    pub code: String,
    pub name: String,
    pub balance: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BalanceSheetData {
    pub assets: Vec<BalanceLine>,
    pub liabilities: Vec<BalanceLine>,
    pub equity: Vec<BalanceLine>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct CashActivity {
    pub inflows: f64,
    pub outflows: f64,
}

impl CashActivity {
    /// Both sides are positive magnitudes; a negative outflow is a reversal
    /// and adds to the net.
    pub fn net(&self) -> f64 {
        self.inflows - self.outflows
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowData {
    pub beginning_cash: f64,
    pub operating: CashActivity,
    pub investing: CashActivity,
    pub financing: CashActivity,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartAccount {
    pub code: String,
    pub name: String,
    pub account_type: AccountType,
    pub balance: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChartOfAccountsData {
    pub accounts: Vec<ChartAccount>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JournalEntry {
    pub date: NaiveDate,
    pub reference: String,
    pub description: String,
    pub account: String,
    pub debit: f64,
    pub credit: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JournalEntriesData {
    pub entries: Vec<JournalEntry>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub date: NaiveDate,
    pub account_code: String,
    pub account_name: String,
    pub description: String,
    pub debit: f64,
    pub credit: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeneralLedgerData {
    pub entries: Vec<LedgerEntry>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryAccount {
    pub account_type: AccountType,
    pub debit: f64,
    pub credit: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AccountSummaryData {
    pub accounts: Vec<SummaryAccount>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct AgingBucket {
    pub count: u32,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct AgingData {
    pub current: AgingBucket,
    #[serde(alias = "30")]
    pub days30: AgingBucket,
    #[serde(alias = "60")]
    pub days60: AgingBucket,
    #[serde(alias = "90")]
    pub days90: AgingBucket,
}

/// Raw backend data, discriminated by the report that produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum RawReportData {
    TrialBalance(TrialBalanceData),
    ProfitLoss(ProfitLossData),
    BalanceSheet(BalanceSheetData),
    CashFlow(CashFlowData),
    ChartOfAccounts(ChartOfAccountsData),
    JournalEntries(JournalEntriesData),
    GeneralLedger(GeneralLedgerData),
    AccountSummary(AccountSummaryData),
    AgingAnalysis(AgingData),
}

impl RawReportData {
    /// Decode a response body using the shape declared for `report_type`.
    pub fn from_json(report_type: ReportType, body: &str) -> Result<Self> {
        let data = match report_type {
            ReportType::TrialBalance => RawReportData::TrialBalance(serde_json::from_str(body)?),
            ReportType::ProfitLoss => RawReportData::ProfitLoss(serde_json::from_str(body)?),
            ReportType::BalanceSheet => RawReportData::BalanceSheet(serde_json::from_str(body)?),
            ReportType::CashFlow => RawReportData::CashFlow(serde_json::from_str(body)?),
            ReportType::ChartOfAccounts => {
                RawReportData::ChartOfAccounts(serde_json::from_str(body)?)
            }
            ReportType::JournalEntries => {
                RawReportData::JournalEntries(serde_json::from_str(body)?)
            }
            ReportType::GeneralLedger => RawReportData::GeneralLedger(serde_json::from_str(body)?),
            ReportType::AccountSummary => {
                RawReportData::AccountSummary(serde_json::from_str(body)?)
            }
            ReportType::AgingAnalysis => RawReportData::AgingAnalysis(serde_json::from_str(body)?),
        };
        Ok(data)
    }

    pub fn report_type(&self) -> ReportType {
        match self {
            RawReportData::TrialBalance(_) => ReportType::TrialBalance,
            RawReportData::ProfitLoss(_) => ReportType::ProfitLoss,
            RawReportData::BalanceSheet(_) => ReportType::BalanceSheet,
            RawReportData::CashFlow(_) => ReportType::CashFlow,
            RawReportData::ChartOfAccounts(_) => ReportType::ChartOfAccounts,
            RawReportData::JournalEntries(_) => ReportType::JournalEntries,
            RawReportData::GeneralLedger(_) => ReportType::GeneralLedger,
            RawReportData::AccountSummary(_) => ReportType::AccountSummary,
            RawReportData::AgingAnalysis(_) => ReportType::AgingAnalysis,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReportError;

    #[test]
    fn test_decode_trial_balance() {
        let body = r#"{"accounts":[
            {"code":"1000","name":"Cash","accountType":"asset","debit":50000,"credit":0}
        ]}"#;
        let raw = RawReportData::from_json(ReportType::TrialBalance, body).unwrap();
        let RawReportData::TrialBalance(tb) = raw else {
            panic!("wrong variant");
        };
        assert_eq!(tb.accounts[0].code, "1000");
        assert_eq!(tb.accounts[0].account_type, AccountType::Asset);
        assert_eq!(tb.accounts[0].debit, 50000.0);
    }

    #[test]
    fn test_decode_aging() {
        let body = r#"{"current":{"count":2,"amount":7000},"days30":{"count":1,"amount":2000},
                       "days60":{"count":0,"amount":0},"days90":{"count":0,"amount":0}}"#;
        let raw = RawReportData::from_json(ReportType::AgingAnalysis, body).unwrap();
        assert_eq!(raw.report_type(), ReportType::AgingAnalysis);
    }

    #[test]
    fn test_missing_field_is_rejected() {
        // "total" instead of "revenue": no silent fallback
        let body = r#"{"total": 180000, "expenses": []}"#;
        let err = RawReportData::from_json(ReportType::ProfitLoss, body).unwrap_err();
        assert!(matches!(err, ReportError::Json(_)));
    }

    #[test]
    fn test_cash_activity_net_keeps_outflow_sign() {
        let spent = CashActivity {
            inflows: 1000.0,
            outflows: 400.0,
        };
        let reversed = CashActivity {
            inflows: 1000.0,
            outflows: -400.0,
        };
        assert_eq!(spent.net(), 600.0);
        assert_eq!(reversed.net(), 1400.0);
    }
}
