use std::time::Duration;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, warn};
use ureq::Agent;

use crate::error::{ReportError, Result};
use crate::models::{AccountFilter, ExportFormat, ReportRequest, ReportType};
use crate::raw::RawReportData;
use crate::settings::Settings;

/// Where report data comes from. The HTTP client is the production source;
/// anything else (fixtures, a cache) can stand in behind the same seam.
pub trait ReportSource {
    /// One request per call; no retry.
    fn fetch(&self, request: &ReportRequest) -> Result<RawReportData>;

    /// Ask the backend to assemble a file (xlsx, pdf, ...) and return its bytes.
    fn export_file(&self, request: &ExportRequest) -> Result<Vec<u8>>;
}

/// Body of the backend export endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    pub format: ExportFormat,
    pub report_type: ReportType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub account_filter: AccountFilter,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub as_of_date: Option<NaiveDate>,
}

impl ExportRequest {
    pub fn from_report(request: &ReportRequest, format: ExportFormat) -> Self {
        let as_of_date = match request.report_type {
            ReportType::BalanceSheet | ReportType::AgingAnalysis => Some(request.range.end()),
            _ => None,
        };
        Self {
            format,
            report_type: request.report_type,
            start_date: request.range.start(),
            end_date: request.range.end(),
            account_filter: request.account_filter,
            as_of_date,
        }
    }
}

pub fn report_url(base_url: &str, report_type: ReportType) -> String {
    format!(
        "{}/accounting/reports/{}",
        base_url.trim_end_matches('/'),
        report_type.as_str()
    )
}

pub fn export_url(base_url: &str) -> String {
    format!("{}/accounting/reports/export", base_url.trim_end_matches('/'))
}

fn map_err(url: &str, e: ureq::Error) -> ReportError {
    match e {
        ureq::Error::StatusCode(status) => ReportError::Http {
            status,
            url: url.to_string(),
        },
        other => ReportError::Network(other.to_string()),
    }
}

pub struct HttpReportSource {
    agent: Agent,
    base_url: String,
}

impl HttpReportSource {
    pub fn new(settings: &Settings) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(settings.timeout_secs)))
            .build()
            .into();
        Self {
            agent,
            base_url: settings.base_url.clone(),
        }
    }
}

impl ReportSource for HttpReportSource {
    fn fetch(&self, request: &ReportRequest) -> Result<RawReportData> {
        let url = report_url(&self.base_url, request.report_type);
        debug!(report = %request.report_type, %url, "fetching report data");

        let mut builder = self.agent.get(&url);
        for (key, value) in request.query_pairs() {
            builder = builder.query(key, value);
        }
        let body = builder
            .call()
            .map_err(|e| map_err(&url, e))?
            .body_mut()
            .read_to_string()
            .map_err(|e| map_err(&url, e))?;

        RawReportData::from_json(request.report_type, &body).inspect_err(|e| {
            warn!(report = %request.report_type, error = %e, "malformed report response");
        })
    }

    fn export_file(&self, request: &ExportRequest) -> Result<Vec<u8>> {
        let url = export_url(&self.base_url);
        let payload = serde_json::to_string(request)?;
        debug!(
            report = %request.report_type,
            format = request.format.as_str(),
            "requesting backend export"
        );

        let bytes = self
            .agent
            .post(&url)
            .header("Content-Type", "application/json")
            .send(payload.as_str())
            .map_err(|e| map_err(&url, e))?
            .body_mut()
            .read_to_vec()
            .map_err(|e| map_err(&url, e))?;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::range;

    #[test]
    fn test_report_url_per_type() {
        assert_eq!(
            report_url("https://erp.example/api/", ReportType::TrialBalance),
            "https://erp.example/api/accounting/reports/trial-balance"
        );
        assert_eq!(
            report_url("https://erp.example/api", ReportType::AgingAnalysis),
            "https://erp.example/api/accounting/reports/aging-analysis"
        );
    }

    #[test]
    fn test_export_request_body() {
        let req = ReportRequest::new(ReportType::BalanceSheet, range());
        let body =
            serde_json::to_value(ExportRequest::from_report(&req, ExportFormat::Excel)).unwrap();
        assert_eq!(body["format"], "excel");
        assert_eq!(body["reportType"], "balance-sheet");
        assert_eq!(body["startDate"], "2025-01-01");
        assert_eq!(body["endDate"], "2025-03-31");
        assert_eq!(body["accountFilter"], "all");
        assert_eq!(body["asOfDate"], "2025-03-31");
    }

    #[test]
    fn test_export_request_omits_as_of_for_period_reports() {
        let req = ReportRequest::new(ReportType::ProfitLoss, range());
        let body =
            serde_json::to_value(ExportRequest::from_report(&req, ExportFormat::Csv)).unwrap();
        assert!(body.get("asOfDate").is_none());
    }

    #[test]
    fn test_unreachable_backend_is_a_network_error() {
        let settings = Settings {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 1,
            ..Settings::default()
        };
        let source = HttpReportSource::new(&settings);
        let req = ReportRequest::new(ReportType::TrialBalance, range());
        let err = source.fetch(&req).unwrap_err();
        assert!(matches!(err, ReportError::Network(_)), "{err}");
    }
}
