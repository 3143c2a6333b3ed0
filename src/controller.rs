//! Report page state: the selected report and its controls, the result on
//! display, and the generate/export transitions between them.
//!
//! Phases run idle → fetching → displayed, or → error on a failed fetch. A
//! failed fetch never clears the result already on display. Every generate
//! call is tagged with a request id and only the latest id may replace the
//! displayed result, so a slow early response cannot overwrite a newer one.

use std::path::PathBuf;

use tracing::{debug, error, info};

use crate::error::Result;
use crate::export::{self, ExportOptions};
use crate::fetch::ReportSource;
use crate::fmt::Currency;
use crate::models::{
    AccountFilter, DateRange, ExportFormat, LocalFormat, ReportRequest, ReportType,
};
use crate::raw::RawReportData;
use crate::reports::{self, ReportResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Fetching { request_id: u64 },
    Displayed,
    Error(String),
}

/// Handed out by [`ReportController::begin_generate`] and returned with the
/// response in [`ReportController::complete`].
#[derive(Debug, Clone)]
pub struct Ticket {
    pub id: u64,
    pub request: ReportRequest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The response replaced the displayed result.
    Applied,
    /// A newer request was issued (or the report type changed); the response was dropped.
    Stale,
}

#[derive(Debug)]
pub struct ReportController {
    request: ReportRequest,
    currency: Currency,
    result: Option<ReportResult>,
    /// Controls the displayed result was generated with.
    shown: Option<ReportRequest>,
    phase: Phase,
    next_id: u64,
    latest_id: Option<u64>,
}

impl ReportController {
    pub fn new(report_type: ReportType, range: DateRange, currency: Currency) -> Self {
        Self {
            request: ReportRequest::new(report_type, range),
            currency,
            result: None,
            shown: None,
            phase: Phase::Idle,
            next_id: 1,
            latest_id: None,
        }
    }

    // -----------------------------------------------------------------------
    // Controls
    // -----------------------------------------------------------------------

    /// Switching report type discards the displayed result and any request
    /// still in flight.
    pub fn set_report_type(&mut self, report_type: ReportType) {
        if report_type == self.request.report_type {
            return;
        }
        self.request.report_type = report_type;
        self.result = None;
        self.shown = None;
        self.latest_id = None;
        self.phase = Phase::Idle;
    }

    pub fn set_date_range(&mut self, range: DateRange) {
        self.request.range = range;
    }

    pub fn set_account_filter(&mut self, filter: AccountFilter) {
        self.request.account_filter = filter;
    }

    pub fn set_include_zero_balance(&mut self, on: bool) {
        self.request.include_zero_balance = on;
    }

    pub fn set_show_transaction_details(&mut self, on: bool) {
        self.request.show_transaction_details = on;
    }

    pub fn set_group_by_account_type(&mut self, on: bool) {
        self.request.group_by_account_type = on;
    }

    pub fn request(&self) -> &ReportRequest {
        &self.request
    }

    pub fn result(&self) -> Option<&ReportResult> {
        self.result.as_ref()
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    // -----------------------------------------------------------------------
    // Generate
    // -----------------------------------------------------------------------

    /// Snapshot the controls for a new fetch.
    pub fn begin_generate(&mut self) -> Ticket {
        let id = self.next_id;
        self.next_id += 1;
        self.latest_id = Some(id);
        self.phase = Phase::Fetching { request_id: id };
        debug!(request_id = id, report = %self.request.report_type, "generate started");
        Ticket {
            id,
            request: self.request.clone(),
        }
    }

    /// Apply a fetch outcome. Stale tickets are dropped without touching
    /// state. Errors move to [`Phase::Error`] but keep the previous result.
    pub fn complete(
        &mut self,
        ticket: Ticket,
        outcome: Result<RawReportData>,
    ) -> Result<Completion> {
        if self.latest_id != Some(ticket.id) {
            debug!(request_id = ticket.id, latest = ?self.latest_id, "discarding stale response");
            return Ok(Completion::Stale);
        }
        self.latest_id = None;

        let formatted =
            outcome.and_then(|raw| reports::format(&ticket.request, &raw, self.currency));
        match formatted {
            Ok(result) => {
                info!(
                    request_id = ticket.id,
                    report = %result.report_type,
                    rows = result.rows.len(),
                    "report generated"
                );
                self.result = Some(result);
                self.shown = Some(ticket.request);
                self.phase = Phase::Displayed;
                Ok(Completion::Applied)
            }
            Err(e) => {
                error!(request_id = ticket.id, error = %e, "report generation failed");
                self.phase = Phase::Error(e.to_string());
                Err(e)
            }
        }
    }

    /// Fetch, format and display in one step.
    pub fn generate(&mut self, source: &dyn ReportSource) -> Result<&ReportResult> {
        let ticket = self.begin_generate();
        let outcome = source.fetch(&ticket.request);
        self.complete(ticket, outcome)?;
        self.result
            .as_ref()
            .ok_or(crate::error::ReportError::NoReportData)
    }

    // -----------------------------------------------------------------------
    // Export
    // -----------------------------------------------------------------------

    pub fn export(&self, format: LocalFormat, opts: &ExportOptions) -> Result<PathBuf> {
        info!(format = format.as_str(), "export started");
        let outcome = export::export(self.result.as_ref(), format, opts);
        log_export(format.into(), &outcome);
        outcome
    }

    pub fn export_pdf(&self, opts: &ExportOptions) -> Result<PathBuf> {
        self.export(LocalFormat::Pdf, opts)
    }

    /// Backend-built `.xlsx` of the displayed report, using the controls it
    /// was generated with.
    pub fn export_excel(
        &self,
        source: &dyn ReportSource,
        opts: &ExportOptions,
    ) -> Result<PathBuf> {
        info!(format = ExportFormat::Excel.as_str(), "export started");
        let request = self.shown.as_ref().unwrap_or(&self.request);
        let outcome = export::export_excel(self.result.as_ref(), source, request, opts);
        log_export(ExportFormat::Excel, &outcome);
        outcome
    }

    /// Backend-assembled file for the current controls. Does not need a
    /// generated result.
    pub fn export_remote(
        &self,
        source: &dyn ReportSource,
        format: ExportFormat,
        opts: &ExportOptions,
    ) -> Result<PathBuf> {
        let outcome = export::export_remote(source, &self.request, format, opts);
        log_export(format, &outcome);
        outcome
    }

    /// Every report type for the current date range and filters, one PDF.
    pub fn export_all(&self, source: &dyn ReportSource, opts: &ExportOptions) -> Result<PathBuf> {
        let outcome = export::export_all(source, &self.request, self.currency, opts);
        log_export(ExportFormat::Pdf, &outcome);
        outcome
    }
}

fn log_export(format: ExportFormat, outcome: &Result<PathBuf>) {
    match outcome {
        Ok(path) => info!(format = format.as_str(), path = %path.display(), "export finished"),
        Err(e) => error!(format = format.as_str(), error = %e, "export failed"),
    }
}
