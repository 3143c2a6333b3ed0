use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{ReportError, Result};
use crate::fetch::{ExportRequest, ReportSource};
use crate::fmt::Currency;
use crate::models::{DateRange, ExportFormat, LocalFormat, ReportRequest, ReportType};
use crate::reports::{self, ReportResult};

/// Where exports land and what brand the PDF carries.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub output_dir: PathBuf,
    pub company: String,
}

/// `<reportKind>_<startDate>_to_<endDate>.<ext>`
pub fn export_filename(kind: &str, range: &DateRange, ext: &str) -> String {
    format!("{kind}_{}_to_{}.{ext}", range.start(), range.end())
}

fn write_file(bytes: &[u8], path: &Path) -> Result<PathBuf> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, bytes)?;
    info!(path = %path.display(), bytes = bytes.len(), "export written");
    Ok(path.to_path_buf())
}

fn require(report: Option<&ReportResult>) -> Result<&ReportResult> {
    report.ok_or(ReportError::NoReportData)
}

// ---------------------------------------------------------------------------
// Serializers
// ---------------------------------------------------------------------------

/// Headers, rows, then totals as the last record. Cells are the on-screen
/// strings; the writer quotes any field holding the delimiter, a quote or a
/// newline.
pub fn to_delimited(report: &ReportResult, delimiter: u8) -> Result<String> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());
    wtr.write_record(&report.headers)?;
    for row in &report.rows {
        wtr.write_record(row)?;
    }
    if let Some(totals) = &report.totals {
        wtr.write_record(totals)?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| ReportError::Export(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ReportError::Export(e.to_string()))
}

pub fn to_json(report: &ReportResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

#[cfg(feature = "pdf")]
fn render_pdf(reports: &[ReportResult], company: &str) -> Result<Vec<u8>> {
    match reports {
        [single] => crate::pdf::render_report(single, company),
        many => crate::pdf::render_reports(many, company),
    }
}

#[cfg(not(feature = "pdf"))]
fn render_pdf(_reports: &[ReportResult], _company: &str) -> Result<Vec<u8>> {
    Err(ReportError::Export(
        "PDF export requires the 'pdf' feature; build with `cargo build --features pdf`".into(),
    ))
}

// ---------------------------------------------------------------------------
// Export actions
// ---------------------------------------------------------------------------

pub fn export_pdf(report: Option<&ReportResult>, opts: &ExportOptions) -> Result<PathBuf> {
    let report = require(report)?;
    let bytes = render_pdf(std::slice::from_ref(report), &opts.company)?;
    let name = export_filename(&report.report_type.kind(), &report.range, "pdf");
    write_file(&bytes, &opts.output_dir.join(name))
}

pub fn export_csv(report: Option<&ReportResult>, opts: &ExportOptions) -> Result<PathBuf> {
    let report = require(report)?;
    let content = to_delimited(report, b',')?;
    let name = export_filename(&report.report_type.kind(), &report.range, "csv");
    write_file(content.as_bytes(), &opts.output_dir.join(name))
}

pub fn export_json(report: Option<&ReportResult>, opts: &ExportOptions) -> Result<PathBuf> {
    let report = require(report)?;
    let content = to_json(report)?;
    let name = export_filename(&report.report_type.kind(), &report.range, "json");
    write_file(content.as_bytes(), &opts.output_dir.join(name))
}

/// Dispatch a local export by format.
pub fn export(
    report: Option<&ReportResult>,
    format: LocalFormat,
    opts: &ExportOptions,
) -> Result<PathBuf> {
    match format {
        LocalFormat::Pdf => export_pdf(report, opts),
        LocalFormat::Csv => export_csv(report, opts),
        LocalFormat::Json => export_json(report, opts),
    }
}

/// `.xlsx` workbook of the displayed report, assembled by the backend for
/// `request`. Refused like the local formats when nothing is displayed.
pub fn export_excel(
    report: Option<&ReportResult>,
    source: &dyn ReportSource,
    request: &ReportRequest,
    opts: &ExportOptions,
) -> Result<PathBuf> {
    require(report)?;
    export_remote(source, request, ExportFormat::Excel, opts)
}

/// Have the backend assemble the file and save it under the usual name.
pub fn export_remote(
    source: &dyn ReportSource,
    request: &ReportRequest,
    format: ExportFormat,
    opts: &ExportOptions,
) -> Result<PathBuf> {
    let body = ExportRequest::from_report(request, format);
    let bytes = source.export_file(&body)?;
    if bytes.is_empty() {
        return Err(ReportError::Export("backend returned an empty file".into()));
    }
    let name = export_filename(&request.report_type.kind(), &request.range, format.extension());
    write_file(&bytes, &opts.output_dir.join(name))
}

/// Fetch and format every report type for `template`'s range and filters and
/// write them into one multi-page PDF. Reports that fail to fetch are skipped.
pub fn export_all(
    source: &dyn ReportSource,
    template: &ReportRequest,
    currency: Currency,
    opts: &ExportOptions,
) -> Result<PathBuf> {
    let mut results = Vec::new();
    for report_type in ReportType::ALL {
        let request = ReportRequest {
            report_type,
            ..template.clone()
        };
        let outcome = source
            .fetch(&request)
            .and_then(|raw| reports::format(&request, &raw, currency));
        match outcome {
            Ok(result) => results.push(result),
            Err(e) => warn!(report = %report_type, error = %e, "skipping report in export-all"),
        }
    }
    if results.is_empty() {
        return Err(ReportError::Export("no report could be generated".into()));
    }
    let bytes = render_pdf(&results, &opts.company)?;
    let name = export_filename("all_reports", &template.range, "pdf");
    write_file(&bytes, &opts.output_dir.join(name))
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::raw::RawReportData;
    use crate::testutil::{range, sample_raw, sample_result};

    /// Returns a fake workbook and counts backend export calls.
    #[derive(Default)]
    struct WorkbookSource {
        exports: Cell<usize>,
    }

    impl ReportSource for WorkbookSource {
        fn fetch(&self, request: &ReportRequest) -> Result<RawReportData> {
            Ok(sample_raw(request.report_type))
        }

        fn export_file(&self, request: &ExportRequest) -> Result<Vec<u8>> {
            self.exports.set(self.exports.get() + 1);
            assert_eq!(request.format, ExportFormat::Excel);
            Ok(b"PK\x03\x04".to_vec())
        }
    }

    fn opts(dir: &Path) -> ExportOptions {
        ExportOptions {
            output_dir: dir.to_path_buf(),
            company: "Delta Pharmacies".into(),
        }
    }

    fn parse(text: &str) -> (Vec<String>, Vec<Vec<String>>) {
        let mut rdr = csv::ReaderBuilder::new().from_reader(text.as_bytes());
        let headers = rdr.headers().unwrap().iter().map(String::from).collect();
        let rows = rdr
            .records()
            .map(|r| r.unwrap().iter().map(String::from).collect())
            .collect();
        (headers, rows)
    }

    #[test]
    fn test_filename_convention() {
        assert_eq!(
            export_filename("trial_balance", &range(), ExportFormat::Excel.extension()),
            "trial_balance_2025-01-01_to_2025-03-31.xlsx"
        );
    }

    #[test]
    fn test_csv_roundtrip_matches_screen() {
        for t in ReportType::ALL {
            let report = sample_result(t);
            let text = to_delimited(&report, b',').unwrap();
            let (headers, rows) = parse(&text);
            assert_eq!(headers, report.headers, "{t}");
            let mut expected = report.rows.clone();
            expected.extend(report.totals.clone());
            assert_eq!(rows, expected, "{t}");
        }
    }

    #[test]
    fn test_fields_with_delimiter_or_quotes_are_quoted() {
        let report = sample_result(ReportType::TrialBalance);
        let text = to_delimited(&report, b',').unwrap();
        assert!(text.contains("\"Inventory, Pharmaceuticals\""));
        assert!(text.contains("\"EGP 50,000.00\""));

        let journal = to_delimited(&sample_result(ReportType::JournalEntries), b',').unwrap();
        assert!(journal.contains("\"Supplier invoice \"\"Nile Pharma\"\"\""));
    }

    #[test]
    fn test_export_without_report_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        for format in [LocalFormat::Pdf, LocalFormat::Csv, LocalFormat::Json] {
            let err = export(None, format, &opts(dir.path())).unwrap_err();
            assert!(matches!(err, ReportError::NoReportData));
            assert!(err.to_string().contains("generate a report first"));
        }

        let source = WorkbookSource::default();
        let request = ReportRequest::new(ReportType::TrialBalance, range());
        let err = export_excel(None, &source, &request, &opts(dir.path())).unwrap_err();
        assert!(matches!(err, ReportError::NoReportData));
        assert_eq!(source.exports.get(), 0);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_export_csv_writes_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let report = sample_result(ReportType::AgingAnalysis);
        let path = export_csv(Some(&report), &opts(dir.path())).unwrap();
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "aging_analysis_2025-01-01_to_2025-03-31.csv"
        );
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.ends_with("Total Outstanding,3,\"EGP 9,000.00\"\n"));
    }

    #[test]
    fn test_excel_is_an_xlsx_workbook_from_the_backend() {
        let dir = tempfile::tempdir().unwrap();
        let report = sample_result(ReportType::ProfitLoss);
        let request = ReportRequest::new(ReportType::ProfitLoss, range());
        let source = WorkbookSource::default();
        let path = export_excel(Some(&report), &source, &request, &opts(dir.path())).unwrap();
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "profit_loss_2025-01-01_to_2025-03-31.xlsx"
        );
        assert!(std::fs::read(&path).unwrap().starts_with(b"PK"));
        assert_eq!(source.exports.get(), 1);
    }

    #[test]
    fn test_export_json_contains_summary() {
        let dir = tempfile::tempdir().unwrap();
        let report = sample_result(ReportType::ProfitLoss);
        let path = export_json(Some(&report), &opts(dir.path())).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(value["summary"]["profitMargin"], "43.33%");
        assert_eq!(value["reportType"], "profit-loss");
    }

    #[cfg(feature = "pdf")]
    #[test]
    fn test_export_pdf_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let report = sample_result(ReportType::BalanceSheet);
        let path = export_pdf(Some(&report), &opts(dir.path())).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(path.ends_with("balance_sheet_2025-01-01_to_2025-03-31.pdf"));
    }
}
