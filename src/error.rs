use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Server returned HTTP {status} for {url}")]
    Http { status: u16, url: String },

    #[error("Report type not implemented: {0}")]
    UnsupportedReportType(String),

    #[error("No report data: generate a report first")]
    NoReportData,

    #[error("Export failed: {0}")]
    Export(String),

    #[error("Invalid date range: {start} is after {end}")]
    InvalidDateRange { start: String, end: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Settings error: {0}")]
    Settings(String),
}

pub type Result<T> = std::result::Result<T, ReportError>;
