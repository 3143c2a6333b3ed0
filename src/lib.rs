//! Financial report generation and export for the ERP accounting module.
//!
//! Raw report data is fetched from the accounting backend ([`fetch`]),
//! normalized into a tabular [`reports::ReportResult`], previewed as HTML or
//! terminal text ([`preview`]) and exported to PDF, delimited text or JSON
//! ([`export`]). [`controller::ReportController`] holds the page state.

pub mod cli;
pub mod controller;
pub mod error;
pub mod export;
pub mod fetch;
pub mod fmt;
pub mod models;
#[cfg(feature = "pdf")]
pub mod pdf;
pub mod preview;
pub mod raw;
pub mod reports;
pub mod settings;

#[cfg(test)]
mod testutil;
