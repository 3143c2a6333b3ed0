use colored::Colorize;
use comfy_table::{Attribute, Cell, CellAlignment, Table};

use crate::reports::ReportResult;

pub const PLACEHOLDER: &str = "No data loaded. Generate a report to view results.";

/// Column 0 is an identifier, column 1 a label, everything after is numeric.
fn cell_style(col: usize) -> &'static str {
    match col {
        0 => "text-align:left;font-family:monospace",
        1 => "text-align:left",
        _ => "text-align:right;font-weight:bold",
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn push_row(html: &mut String, tag: &str, class: Option<&str>, cells: &[String]) {
    match class {
        Some(c) => html.push_str(&format!("    <tr class=\"{c}\">")),
        None => html.push_str("    <tr>"),
    }
    for (i, value) in cells.iter().enumerate() {
        html.push_str(&format!(
            "<{tag} style=\"{}\">{}</{tag}>",
            cell_style(i),
            escape(value)
        ));
    }
    html.push_str("</tr>\n");
}

/// Render a report as an HTML table. Pure: the same result always renders to
/// the same markup.
pub fn render_html(report: &ReportResult) -> String {
    let mut html = String::new();
    html.push_str(&format!(
        "<table class=\"report-table\" data-report=\"{}\">\n",
        report.report_type
    ));
    html.push_str(&format!("  <caption>{}</caption>\n", escape(&report.title)));

    html.push_str("  <thead>\n");
    push_row(&mut html, "th", None, &report.headers);
    html.push_str("  </thead>\n");

    html.push_str("  <tbody>\n");
    if report.rows.is_empty() {
        html.push_str(&format!(
            "    <tr class=\"placeholder\">\
             <td colspan=\"{}\" style=\"text-align:center\">{}</td></tr>\n",
            report.headers.len().max(1),
            PLACEHOLDER
        ));
    } else {
        for row in &report.rows {
            push_row(&mut html, "td", None, row);
        }
    }
    html.push_str("  </tbody>\n");

    if let Some(totals) = &report.totals {
        html.push_str("  <tfoot>\n");
        push_row(&mut html, "td", Some("totals-row"), totals);
        html.push_str("  </tfoot>\n");
    }

    html.push_str("</table>\n");
    html
}

/// Standalone page wrapping [`render_html`], for `--html` output.
pub fn render_page(report: &ReportResult, company: &str) -> String {
    let brand = if company.is_empty() {
        String::new()
    } else {
        format!("  <h2>{}</h2>\n", escape(company))
    };
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n\
         <style>\n\
         .report-table {{ border-collapse: collapse; width: 100%; font-family: sans-serif; }}\n\
         .report-table th {{ background: #2962b5; color: #fff; padding: 6px; }}\n\
         .report-table td {{ border-bottom: 1px solid #ddd; padding: 4px 6px; }}\n\
         .report-table .totals-row td {{ background: #e8eef8; border-top: 2px solid #2962b5; }}\n\
         .report-table .placeholder td {{ color: #888; font-style: italic; }}\n\
         </style>\n</head>\n<body>\n{brand}  <p>{range}</p>\n{table}</body>\n</html>\n",
        title = escape(&report.title),
        range = escape(&report.range.label()),
        table = render_html(report),
    )
}

/// Terminal rendering with the same column rules as the HTML table.
pub fn render_text(report: &ReportResult) -> String {
    let mut table = Table::new();
    table.set_header(report.headers.clone());

    if report.rows.is_empty() {
        table.add_row(vec![Cell::new(PLACEHOLDER)]);
    } else {
        for row in &report.rows {
            table.add_row(row.iter().map(Cell::new));
        }
    }
    if let Some(totals) = &report.totals {
        table.add_row(totals.iter().map(|v| Cell::new(v).add_attribute(Attribute::Bold)));
    }

    for i in 2..report.headers.len() {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }

    format!("{}\n{}\n{table}", report.title.bold(), report.range.label())
}
