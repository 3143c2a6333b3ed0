use std::io::BufWriter;

use printpdf::path::PaintMode;
use printpdf::*;

use crate::error::{ReportError, Result};
use crate::reports::ReportResult;

// A4 dimensions (mm)
const PAGE_W: f32 = 210.0;
const PAGE_H: f32 = 297.0;
const MARGIN_TOP: f32 = 20.0;
const MARGIN_BOTTOM: f32 = 22.0;
const MARGIN_LEFT: f32 = 16.0;
const MARGIN_RIGHT: f32 = 16.0;
const ROW_H: f32 = 6.0;
const FONT_SIZE: f32 = 9.0;
const TITLE_SIZE: f32 = 16.0;
const SUBTITLE_SIZE: f32 = 10.0;
const FOOTER_SIZE: f32 = 8.0;
const CELL_PAD: f32 = 1.5;

// Header band and totals highlight
const ACCENT: (f32, f32, f32) = (0.161, 0.384, 0.710);
const TOTALS_FILL: (f32, f32, f32) = (0.910, 0.933, 0.973);

const BRAND: &str = "ledgerview";

fn approx_text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * 0.18
}

fn rgb((r, g, b): (f32, f32, f32)) -> Color {
    Color::Rgb(Rgb::new(r, g, b, None))
}

fn pdf_err(e: impl std::fmt::Debug) -> ReportError {
    ReportError::Export(format!("pdf: {e:?}"))
}

#[derive(Clone, Copy, PartialEq, Debug)]
enum Align {
    Left,
    Right,
}

struct Col {
    width: f32,
    align: Align,
    mono: bool,
}

/// Size columns by their widest cell, scaled to the printable width.
fn layout_columns(report: &ReportResult) -> Vec<Col> {
    let n = report.headers.len();
    let mut weights = vec![6usize; n];
    let all_rows = std::iter::once(&report.headers)
        .chain(report.rows.iter())
        .chain(report.totals.iter());
    for row in all_rows {
        for (i, cell) in row.iter().enumerate().take(n) {
            weights[i] = weights[i].max(cell.chars().count());
        }
    }
    let total: usize = weights.iter().sum::<usize>().max(1);
    let avail = PAGE_W - MARGIN_LEFT - MARGIN_RIGHT;
    weights
        .iter()
        .enumerate()
        .map(|(i, w)| Col {
            width: avail * (*w as f32) / (total as f32),
            align: if i > 1 { Align::Right } else { Align::Left },
            mono: i == 0,
        })
        .collect()
}

/// Clip a cell to what fits in its column.
fn fit_text(text: &str, width: f32, size: f32) -> String {
    let max_chars = ((width - CELL_PAD * 2.0) / (size * 0.18)).floor().max(1.0) as usize;
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(3);
    let mut clipped: String = text.chars().take(keep).collect();
    clipped.push_str("...");
    clipped
}

enum RowStyle {
    Body,
    Header,
    Totals,
}

struct PdfWriter {
    doc: PdfDocumentReference,
    font: IndirectFontRef,
    font_bold: IndirectFontRef,
    font_mono: IndirectFontRef,
    current_page: PdfPageIndex,
    current_layer: PdfLayerIndex,
    pages: Vec<(PdfPageIndex, PdfLayerIndex)>,
    y: f32,
    brand: String,
}

impl PdfWriter {
    fn new(title: &str, company: &str) -> Result<Self> {
        let (doc, page, layer) = PdfDocument::new(title, Mm(PAGE_W), Mm(PAGE_H), "Layer 1");
        let font = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_err)?;
        let font_bold = doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(pdf_err)?;
        let font_mono = doc.add_builtin_font(BuiltinFont::Courier).map_err(pdf_err)?;
        let brand = if company.is_empty() {
            BRAND.to_string()
        } else {
            company.to_string()
        };
        Ok(Self {
            doc,
            font,
            font_bold,
            font_mono,
            current_page: page,
            current_layer: layer,
            pages: vec![(page, layer)],
            y: MARGIN_TOP,
            brand,
        })
    }

    fn pdf_y(&self) -> f32 {
        PAGE_H - self.y
    }

    fn layer(&self) -> PdfLayerReference {
        self.doc
            .get_page(self.current_page)
            .get_layer(self.current_layer)
    }

    fn new_page(&mut self) {
        let (page, layer) = self.doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Layer");
        self.current_page = page;
        self.current_layer = layer;
        self.pages.push((page, layer));
        self.y = MARGIN_TOP;
    }

    fn needs_page(&self, needed: f32) -> bool {
        self.y + needed > PAGE_H - MARGIN_BOTTOM
    }

    fn text(&self, s: &str, x: f32, size: f32, font: &IndirectFontRef) {
        self.layer().use_text(s, size, Mm(x), Mm(self.pdf_y()), font);
    }

    fn hline(&self, x1: f32, x2: f32) {
        let layer = self.layer();
        layer.set_outline_thickness(0.5);
        let line = Line {
            points: vec![
                (Point::new(Mm(x1), Mm(self.pdf_y())), false),
                (Point::new(Mm(x2), Mm(self.pdf_y())), false),
            ],
            is_closed: false,
        };
        layer.add_line(line);
    }

    /// Fill the band the current row's text sits in.
    fn band(&self, color: (f32, f32, f32)) {
        let layer = self.layer();
        let bottom = self.pdf_y() - CELL_PAD;
        layer.set_fill_color(rgb(color));
        let rect = Rect::new(
            Mm(MARGIN_LEFT),
            Mm(bottom),
            Mm(PAGE_W - MARGIN_RIGHT),
            Mm(bottom + ROW_H),
        )
        .with_mode(PaintMode::Fill);
        layer.add_rect(rect);
        layer.set_fill_color(rgb((0.0, 0.0, 0.0)));
    }

    fn header(&mut self, title: &str, date_range: &str) {
        let bold = self.font_bold.clone();
        let regular = self.font.clone();
        self.layer().set_fill_color(rgb(ACCENT));
        self.text(&self.brand, MARGIN_LEFT, SUBTITLE_SIZE, &bold);
        self.layer().set_fill_color(rgb((0.0, 0.0, 0.0)));
        self.y += 8.0;
        self.text(title, MARGIN_LEFT, TITLE_SIZE, &bold);
        self.y += 6.0;
        self.text(date_range, MARGIN_LEFT, SUBTITLE_SIZE, &regular);
        self.y += 5.0;
        let ts = chrono::Local::now()
            .format("Generated %Y-%m-%d %H:%M")
            .to_string();
        self.text(&ts, MARGIN_LEFT, FOOTER_SIZE, &regular);
        self.y += 4.0;
        self.hline(MARGIN_LEFT, PAGE_W - MARGIN_RIGHT);
        self.y += 6.0;
    }

    fn row(&mut self, cols: &[Col], values: &[String], style: RowStyle) {
        match style {
            RowStyle::Header => self.band(ACCENT),
            RowStyle::Totals => self.band(TOTALS_FILL),
            RowStyle::Body => {}
        }
        let is_header = matches!(style, RowStyle::Header);
        let bold = !matches!(style, RowStyle::Body);
        if is_header {
            self.layer().set_fill_color(rgb((1.0, 1.0, 1.0)));
        }

        let mut x = MARGIN_LEFT;
        for (col, value) in cols.iter().zip(values) {
            let font = if col.mono && !is_header {
                self.font_mono.clone()
            } else if bold || col.align == Align::Right {
                self.font_bold.clone()
            } else {
                self.font.clone()
            };
            let s = fit_text(value, col.width, FONT_SIZE);
            match col.align {
                Align::Left => self.text(&s, x + CELL_PAD, FONT_SIZE, &font),
                Align::Right => {
                    let tw = approx_text_width(&s, FONT_SIZE);
                    self.text(&s, x + col.width - CELL_PAD - tw, FONT_SIZE, &font);
                }
            }
            x += col.width;
        }

        if is_header {
            self.layer().set_fill_color(rgb((0.0, 0.0, 0.0)));
        }
        self.y += ROW_H;
    }

    fn note(&mut self, s: &str) {
        let font = self.font.clone();
        self.text(s, MARGIN_LEFT, FONT_SIZE, &font);
        self.y += ROW_H;
    }

    /// Draw one report: header block, table with a repeated header row on
    /// every page it spans, highlighted totals row.
    fn report(&mut self, report: &ReportResult) {
        self.header(&report.title, &report.range.label());
        let cols = layout_columns(report);

        self.row(&cols, &report.headers, RowStyle::Header);
        if report.rows.is_empty() {
            self.note(crate::preview::PLACEHOLDER);
        }
        for values in &report.rows {
            if self.needs_page(ROW_H) {
                self.new_page();
                self.row(&cols, &report.headers, RowStyle::Header);
            }
            self.row(&cols, values, RowStyle::Body);
        }
        if let Some(totals) = &report.totals {
            if self.needs_page(ROW_H) {
                self.new_page();
                self.row(&cols, &report.headers, RowStyle::Header);
            }
            self.row(&cols, totals, RowStyle::Totals);
        }
    }

    /// Stamp brand and "Page N of M" on every page once the page count is known.
    fn footers(&self) {
        let total = self.pages.len();
        let y = MARGIN_BOTTOM / 2.0;
        for (i, (page, layer)) in self.pages.iter().enumerate() {
            let layer = self.doc.get_page(*page).get_layer(*layer);
            layer.use_text(self.brand.as_str(), FOOTER_SIZE, Mm(MARGIN_LEFT), Mm(y), &self.font);
            let label = format!("Page {} of {}", i + 1, total);
            let x = PAGE_W - MARGIN_RIGHT - approx_text_width(&label, FOOTER_SIZE);
            layer.use_text(label, FOOTER_SIZE, Mm(x), Mm(y), &self.font);
        }
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn to_bytes(self) -> Result<Vec<u8>> {
        self.footers();
        let mut buf = BufWriter::new(Vec::new());
        self.doc.save(&mut buf).map_err(pdf_err)?;
        buf.into_inner().map_err(|e| ReportError::Export(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Render functions
// ---------------------------------------------------------------------------

pub fn render_report(report: &ReportResult, company: &str) -> Result<Vec<u8>> {
    let mut pdf = PdfWriter::new(&report.title, company)?;
    pdf.report(report);
    pdf.to_bytes()
}

/// All reports in one document; each report starts on a fresh page.
pub fn render_reports(reports: &[ReportResult], company: &str) -> Result<Vec<u8>> {
    if reports.is_empty() {
        return Err(ReportError::NoReportData);
    }
    let mut pdf = PdfWriter::new("Financial Reports", company)?;
    for (i, report) in reports.iter().enumerate() {
        if i > 0 {
            pdf.new_page();
        }
        pdf.report(report);
    }
    tracing::debug!(reports = reports.len(), pages = pdf.page_count(), "assembled pdf");
    pdf.to_bytes()
}
