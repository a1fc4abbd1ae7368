//! printpdf rendering of the assembled report.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;

use printpdf::{
    BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point,
};
use slate_core::{AggregationOptions, CoreError, DatasetStore};
use thiserror::Error;
use tracing::info;

use crate::content::ReportContent;
use crate::format;

const REPORT_FILE: &str = "final_budget_report.pdf";
const PAGE_WIDTH: f32 = 215.9; // US letter, in mm
const PAGE_HEIGHT: f32 = 279.4;
const MARGIN: f32 = 20.0;
const LINE_HEIGHT: f32 = 7.0;
const BODY_SIZE: f32 = 10.0;
const HEADING_SIZE: f32 = 13.0;
const TITLE_SIZE: f32 = 18.0;

// Column x-offsets (mm from the left edge) for the four-column tables.
const COLS4: [f32; 4] = [MARGIN, 70.0, 120.0, 170.0];
const COLS3: [f32; 3] = [MARGIN, 70.0, 150.0];
const COLS2: [f32; 2] = [MARGIN, 110.0];

#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("report I/O: {0}")]
    Io(#[from] std::io::Error),
    #[error("pdf rendering: {0}")]
    Pdf(String),
}

/// Renders the final budget report into a data directory and returns the
/// generated file's path.
#[derive(Debug, Clone)]
pub struct ReportGenerator {
    out_dir: PathBuf,
}

impl ReportGenerator {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self { out_dir: out_dir.into() }
    }

    /// Builds the content from the store and renders the PDF.
    pub fn generate(
        &self,
        store: &dyn DatasetStore,
        options: AggregationOptions,
    ) -> Result<PathBuf, ReportError> {
        let content = ReportContent::build(store, options)?;
        self.render(&content)
    }

    /// Renders already-assembled content.
    pub fn render(&self, content: &ReportContent) -> Result<PathBuf, ReportError> {
        fs::create_dir_all(&self.out_dir)?;
        let path = self.out_dir.join(REPORT_FILE);

        let (doc, page, layer) =
            PdfDocument::new("Final Budget Report", Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "report");
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|err| ReportError::Pdf(err.to_string()))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|err| ReportError::Pdf(err.to_string()))?;

        let mut writer = PageWriter {
            doc: &doc,
            layer: doc.get_page(page).get_layer(layer),
            regular: &regular,
            bold: &bold,
            y: PAGE_HEIGHT - MARGIN,
        };

        writer.title("Final Budget Report");
        writer.summary_table(content);

        if !content.weekly.is_empty() {
            writer.heading("Weekly Budget Summary");
            writer.period_table(&content.weekly);
        }
        if !content.monthly.is_empty() {
            writer.heading("Monthly Budget Summary");
            writer.period_table(&content.monthly);
        }
        if !content.daily.is_empty() {
            writer.heading("Daily Budget Breakdown");
            writer.header_row(&[
                (COLS4[0], "Date"),
                (COLS4[1], "Estimated"),
                (COLS4[2], "Incurred"),
                (COLS4[3], "Variation"),
            ]);
            for row in &content.daily {
                writer.row(&[
                    (COLS4[0], row.date.clone()),
                    (COLS4[1], format::money(row.estimated)),
                    (COLS4[2], format::money(row.incurred)),
                    (COLS4[3], format::variation(row.variation)),
                ]);
            }
        }
        if !content.purchased.is_empty() {
            writer.heading("Purchased Items");
            writer.header_row(&[
                (COLS3[0], "Date"),
                (COLS3[1], "Item"),
                (COLS3[2], "Cost"),
            ]);
            for item in &content.purchased {
                writer.row(&[
                    (COLS3[0], item.date.clone()),
                    (COLS3[1], item.item.clone()),
                    (COLS3[2], format::money(item.cost)),
                ]);
            }
        }

        drop(writer);
        doc.save(&mut BufWriter::new(File::create(&path)?))
            .map_err(|err| ReportError::Pdf(err.to_string()))?;
        info!(path = %path.display(), "rendered final budget report");
        Ok(path)
    }
}

/// Cursor-style text layout over a growing set of letter pages.
struct PageWriter<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    regular: &'a IndirectFontRef,
    bold: &'a IndirectFontRef,
    y: f32,
}

impl PageWriter<'_> {
    fn advance(&mut self, amount: f32) {
        self.y -= amount;
        if self.y < MARGIN {
            let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "report");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT - MARGIN;
        }
    }

    fn title(&mut self, text: &str) {
        self.layer
            .use_text(text, TITLE_SIZE, Mm(MARGIN), Mm(self.y), self.bold);
        self.advance(LINE_HEIGHT * 2.0);
    }

    fn heading(&mut self, text: &str) {
        self.advance(LINE_HEIGHT * 0.5);
        self.layer
            .use_text(text, HEADING_SIZE, Mm(MARGIN), Mm(self.y), self.bold);
        self.advance(LINE_HEIGHT);
    }

    fn header_row(&mut self, cols: &[(f32, &str)]) {
        for (x, text) in cols {
            self.layer
                .use_text(*text, BODY_SIZE, Mm(*x), Mm(self.y), self.bold);
        }
        self.rule();
        self.advance(LINE_HEIGHT);
    }

    fn row(&mut self, cols: &[(f32, String)]) {
        for (x, text) in cols {
            self.layer
                .use_text(text.as_str(), BODY_SIZE, Mm(*x), Mm(self.y), self.regular);
        }
        self.advance(LINE_HEIGHT);
    }

    fn rule(&mut self) {
        let y = self.y - 2.0;
        let line = Line {
            points: vec![
                (Point::new(Mm(MARGIN), Mm(y)), false),
                (Point::new(Mm(PAGE_WIDTH - MARGIN), Mm(y)), false),
            ],
            is_closed: false,
        };
        self.layer.add_line(line);
    }

    fn summary_table(&mut self, content: &ReportContent) {
        let rows = [
            ("Total Estimated Budget", format::money(content.totals.estimated)),
            ("Total Incurred Budget", format::money(content.totals.incurred)),
            ("Overall Variation", format::variation(content.totals.variation)),
            (
                "Report Generated",
                content.generated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            ),
        ];
        for (label, value) in rows {
            self.layer
                .use_text(label, BODY_SIZE, Mm(COLS2[0]), Mm(self.y), self.bold);
            self.layer
                .use_text(value.as_str(), BODY_SIZE, Mm(COLS2[1]), Mm(self.y), self.regular);
            self.advance(LINE_HEIGHT);
        }
    }

    fn period_table(&mut self, rows: &[(String, slate_domain::PeriodSummary)]) {
        self.header_row(&[
            (COLS4[0], "Period"),
            (COLS4[1], "Estimated"),
            (COLS4[2], "Incurred"),
            (COLS4[3], "Variation"),
        ]);
        for (label, summary) in rows {
            self.row(&[
                (COLS4[0], format::period_label(label)),
                (COLS4[1], format::money(summary.estimated)),
                (COLS4[2], format::money(summary.incurred)),
                (COLS4[3], format::variation(summary.variation)),
            ]);
        }
    }
}
