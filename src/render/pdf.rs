//! Landscape A4 grid of the working week: one row per half hour, one column per weekday.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use log::{debug, warn};
use printpdf::{
    BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
    Point,
};

use crate::timetable::grid::{self, SLOT_COUNT, SLOT_LABELS};
use crate::timetable::Timetable;

const PAGE_WIDTH: f32 = 297.0;
const PAGE_HEIGHT: f32 = 210.0;
const MARGIN: f32 = 10.0;
const TABLE_TOP: f32 = PAGE_HEIGHT - 22.0;
const TIME_COLUMN: f32 = 16.0;
const WEEKDAYS: u8 = 5;

const TITLE_SIZE: f32 = 15.0;
const CELL_SIZE: f32 = 6.0;
const LINE_HEIGHT: f32 = 2.6;
const PADDING: f32 = 0.8;
const PT_TO_MM: f32 = 0.3528;

pub fn render_pdf(timetable: &Timetable, font_path: Option<&Path>) -> Result<Vec<u8>> {
    let title = format!("Urnik {} - {}", timetable.window_start, timetable.window_end);
    let (doc, page, layer) =
        PdfDocument::new(&title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Timetable");

    let (font, header_font) = match font_path {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open font {}", path.display()))?;
            let font = doc
                .add_external_font(file)
                .map_err(|e| anyhow!("Failed to load font {}: {:?}", path.display(), e))?;
            (font.clone(), font)
        }
        None => {
            if let Some(text) = first_unencodable(timetable) {
                warn!(
                    "'{}' has letters the builtin PDF font cannot show; set TIMETABLE_PDF_FONT to a TrueType font",
                    text
                );
            }
            (builtin(&doc, BuiltinFont::Helvetica)?, builtin(&doc, BuiltinFont::HelveticaBold)?)
        }
    };

    let layer = doc.get_page(page).get_layer(layer);
    let title_width = text_width(&title, TITLE_SIZE);
    layer.use_text(
        title.as_str(),
        TITLE_SIZE,
        Mm((PAGE_WIDTH - title_width) / 2.0),
        Mm(PAGE_HEIGHT - MARGIN - TITLE_SIZE * PT_TO_MM),
        &font,
    );

    let mut table = Table {
        doc: &doc,
        layer,
        font,
        header_font,
        y: TABLE_TOP,
    };
    table.header_row();
    for slot in 1..SLOT_COUNT {
        table.row(SLOT_LABELS[slot], &cells(timetable, slot as i32));
    }
    table.close();

    let mut writer = BufWriter::new(Vec::new());
    doc.save(&mut writer)
        .map_err(|e| anyhow!("Failed to serialize PDF: {:?}", e))?;
    writer.into_inner().context("Failed to flush PDF document")
}

fn builtin(doc: &PdfDocumentReference, font: BuiltinFont) -> Result<IndirectFontRef> {
    doc.add_builtin_font(font)
        .map_err(|e| anyhow!("Failed to add builtin font: {:?}", e))
}

/// Cell lines of one grid row, Monday to Friday. A cell is filled only when exactly one
/// entry covers the slot.
fn cells(timetable: &Timetable, slot: i32) -> Vec<Vec<String>> {
    (1..=WEEKDAYS)
        .map(|day| {
            let covering: Vec<_> = timetable
                .day(day)
                .map(|d| d.entries.iter().filter(|e| e.covers(slot)).collect())
                .unwrap_or_default();
            match covering.as_slice() {
                [entry] => vec![
                    entry.title.clone(),
                    entry.instructor.clone(),
                    entry.location.clone(),
                ],
                _ => Vec::new(),
            }
        })
        .collect()
}

struct Table<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    font: IndirectFontRef,
    header_font: IndirectFontRef,
    y: f32,
}

impl Table<'_> {
    fn column_width() -> f32 {
        (PAGE_WIDTH - 2.0 * MARGIN - TIME_COLUMN) / f32::from(WEEKDAYS)
    }

    fn column_edges() -> Vec<f32> {
        let mut edges = vec![MARGIN, MARGIN + TIME_COLUMN];
        for i in 1..=WEEKDAYS {
            edges.push(MARGIN + TIME_COLUMN + f32::from(i) * Self::column_width());
        }
        edges
    }

    fn header_row(&mut self) {
        let cells: Vec<Vec<String>> = (1..=WEEKDAYS)
            .map(|day| vec![grid::day_name(day).unwrap_or_default().to_string()])
            .collect();
        let font = self.header_font.clone();
        self.draw_row("Ura", &cells, &font);
    }

    fn row(&mut self, label: &str, cells: &[Vec<String>]) {
        let lines = cells.iter().map(Vec::len).max().unwrap_or(0).max(1);
        if self.y - row_height(lines) < MARGIN {
            self.close();
            debug!("Starting a new PDF page at slot {}", label);
            let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Timetable");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT - MARGIN;
            self.header_row();
        }
        let font = self.font.clone();
        self.draw_row(label, cells, &font);
    }

    fn draw_row(&mut self, label: &str, cells: &[Vec<String>], font: &IndirectFontRef) {
        let lines = cells.iter().map(Vec::len).max().unwrap_or(0).max(1);
        let height = row_height(lines);
        let top = self.y;
        let bottom = top - height;
        let edges = Self::column_edges();

        self.layer.set_outline_thickness(0.2);
        self.line((MARGIN, top), (PAGE_WIDTH - MARGIN, top));
        for x in &edges {
            self.line((*x, top), (*x, bottom));
        }

        let baseline = |i: usize| top - PADDING - (i as f32 + 1.0) * LINE_HEIGHT + 0.6;
        self.layer
            .use_text(label, CELL_SIZE, Mm(MARGIN + PADDING), Mm(baseline(0)), font);
        for (column, cell) in cells.iter().enumerate() {
            let x = edges[column + 1] + PADDING;
            let width = Self::column_width() - 2.0 * PADDING;
            for (i, text) in cell.iter().enumerate() {
                self.layer
                    .use_text(fit(text, width, CELL_SIZE), CELL_SIZE, Mm(x), Mm(baseline(i)), font);
            }
        }

        self.y = bottom;
    }

    fn close(&self) {
        self.line((MARGIN, self.y), (PAGE_WIDTH - MARGIN, self.y));
    }

    fn line(&self, from: (f32, f32), to: (f32, f32)) {
        self.layer.add_line(Line {
            points: vec![
                (Point::new(Mm(from.0), Mm(from.1)), false),
                (Point::new(Mm(to.0), Mm(to.1)), false),
            ],
            is_closed: false,
        });
    }
}

// Builtin fonts are WinAnsi (cp1252) encoded.
fn is_winansi(c: char) -> bool {
    matches!(u32::from(c), 0x20..=0x7E | 0xA0..=0xFF) || "€‚ƒ„…†‡ˆ‰Š‹ŒŽ‘’“”•–—˜™š›œžŸ".contains(c)
}

fn first_unencodable(timetable: &Timetable) -> Option<&str> {
    timetable
        .iter_days()
        .flat_map(|day| &day.entries)
        .flat_map(|e| [e.title.as_str(), e.instructor.as_str(), e.location.as_str()])
        .find(|text| !text.chars().all(is_winansi))
}

fn row_height(lines: usize) -> f32 {
    lines as f32 * LINE_HEIGHT + 2.0 * PADDING
}

// Builtin fonts carry no metrics here, so widths use an average glyph of half an em.
fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * 0.5 * PT_TO_MM
}

fn fit(text: &str, width: f32, size: f32) -> String {
    let max_chars = (width / (size * 0.5 * PT_TO_MM)) as usize;
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut fitted: String = text.chars().take(max_chars.saturating_sub(2)).collect();
    fitted.push_str("..");
    fitted
}
