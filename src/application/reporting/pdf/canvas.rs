//! Thin layout layer over `printpdf`.
//!
//! Coordinates are PostScript points measured from the top-left corner of
//! an A4 page, the way the report layouts are written; conversion to the
//! bottom-left millimetre system of PDF happens here.

use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerIndex, PdfLayerReference, PdfPageIndex, Point, Rect, Rgb,
};

use crate::domain::{DomainError, DomainResult};

pub const PAGE_WIDTH: f32 = 595.0;
pub const PAGE_HEIGHT: f32 = 842.0;
pub const MARGIN: f32 = 50.0;
/// Lowest y a content line may start at before a page break.
pub const CONTENT_BOTTOM: f32 = 770.0;
const FOOTER_Y: f32 = PAGE_HEIGHT - 30.0;

const TABLE_LEFT: f32 = 45.0;
const TABLE_WIDTH: f32 = 510.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb8(pub u8, pub u8, pub u8);

pub const DARK: Rgb8 = Rgb8(0x2c, 0x3e, 0x50);
pub const BLUE: Rgb8 = Rgb8(0x34, 0x98, 0xdb);
pub const RED: Rgb8 = Rgb8(0xe7, 0x4c, 0x3c);
pub const GREEN: Rgb8 = Rgb8(0x27, 0xae, 0x60);
pub const ORANGE: Rgb8 = Rgb8(0xf3, 0x9c, 0x12);
pub const GREY: Rgb8 = Rgb8(0x7f, 0x8c, 0x8d);
pub const LIGHT_GREY: Rgb8 = Rgb8(0x95, 0xa5, 0xa6);
pub const STRIPE: Rgb8 = Rgb8(0xf8, 0xf9, 0xfa);
pub const WHITE: Rgb8 = Rgb8(0xff, 0xff, 0xff);

impl Rgb8 {
    fn color(self) -> Color {
        Color::Rgb(Rgb::new(
            self.0 as f32 / 255.0,
            self.1 as f32 / 255.0,
            self.2 as f32 / 255.0,
            None,
        ))
    }
}

/// Green from 80 %, orange from 50 %, red below.
pub fn rate_color(taux: f64) -> Rgb8 {
    if taux >= 80.0 {
        GREEN
    } else if taux >= 50.0 {
        ORANGE
    } else {
        RED
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weight {
    Regular,
    Bold,
}

fn mm(pt: f32) -> Mm {
    Mm(pt * 25.4 / 72.0)
}

/// Approximate Helvetica advance; good enough for centering and clipping.
pub fn text_width(text: &str, size: f32, weight: Weight) -> f32 {
    let em = match weight {
        Weight::Regular => 0.52,
        Weight::Bold => 0.58,
    };
    text.chars().count() as f32 * size * em
}

/// Cut `text` so that it fits in `width` points, marking the cut with `...`.
pub fn clip(text: &str, width: f32, size: f32, weight: Weight) -> String {
    if text_width(text, size, weight) <= width {
        return text.to_string();
    }
    let mut out = String::new();
    for c in text.chars() {
        out.push(c);
        if text_width(&out, size, weight) + text_width("...", size, weight) > width {
            out.pop();
            break;
        }
    }
    format!("{}...", out.trim_end())
}

/// One column of a table: header label and left edge.
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub title: &'static str,
    pub x: f32,
}

pub struct Canvas {
    doc: PdfDocumentReference,
    pages: Vec<(PdfPageIndex, PdfLayerIndex)>,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    /// Current vertical position from the top of the page
    pub y: f32,
}

fn pdf_err(e: printpdf::Error) -> DomainError {
    DomainError::Internal(format!("PDF generation failed: {}", e))
}

impl Canvas {
    pub fn new(title: &str) -> DomainResult<Self> {
        let (doc, page, layer) =
            PdfDocument::new(title, mm(PAGE_WIDTH), mm(PAGE_HEIGHT), "Layer 1");
        let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_err)?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(pdf_err)?;
        Ok(Self {
            doc,
            pages: vec![(page, layer)],
            regular,
            bold,
            y: MARGIN,
        })
    }

    fn layer(&self) -> PdfLayerReference {
        let (page, layer) = self.pages[self.pages.len() - 1];
        self.doc.get_page(page).get_layer(layer)
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn new_page(&mut self) {
        let (page, layer) = self
            .doc
            .add_page(mm(PAGE_WIDTH), mm(PAGE_HEIGHT), "Layer 1");
        self.pages.push((page, layer));
        self.y = MARGIN;
    }

    /// Start a new page unless `height` more points fit. Returns whether a
    /// page was added.
    pub fn ensure_space(&mut self, height: f32) -> bool {
        if self.y + height > CONTENT_BOTTOM {
            self.new_page();
            return true;
        }
        false
    }

    pub fn gap(&mut self, dy: f32) {
        self.y += dy;
    }

    fn draw_text(&self, layer: &PdfLayerReference, x: f32, y: f32, size: f32, weight: Weight, color: Rgb8, text: &str) {
        let font = match weight {
            Weight::Regular => &self.regular,
            Weight::Bold => &self.bold,
        };
        layer.set_fill_color(color.color());
        layer.use_text(text, size, mm(x), mm(PAGE_HEIGHT - y - size * 0.8), font);
    }

    /// Text whose top-left corner is at (`x`, `y`).
    pub fn text_at(&self, x: f32, y: f32, size: f32, weight: Weight, color: Rgb8, text: &str) {
        self.draw_text(&self.layer(), x, y, size, weight, color, text);
    }

    /// A line of text at the cursor, which then moves below it.
    pub fn line(&mut self, x: f32, size: f32, weight: Weight, color: Rgb8, text: &str) {
        self.ensure_space(size * 1.5);
        self.text_at(x, self.y, size, weight, color, text);
        self.y += size * 1.5;
    }

    pub fn centered(&mut self, size: f32, weight: Weight, color: Rgb8, text: &str) {
        self.ensure_space(size * 1.5);
        let x = ((PAGE_WIDTH - text_width(text, size, weight)) / 2.0).max(MARGIN / 2.0);
        self.text_at(x, self.y, size, weight, color, text);
        self.y += size * 1.5;
    }

    /// Section title, underlined.
    pub fn heading(&mut self, size: f32, color: Rgb8, text: &str) {
        self.ensure_space(size * 3.0);
        self.text_at(MARGIN, self.y, size, Weight::Bold, color, text);
        let under = self.y + size * 1.05;
        self.rule(MARGIN, MARGIN + text_width(text, size, Weight::Bold), under, color, 0.8);
        self.y += size * 1.8;
    }

    pub fn fill_rect(&self, x: f32, y: f32, width: f32, height: f32, color: Rgb8) {
        let layer = self.layer();
        layer.set_fill_color(color.color());
        let rect = Rect::new(
            mm(x),
            mm(PAGE_HEIGHT - y - height),
            mm(x + width),
            mm(PAGE_HEIGHT - y),
        )
        .with_mode(PaintMode::Fill);
        layer.add_rect(rect);
    }

    pub fn rule(&self, x1: f32, x2: f32, y: f32, color: Rgb8, thickness: f32) {
        let layer = self.layer();
        layer.set_outline_color(color.color());
        layer.set_outline_thickness(thickness);
        layer.add_line(Line {
            points: vec![
                (Point::new(mm(x1), mm(PAGE_HEIGHT - y)), false),
                (Point::new(mm(x2), mm(PAGE_HEIGHT - y)), false),
            ],
            is_closed: false,
        });
    }

    /// Dark header band with white column titles.
    pub fn table_header(&mut self, columns: &[Column], size: f32) {
        self.ensure_space(60.0);
        self.fill_rect(TABLE_LEFT, self.y - 8.0, TABLE_WIDTH, 24.0, DARK);
        for column in columns {
            self.text_at(column.x, self.y, size, Weight::Bold, WHITE, column.title);
        }
        self.y += 28.0;
    }

    /// Start a table row; repeats the header on a fresh page when the row
    /// does not fit. Even rows get a light background.
    pub fn table_row(&mut self, columns: &[Column], header_size: f32, index: usize) {
        if self.y + 20.0 > CONTENT_BOTTOM {
            self.new_page();
            self.table_header(columns, header_size);
        }
        if index % 2 == 0 {
            self.fill_rect(TABLE_LEFT, self.y - 5.0, TABLE_WIDTH, 20.0, STRIPE);
        }
    }

    /// Stamp `footer(page, total)` at the bottom of every page and encode.
    pub fn finish(self, footer: impl Fn(usize, usize) -> String) -> DomainResult<Vec<u8>> {
        let total = self.pages.len();
        for (index, (page, layer)) in self.pages.iter().enumerate() {
            let layer = self.doc.get_page(*page).get_layer(*layer);
            let text = footer(index + 1, total);
            let x = ((PAGE_WIDTH - text_width(&text, 8.0, Weight::Regular)) / 2.0).max(MARGIN);
            self.draw_text(&layer, x, FOOTER_Y, 8.0, Weight::Regular, GREY, &text);
        }
        self.doc.save_to_bytes().map_err(pdf_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clip_keeps_short_text_and_marks_cuts() {
        assert_eq!(clip("Yao", 100.0, 10.0, Weight::Regular), "Yao");
        let clipped = clip("Kouadio Ama Christelle Marie", 60.0, 10.0, Weight::Regular);
        assert!(clipped.ends_with("..."));
        assert!(text_width(&clipped, 10.0, Weight::Regular) <= 60.0);
    }

    #[test]
    fn rate_colors() {
        assert_eq!(rate_color(85.0), GREEN);
        assert_eq!(rate_color(50.0), ORANGE);
        assert_eq!(rate_color(49.9), RED);
    }

    #[test]
    fn pages_break_and_encode() {
        let mut canvas = Canvas::new("Test").unwrap();
        for i in 0..80 {
            canvas.line(MARGIN, 11.0, Weight::Regular, DARK, &format!("Ligne {i} é à ç"));
        }
        assert!(canvas.page_count() > 1);
        let bytes = canvas.finish(|page, total| format!("Page {page}/{total}")).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
