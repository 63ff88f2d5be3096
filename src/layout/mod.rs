//! Page canvas: cursor-based drawing over a printpdf document.
//!
//! The canvas keeps a top-down cursor in millimetres from the top-left page
//! corner and converts to PDF bottom-up coordinates at draw time. All drawing
//! goes through explicit cell and rule operations; there is no global state.
//! Sub-blocks that reposition the cursor save and restore it with
//! [`Canvas::xy`] / [`Canvas::set_xy`].

mod metrics;

pub use metrics::{FontMetrics, TtfMetrics, PT_TO_MM};

use std::io::BufWriter;

use printpdf::{
    BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point,
};

use crate::error::{Error, Result};

/// A4 page width in millimetres.
pub const PAGE_WIDTH: f32 = 210.0;
/// A4 page height in millimetres.
pub const PAGE_HEIGHT: f32 = 297.0;
/// Page margin on all sides.
pub const MARGIN: f32 = 10.0;

/// Inner cell padding.
const CELL_PADDING: f32 = 1.0;
/// Rule stroke width in points.
const RULE_WIDTH: f32 = 0.2;

/// Font style selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Regular,
    Bold,
}

/// Horizontal text alignment within a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Which edges of a cell get a border segment.
///
/// Vertical table separators are drawn in a single pass after all rows are
/// known, so body cells usually carry horizontal edges only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Edges {
    pub top: bool,
    pub right: bool,
    pub bottom: bool,
    pub left: bool,
}

impl Edges {
    pub const NONE: Edges = Edges {
        top: false,
        right: false,
        bottom: false,
        left: false,
    };
    pub const ALL: Edges = Edges {
        top: true,
        right: true,
        bottom: true,
        left: true,
    };
    /// Top and bottom only; verticals come from the separator pass.
    pub const HORIZONTAL: Edges = Edges {
        top: true,
        right: false,
        bottom: true,
        left: false,
    };
    /// Left, top, and right; the bottom is implied by the next row's top.
    pub const OPEN_BOTTOM: Edges = Edges {
        top: true,
        right: true,
        bottom: false,
        left: true,
    };
}

struct FontSet {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

/// Drawing surface for one document.
pub struct Canvas {
    doc: PdfDocumentReference,
    pages: Vec<PdfLayerReference>,
    page: usize,
    fonts: FontSet,
    metrics: FontMetrics,
    style: FontStyle,
    size: f32,
    x: f32,
    y: f32,
}

impl Canvas {
    /// Create a canvas with one A4 page.
    ///
    /// With `font_data` present the document embeds that TTF and renders
    /// native characters; otherwise it uses builtin Helvetica, which is
    /// WinAnsi-only.
    pub fn new(title: &str, font_data: Option<Vec<u8>>) -> Result<Self> {
        let (doc, page_idx, layer_idx) =
            PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        let layer = doc.get_page(page_idx).get_layer(layer_idx);
        layer.set_outline_thickness(RULE_WIDTH);

        let (fonts, metrics) = match font_data {
            Some(data) => {
                let font = doc.add_external_font(data.as_slice())?;
                let metrics = FontMetrics::External(TtfMetrics::load(data)?);
                // A single embedded face serves both styles; headings differ
                // by size only in native mode.
                (
                    FontSet {
                        regular: font.clone(),
                        bold: font,
                    },
                    metrics,
                )
            }
            None => (
                FontSet {
                    regular: doc.add_builtin_font(BuiltinFont::Helvetica)?,
                    bold: doc.add_builtin_font(BuiltinFont::HelveticaBold)?,
                },
                FontMetrics::Builtin,
            ),
        };

        Ok(Self {
            doc,
            pages: vec![layer],
            page: 0,
            fonts,
            metrics,
            style: FontStyle::Regular,
            size: 10.0,
            x: MARGIN,
            y: MARGIN,
        })
    }

    pub fn set_font(&mut self, style: FontStyle, size_pt: f32) {
        self.style = style;
        self.size = size_pt;
    }

    /// Current cursor position.
    pub fn xy(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    pub fn set_xy(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
    }

    pub fn set_y(&mut self, y: f32) {
        self.y = y;
    }

    /// Advance the cursor one line down and return to the margin.
    pub fn ln(&mut self, h: f32) {
        self.x = MARGIN;
        self.y += h;
    }

    /// Index of the page the cursor is on.
    pub fn current_page(&self) -> usize {
        self.page
    }

    /// Start a new page; the cursor moves to its top-left corner.
    pub fn page_break(&mut self) {
        let (page_idx, layer_idx) =
            self.doc
                .add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        let layer = self.doc.get_page(page_idx).get_layer(layer_idx);
        layer.set_outline_thickness(RULE_WIDTH);
        self.pages.push(layer);
        self.page = self.pages.len() - 1;
        self.x = MARGIN;
        self.y = MARGIN;
    }

    /// Break the page when fewer than `h` millimetres remain below the
    /// cursor. Returns whether a break happened.
    pub fn ensure(&mut self, h: f32) -> bool {
        if self.y + h > PAGE_HEIGHT - MARGIN {
            self.page_break();
            true
        } else {
            false
        }
    }

    /// Width of `text` in millimetres with the current font.
    pub fn text_width(&self, text: &str) -> f32 {
        self.metrics
            .text_width_mm(text, self.style == FontStyle::Bold, self.size)
    }

    /// Wrap text into lines that fit a cell of width `w`, using the current
    /// font. This is the dry-run measurement primitive: it commits no ink.
    pub fn wrap(&self, text: &str, w: f32) -> Vec<String> {
        let avail = w - 2.0 * CELL_PADDING;
        if avail <= 0.0 {
            return vec![text.to_string()];
        }

        let mut lines = Vec::new();
        for raw in text.split('\n') {
            let mut current = String::new();
            for word in raw.split(' ').filter(|w| !w.is_empty()) {
                let candidate = if current.is_empty() {
                    word.to_string()
                } else {
                    format!("{current} {word}")
                };
                if self.text_width(&candidate) <= avail {
                    current = candidate;
                } else {
                    if !current.is_empty() {
                        lines.push(current);
                    }
                    current = self.break_word(word, avail, &mut lines);
                }
            }
            lines.push(current);
        }
        lines
    }

    /// Hard-break a word wider than the cell, pushing full chunks and
    /// returning the remainder.
    fn break_word(&self, word: &str, avail: f32, lines: &mut Vec<String>) -> String {
        if self.text_width(word) <= avail {
            return word.to_string();
        }
        let mut chunk = String::new();
        for c in word.chars() {
            let mut candidate = chunk.clone();
            candidate.push(c);
            if self.text_width(&candidate) > avail && !chunk.is_empty() {
                lines.push(chunk);
                chunk = c.to_string();
            } else {
                chunk = candidate;
            }
        }
        chunk
    }

    /// Dry-run line count of a wrapped block of width `w`.
    pub fn measure(&self, w: f32, text: &str) -> usize {
        self.wrap(text, w).len()
    }

    /// Draw a single-line cell and advance the cursor horizontally.
    pub fn cell(&mut self, w: f32, h: f32, text: &str, align: Align, edges: Edges) {
        self.draw_edges(self.x, self.y, w, h, edges);
        if !text.is_empty() {
            let baseline = self.y + h / 2.0 + 0.35 * self.size * PT_TO_MM;
            let tx = self.aligned_x(text, w, align);
            self.draw_text(tx, baseline, text);
        }
        self.x += w;
    }

    /// Draw a wrapped block and report how many lines it produced.
    ///
    /// Edges are drawn around the whole block, not per line. The cursor
    /// returns to the margin below the block, as after [`Canvas::ln`].
    pub fn multi_cell(
        &mut self,
        w: f32,
        line_h: f32,
        text: &str,
        align: Align,
        edges: Edges,
    ) -> usize {
        let lines = self.wrap(text, w);
        let block_h = lines.len() as f32 * line_h;
        self.draw_edges(self.x, self.y, w, block_h, edges);

        for (i, line) in lines.iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            let baseline =
                self.y + i as f32 * line_h + line_h / 2.0 + 0.35 * self.size * PT_TO_MM;
            let tx = self.aligned_x(line, w, align);
            self.draw_text(tx, baseline, line);
        }

        self.x = MARGIN;
        self.y += block_h;
        lines.len()
    }

    /// Horizontal rule on the current page.
    pub fn hline(&self, x1: f32, x2: f32, y: f32) {
        self.line_on(self.page, x1, y, x2, y);
    }

    /// Vertical rule segment between two y-coordinates on a given page.
    pub fn vline(&self, page: usize, x: f32, y1: f32, y2: f32) {
        self.line_on(page, x, y1, x, y2);
    }

    /// Serialize the document. Output goes to memory first so a failed
    /// render never leaves a partial file behind.
    pub fn into_bytes(self) -> Result<Vec<u8>> {
        let mut writer = BufWriter::new(Vec::new());
        self.doc.save(&mut writer)?;
        writer.into_inner().map_err(|e| Error::Pdf(e.to_string()))
    }

    fn aligned_x(&self, text: &str, w: f32, align: Align) -> f32 {
        match align {
            Align::Left => self.x + CELL_PADDING,
            Align::Center => self.x + (w - self.text_width(text)) / 2.0,
            Align::Right => self.x + w - self.text_width(text) - CELL_PADDING,
        }
    }

    fn draw_text(&self, x: f32, y_from_top: f32, text: &str) {
        let font = match self.style {
            FontStyle::Regular => &self.fonts.regular,
            FontStyle::Bold => &self.fonts.bold,
        };
        self.pages[self.page].use_text(
            text,
            self.size,
            Mm(x),
            Mm(PAGE_HEIGHT - y_from_top),
            font,
        );
    }

    fn draw_edges(&self, x: f32, y: f32, w: f32, h: f32, edges: Edges) {
        if edges.top {
            self.line_on(self.page, x, y, x + w, y);
        }
        if edges.bottom {
            self.line_on(self.page, x, y + h, x + w, y + h);
        }
        if edges.left {
            self.line_on(self.page, x, y, x, y + h);
        }
        if edges.right {
            self.line_on(self.page, x + w, y, x + w, y + h);
        }
    }

    fn line_on(&self, page: usize, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.pages[page].add_line(Line {
            points: vec![
                (Point::new(Mm(x1), Mm(PAGE_HEIGHT - y1)), false),
                (Point::new(Mm(x2), Mm(PAGE_HEIGHT - y2)), false),
            ],
            is_closed: false,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> Canvas {
        Canvas::new("test", None).unwrap()
    }

    #[test]
    fn test_wrap_short_text_is_one_line() {
        let c = canvas();
        assert_eq!(c.wrap("abc", 50.0), vec!["abc".to_string()]);
        assert_eq!(c.measure(50.0, "abc"), 1);
    }

    #[test]
    fn test_wrap_empty_text_is_one_blank_line() {
        let c = canvas();
        assert_eq!(c.wrap("", 50.0), vec![String::new()]);
    }

    #[test]
    fn test_wrap_splits_on_word_boundaries() {
        let mut c = canvas();
        c.set_font(FontStyle::Regular, 8.0);
        let text = "alpha beta gamma delta epsilon zeta eta theta";
        let lines = c.wrap(text, 20.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(c.text_width(line) <= 20.0 - 2.0);
        }
        // No word lost or duplicated.
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn test_wrap_hard_breaks_long_words() {
        let mut c = canvas();
        c.set_font(FontStyle::Regular, 8.0);
        let lines = c.wrap(&"x".repeat(200), 15.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(c.text_width(line) <= 15.0 - 2.0);
        }
        assert_eq!(lines.concat().len(), 200);
    }

    #[test]
    fn test_measure_commits_no_cursor_movement() {
        let c = canvas();
        let before = c.xy();
        c.measure(30.0, "some wrapped text that spans lines");
        assert_eq!(c.xy(), before);
    }

    #[test]
    fn test_cell_advances_x_and_multi_cell_advances_y() {
        let mut c = canvas();
        c.cell(40.0, 6.0, "label", Align::Left, Edges::ALL);
        assert_eq!(c.xy(), (MARGIN + 40.0, MARGIN));

        let lines = c.multi_cell(40.0, 5.0, "one", Align::Left, Edges::NONE);
        assert_eq!(lines, 1);
        assert_eq!(c.xy(), (MARGIN, MARGIN + 5.0));
    }

    #[test]
    fn test_ensure_breaks_near_page_bottom() {
        let mut c = canvas();
        assert!(!c.ensure(10.0));
        assert_eq!(c.current_page(), 0);

        c.set_y(PAGE_HEIGHT - MARGIN - 5.0);
        assert!(c.ensure(10.0));
        assert_eq!(c.current_page(), 1);
        assert_eq!(c.xy(), (MARGIN, MARGIN));
    }

    #[test]
    fn test_into_bytes_produces_pdf() {
        let mut c = canvas();
        c.cell(40.0, 6.0, "hello", Align::Left, Edges::NONE);
        let bytes = c.into_bytes().unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
