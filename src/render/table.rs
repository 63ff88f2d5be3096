//! Item table rendering: header, rows, summary, and the separator pass.
//!
//! Row heights are measured before any ink is committed, because bordered
//! cells need a height agreed upon in advance. Vertical column separators
//! are drawn once per page segment after all rows are known — drawing them
//! per row would leave seams at row boundaries.

use crate::layout::{Align, Canvas, Edges, FontStyle, MARGIN};
use crate::model::{InvoiceRecord, LineItem};

use super::aggregate::Totals;
use super::labels::Labels;
use super::{
    money, Surface, LINE_H_LARGE, LINE_H_SMALL, MIN_ROW_HEIGHT, ROW_H_PER_LINE,
};

/// Column widths in declared order: sequence no., description, quantity,
/// unit, unit price, net price, tax rate, tax amount, gross value.
pub(crate) const WIDTHS: [f32; 9] = [8.0, 50.0, 12.0, 10.0, 20.0, 20.0, 21.0, 15.0, 20.0];

/// One contiguous vertical span of the table on a single page.
struct Segment {
    page: usize,
    top: f32,
    bottom: f32,
}

/// Tracks table spans across page breaks for the separator pass.
struct Separators {
    segments: Vec<Segment>,
    page: usize,
    top: f32,
}

impl Separators {
    fn start(canvas: &Canvas) -> Self {
        let (_, y) = canvas.xy();
        Self {
            segments: Vec::new(),
            page: canvas.current_page(),
            top: y,
        }
    }

    /// Close the span on the previous page and open one at the top of the
    /// new page.
    fn page_broken(&mut self, canvas: &Canvas, previous_bottom: f32) {
        self.segments.push(Segment {
            page: self.page,
            top: self.top,
            bottom: previous_bottom,
        });
        self.page = canvas.current_page();
        self.top = canvas.xy().1;
    }

    fn finish(mut self, canvas: &Canvas) -> Vec<Segment> {
        let (_, bottom) = canvas.xy();
        self.segments.push(Segment {
            page: self.page,
            top: self.top,
            bottom,
        });
        self.segments
    }
}

/// Render the item table and return the accumulated totals.
pub(crate) fn draw_items(
    canvas: &mut Canvas,
    surface: &Surface,
    labels: &Labels,
    record: &InvoiceRecord,
) -> Totals {
    let mut separators = Separators::start(canvas);

    draw_header_row(canvas, surface, labels, &record.currency);

    let mut totals = Totals::new();
    for (index, item) in record.items.iter().enumerate() {
        draw_row(canvas, surface, index + 1, item, &mut separators);
        totals.add(item);
    }

    draw_summary(canvas, surface, labels, record, &totals, &mut separators);

    // Separator pass: one vertical rule per column boundary, spanning from
    // the header's top to the summary's bottom within each page segment.
    let offsets = column_offsets();
    for segment in separators.finish(canvas) {
        for x in &offsets {
            canvas.vline(segment.page, *x, segment.top, segment.bottom);
        }
    }

    totals
}

/// Column boundary x-offsets: the running sum of widths from the left
/// margin, including both outer edges.
fn column_offsets() -> Vec<f32> {
    let mut offsets = vec![MARGIN];
    let mut x = MARGIN;
    for w in WIDTHS {
        x += w;
        offsets.push(x);
    }
    offsets
}

/// Header row. Each label may wrap (they vary by locale and can be long);
/// the row height is the maximum measured height across all columns, and
/// every header cell is drawn at that shared height. The header draws its
/// own separator segments so the sub-region reads as a unit even before
/// the full-table pass runs.
fn draw_header_row(canvas: &mut Canvas, surface: &Surface, labels: &Labels, currency: &str) {
    canvas.set_font(FontStyle::Bold, 8.0);

    let headers: [(String, Align); 9] = [
        (surface.prepare(labels.col_no), Align::Center),
        (surface.prepare(labels.col_description), Align::Left),
        (surface.prepare(labels.col_quantity), Align::Center),
        (surface.prepare(labels.col_unit), Align::Center),
        (surface.prepare(labels.col_unit_price), Align::Right),
        (surface.prepare(labels.col_net), Align::Right),
        (surface.prepare(labels.col_tax_rate), Align::Center),
        (surface.prepare(labels.col_tax), Align::Right),
        (surface.prepare(&labels.value_header(currency)), Align::Right),
    ];

    let max_lines = headers
        .iter()
        .zip(WIDTHS)
        .map(|((text, _), w)| canvas.measure(w, text))
        .max()
        .unwrap_or(1);
    let header_h = LINE_H_LARGE.max(max_lines as f32 * LINE_H_SMALL);

    let (x0, y0) = canvas.xy();
    let mut x = x0;
    for ((text, align), w) in headers.iter().zip(WIDTHS) {
        canvas.set_xy(x, y0);
        draw_wrapped_cell(canvas, w, header_h, text, *align);
        x += w;
    }

    canvas.hline(x0, x, y0);
    canvas.hline(x0, x, y0 + header_h);
    let page = canvas.current_page();
    for offset in column_offsets() {
        canvas.vline(page, offset, y0, y0 + header_h);
    }

    canvas.set_xy(x0, y0 + header_h);
}

/// Draw wrapped text vertically centered inside a fixed-height cell,
/// without moving the caller's notion of the cursor.
fn draw_wrapped_cell(canvas: &mut Canvas, w: f32, h: f32, text: &str, align: Align) {
    let (x, y) = canvas.xy();
    let lines = canvas.wrap(text, w);
    let text_h = lines.len() as f32 * LINE_H_SMALL;
    let mut line_y = y + (h - text_h) / 2.0;
    for line in lines {
        canvas.set_xy(x, line_y);
        canvas.cell(w, LINE_H_SMALL, &line, align, Edges::NONE);
        line_y += LINE_H_SMALL;
    }
    canvas.set_xy(x, y);
}

/// One item row. The wrapped description height is measured first; the
/// sequence cell and every fixed-content cell are then drawn at that agreed
/// height. The description block carries left/top/right edges only — its
/// bottom is implied by the next row's top edge or the summary's.
fn draw_row(
    canvas: &mut Canvas,
    surface: &Surface,
    index: usize,
    item: &LineItem,
    separators: &mut Separators,
) {
    canvas.set_font(FontStyle::Regular, 8.0);

    let description = surface.prepare(&item.description);
    let lines = canvas.measure(WIDTHS[1], &description);
    let row_h = MIN_ROW_HEIGHT.max(lines as f32 * ROW_H_PER_LINE);

    let (_, y_before) = canvas.xy();
    if canvas.ensure(row_h) {
        separators.page_broken(canvas, y_before);
    }

    let (x0, y0) = canvas.xy();
    canvas.cell(
        WIDTHS[0],
        row_h,
        &index.to_string(),
        Align::Center,
        Edges::HORIZONTAL,
    );

    let (desc_x, desc_y) = canvas.xy();
    canvas.multi_cell(
        WIDTHS[1],
        ROW_H_PER_LINE,
        &description,
        Align::Left,
        Edges::OPEN_BOTTOM,
    );
    canvas.set_xy(desc_x + WIDTHS[1], desc_y);

    let cells: [(usize, String, Align); 7] = [
        (2, surface.prepare(&item.quantity), Align::Center),
        (3, surface.prepare(&item.unit), Align::Center),
        (4, money(item.unit_price), Align::Right),
        (5, money(item.net), Align::Right),
        (6, surface.prepare(&item.tax_rate.label()), Align::Center),
        (7, money(item.tax_amount), Align::Right),
        (8, money(item.gross), Align::Right),
    ];
    for (col, value, align) in cells {
        canvas.cell(WIDTHS[col], row_h, &value, align, Edges::HORIZONTAL);
    }

    canvas.set_xy(x0, y0 + row_h);
}

/// Totals row plus the single "by rate" breakdown row.
///
/// The breakdown intentionally shows one rate bucket labeled from the first
/// line item, matching the established document format even when several
/// rates appear; see DESIGN.md.
fn draw_summary(
    canvas: &mut Canvas,
    surface: &Surface,
    labels: &Labels,
    record: &InvoiceRecord,
    totals: &Totals,
    separators: &mut Separators,
) {
    let (_, y_before) = canvas.xy();
    if canvas.ensure(2.0 * LINE_H_LARGE) {
        separators.page_broken(canvas, y_before);
    }

    canvas.set_font(FontStyle::Bold, 8.0);
    let rate_label = record
        .items
        .first()
        .map(|item| surface.prepare(&item.tax_rate.label()))
        .unwrap_or_default();

    let total_cells: [(String, Align); 9] = [
        (String::new(), Align::Left),
        (surface.prepare(labels.total), Align::Right),
        (String::new(), Align::Left),
        (String::new(), Align::Left),
        (String::new(), Align::Left),
        (money(totals.net), Align::Right),
        (rate_label.clone(), Align::Center),
        (money(totals.tax), Align::Right),
        (money(totals.gross), Align::Right),
    ];
    draw_summary_row(canvas, &total_cells);

    let rates_cells: [(String, Align); 9] = [
        (String::new(), Align::Left),
        (surface.prepare(labels.by_rates), Align::Right),
        (String::new(), Align::Left),
        (String::new(), Align::Left),
        (String::new(), Align::Left),
        (money(totals.net), Align::Right),
        (rate_label, Align::Center),
        (money(totals.tax), Align::Right),
        (String::new(), Align::Left),
    ];
    draw_summary_row(canvas, &rates_cells);
}

fn draw_summary_row(canvas: &mut Canvas, cells: &[(String, Align); 9]) {
    let (x0, y0) = canvas.xy();
    for ((value, align), w) in cells.iter().zip(WIDTHS) {
        canvas.cell(w, LINE_H_LARGE, value, *align, Edges::HORIZONTAL);
    }
    canvas.set_xy(x0, y0 + LINE_H_LARGE);
}
