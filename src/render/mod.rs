//! Invoice document assembler.
//!
//! Orchestration order: resolve the rendering surface once per document,
//! then header, party block, payment block, item table with aggregates,
//! summary, and the due-amount line. The PDF is rendered to memory first and
//! written to disk only on full success, so a failed render leaves no
//! partial file behind.

pub mod labels;

mod aggregate;
mod table;

pub use aggregate::Totals;
pub use labels::{Labels, Locale};

use std::fs;
use std::path::PathBuf;

use log::{debug, info, warn};
use rust_decimal::Decimal;

use crate::config::Config;
use crate::error::Result;
use crate::layout::{Align, Canvas, Edges, FontStyle, MARGIN, PAGE_WIDTH};
use crate::model::{InvoiceRecord, Party};
use crate::text::{collapse_whitespace, transliterate};

// Layout constants, in millimetres.
pub(crate) const LINE_H_SMALL: f32 = 4.0;
pub(crate) const LINE_H_MED: f32 = 5.0;
pub(crate) const LINE_H_LARGE: f32 = 6.0;
pub(crate) const SP_SMALL: f32 = 4.0;
pub(crate) const SP_MED: f32 = 10.0;
pub(crate) const SP_LARGE: f32 = 12.0;
pub(crate) const MIN_ROW_HEIGHT: f32 = 10.0;
pub(crate) const ROW_H_PER_LINE: f32 = 5.0;
/// Width of one party column.
pub(crate) const COL_WIDTH: f32 = 85.0;
/// Gap between the seller and buyer columns.
pub(crate) const COL_GAP: f32 = 30.0;

const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;

/// Rendering-surface capability, decided once per document and threaded
/// into every text preparation instead of mutating shared font state.
#[derive(Debug, Clone, Copy)]
pub struct Surface {
    /// Whether the document font can display native (non-ASCII) characters.
    pub native: bool,
}

impl Surface {
    /// Normalize record text for this surface: collapse whitespace, and
    /// transliterate diacritics when the surface is ASCII-only.
    pub fn prepare(&self, text: &str) -> String {
        let collapsed = collapse_whitespace(text);
        if self.native {
            collapsed
        } else {
            transliterate(&collapsed)
        }
    }
}

/// Format a monetary amount with two decimal places.
pub(crate) fn money(value: Decimal) -> String {
    format!("{value:.2}")
}

/// Derive the output filename from the invoice data.
///
/// The seller name is always transliterated here regardless of the rendering
/// surface, since filesystem portability does not depend on the font.
pub fn output_filename(record: &InvoiceRecord) -> String {
    let seller = collapse_whitespace(&transliterate(&record.seller.name));
    let safe: String = seller
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '-' } else { c })
        .collect();
    format!(
        "{} - Invoice {}-{}.pdf",
        safe, record.number.sequence, record.number.year
    )
}

/// Render an invoice and write it into the configured output directory,
/// which is created when missing. Returns the path of the written file.
pub fn render_to_file(record: &InvoiceRecord, config: &Config) -> Result<PathBuf> {
    let bytes = render_to_bytes(record, config)?;
    fs::create_dir_all(&config.output_dir)?;
    let path = config.output_dir.join(output_filename(record));
    fs::write(&path, bytes)?;
    info!("saved {}", path.display());
    Ok(path)
}

/// Render an invoice document to PDF bytes.
pub fn render_to_bytes(record: &InvoiceRecord, config: &Config) -> Result<Vec<u8>> {
    let font_data = probe_font(config);
    let surface = Surface {
        native: font_data.is_some(),
    };
    let labels = Locale::for_currency(&record.currency).labels();

    let title = format!("Invoice {}", record.number.full);
    let mut canvas = Canvas::new(&title, font_data)?;

    draw_header(&mut canvas, &surface, labels, record);
    draw_parties(&mut canvas, &surface, labels, record);
    draw_payment(&mut canvas, &surface, labels, record, config);
    let totals = table::draw_items(&mut canvas, &surface, labels, record);
    debug!(
        "table totals: net {} tax {} gross {}",
        totals.net, totals.tax, totals.gross
    );
    draw_amount_due(&mut canvas, &surface, labels, record);

    canvas.into_bytes()
}

/// Load the configured native font, if any.
///
/// A missing or unparsable font silently downgrades the surface to
/// transliteration; it is a capability probe, not an error path.
fn probe_font(config: &Config) -> Option<Vec<u8>> {
    let path = config.font_path.as_ref()?;
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(e) => {
            debug!("font {} not readable ({e}); falling back to ASCII", path.display());
            return None;
        }
    };
    match crate::layout::TtfMetrics::load(data.clone()) {
        Ok(_) => Some(data),
        Err(e) => {
            debug!("font {} rejected ({e}); falling back to ASCII", path.display());
            None
        }
    }
}

fn draw_header(canvas: &mut Canvas, surface: &Surface, labels: &Labels, record: &InvoiceRecord) {
    canvas.set_font(FontStyle::Bold, 14.0);
    let title = surface.prepare(&format!("{} {}", labels.invoice_no, record.number.full));
    canvas.cell(CONTENT_WIDTH, 8.0, &title, Align::Center, Edges::NONE);
    canvas.ln(8.0 + SP_SMALL);

    canvas.set_font(FontStyle::Regular, 9.0);
    let issued = surface.prepare(&format!("{} {}", labels.date_of_issue, record.issue_date));
    canvas.cell(CONTENT_WIDTH, LINE_H_LARGE, &issued, Align::Center, Edges::NONE);
    canvas.ln(LINE_H_LARGE);

    if !record.tracking_id.is_empty() {
        canvas.set_font(FontStyle::Regular, 8.0);
        let tracking = surface.prepare(&format!(
            "{}: {}",
            labels.tracking_number, record.tracking_id
        ));
        canvas.cell(CONTENT_WIDTH, LINE_H_MED, &tracking, Align::Center, Edges::NONE);
        canvas.ln(LINE_H_MED);
    }

    canvas.ln(SP_MED);
}

/// Build one party's line list: wrapped name, tax-id line when present,
/// wrapped address.
fn party_lines(
    canvas: &Canvas,
    surface: &Surface,
    labels: &Labels,
    party: &Party,
) -> Vec<String> {
    let mut lines = canvas.wrap(&surface.prepare(&party.name), COL_WIDTH);
    if let Some(tax_id) = &party.tax_id {
        lines.push(format!("{}: {}", labels.tax_id, surface.prepare(tax_id)));
    }
    lines.extend(canvas.wrap(&surface.prepare(&party.address), COL_WIDTH));
    lines
}

/// Pad the shorter line list with blanks so both columns have the same
/// row count.
fn pad_pair(mut a: Vec<String>, mut b: Vec<String>) -> (Vec<String>, Vec<String>) {
    let rows = a.len().max(b.len());
    a.resize(rows, String::new());
    b.resize(rows, String::new());
    (a, b)
}

/// Two-column seller/buyer block.
///
/// Rows are drawn strictly row-by-row: row `i` of the seller and row `i` of
/// the buyer share one y-coordinate, so wrapping in one column can never
/// push the other out of alignment. Padded rows render as blank cells, not
/// omitted ones.
fn draw_parties(canvas: &mut Canvas, surface: &Surface, labels: &Labels, record: &InvoiceRecord) {
    let (x0, y0) = canvas.xy();
    let buyer_x = x0 + COL_WIDTH + COL_GAP;

    canvas.set_font(FontStyle::Bold, 10.0);
    canvas.cell(
        COL_WIDTH,
        LINE_H_LARGE,
        &surface.prepare(labels.seller),
        Align::Left,
        Edges::NONE,
    );
    canvas.set_xy(buyer_x, y0);
    canvas.cell(
        COL_WIDTH,
        LINE_H_LARGE,
        &surface.prepare(labels.buyer),
        Align::Left,
        Edges::NONE,
    );

    canvas.set_font(FontStyle::Regular, 9.0);
    let seller_lines = party_lines(canvas, surface, labels, &record.seller);
    let buyer_lines = party_lines(canvas, surface, labels, &record.buyer);
    let (seller_lines, buyer_lines) = pad_pair(seller_lines, buyer_lines);

    let block_top = y0 + LINE_H_LARGE;
    for (i, (left, right)) in seller_lines.iter().zip(buyer_lines.iter()).enumerate() {
        let y = block_top + i as f32 * LINE_H_MED;
        canvas.set_xy(x0, y);
        canvas.cell(COL_WIDTH, LINE_H_MED, left, Align::Left, Edges::NONE);
        canvas.set_xy(buyer_x, y);
        canvas.cell(COL_WIDTH, LINE_H_MED, right, Align::Left, Edges::NONE);
    }

    canvas.set_xy(
        x0,
        block_top + seller_lines.len() as f32 * LINE_H_MED + SP_LARGE,
    );
}

fn draw_payment(
    canvas: &mut Canvas,
    surface: &Surface,
    labels: &Labels,
    record: &InvoiceRecord,
    config: &Config,
) {
    let account = config.bank_account(&record.currency).unwrap_or_else(|| {
        warn!(
            "ACCOUNT_{} is not set; rendering an empty bank account field",
            record.currency
        );
        String::new()
    });

    canvas.set_font(FontStyle::Regular, 9.0);
    let bank = surface.prepare(&format!("{}: {}", labels.bank_account, account));
    canvas.cell(CONTENT_WIDTH, LINE_H_MED, &bank, Align::Left, Edges::NONE);
    canvas.ln(LINE_H_MED);

    let sold = surface.prepare(&format!("{}: {}", labels.date_of_sale, record.sale_date));
    canvas.cell(CONTENT_WIDTH, LINE_H_MED, &sold, Align::Left, Edges::NONE);
    canvas.ln(LINE_H_MED);

    let payment = surface.prepare(&labels.payment_line(&record.currency));
    canvas.cell(CONTENT_WIDTH, LINE_H_MED, &payment, Align::Left, Edges::NONE);
    canvas.ln(LINE_H_MED + SP_LARGE);
}

fn draw_amount_due(
    canvas: &mut Canvas,
    surface: &Surface,
    labels: &Labels,
    record: &InvoiceRecord,
) {
    canvas.ensure(8.0 + SP_LARGE);
    canvas.ln(SP_LARGE);
    canvas.set_font(FontStyle::Bold, 12.0);
    // The declared total passes through verbatim; it is never recomputed
    // from the line items.
    let due = surface.prepare(&format!(
        "{} {} {}",
        labels.amount_due,
        money(record.total_amount),
        record.currency
    ));
    canvas.cell(CONTENT_WIDTH, 8.0, &due, Align::Left, Edges::NONE);
    canvas.ln(8.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{InvoiceNumber, LineItem, TaxRate};
    use rust_decimal_macros::dec;

    fn ascii_surface() -> Surface {
        Surface { native: false }
    }

    fn record() -> InvoiceRecord {
        InvoiceRecord {
            number: InvoiceNumber::parse("5/2024"),
            issue_date: "2024-03-05".into(),
            sale_date: "2024-03-05".into(),
            seller: Party {
                name: "Świetna Firma".into(),
                tax_id: Some("1234567890".into()),
                address: "ul. Krótka 2, 00-002 Kraków".into(),
            },
            buyer: Party {
                name: "Klient S.A.".into(),
                tax_id: None,
                address: "ul. Długa 1, 00-001 Warszawa".into(),
            },
            currency: "PLN".into(),
            total_amount: dec!(1230.00),
            tracking_id: "ksef-0001".into(),
            items: vec![LineItem::new(
                "Usługa programistyczna".into(),
                "szt.".into(),
                "1".into(),
                dec!(1000),
                dec!(1000),
                TaxRate::Rate(dec!(23)),
            )],
        }
    }

    #[test]
    fn test_output_filename_transliterates_seller() {
        let filename = output_filename(&record());
        assert_eq!(filename, "Swietna Firma - Invoice 5-2024.pdf");
    }

    #[test]
    fn test_output_filename_strips_path_separators() {
        let mut r = record();
        r.seller.name = "A/B".into();
        assert!(output_filename(&r).starts_with("A-B - Invoice"));
    }

    #[test]
    fn test_surface_prepare_ascii() {
        let s = ascii_surface();
        assert_eq!(s.prepare("  Gęśl \n jaźń "), "Gesl jazn");
    }

    #[test]
    fn test_surface_prepare_native_keeps_diacritics() {
        let s = Surface { native: true };
        assert_eq!(s.prepare(" Gęśl  jaźń "), "Gęśl jaźń");
    }

    #[test]
    fn test_money_formatting() {
        assert_eq!(money(dec!(10)), "10.00");
        assert_eq!(money(dec!(2.3)), "2.30");
        assert_eq!(money(dec!(1234.567)), "1234.57");
    }

    #[test]
    fn test_party_rows_align_with_blank_padding() {
        let canvas = Canvas::new("t", None).unwrap();
        let surface = ascii_surface();
        let labels = Locale::English.labels();

        // Seller: name + 1-line address = 2 rows.
        let seller = Party {
            name: "Short Co".into(),
            tax_id: None,
            address: "Street 1".into(),
        };
        // Buyer: name + tax id + address wrapping into 2 lines = 4 rows.
        let buyer = Party {
            name: "Buyer Co".into(),
            tax_id: Some("9876543210".into()),
            address: "Aleja Niepodleglosci 1234 lokal 56, 00-950 Warszawa, budynek B, pietro IV"
                .into(),
        };

        let s = party_lines(&canvas, &surface, labels, &seller);
        let b = party_lines(&canvas, &surface, labels, &buyer);
        assert_eq!(s.len(), 2);
        assert_eq!(b.len(), 4);

        let (s, b) = pad_pair(s, b);
        assert_eq!(s.len(), 4);
        assert_eq!(b.len(), 4);
        // Padded seller rows render blank, not omitted.
        assert_eq!(s[2], "");
        assert_eq!(s[3], "");
        assert_eq!(b[1], "NIP: 9876543210");
    }

    #[test]
    fn test_render_to_bytes_produces_pdf() {
        let config = Config::default();
        let bytes = render_to_bytes(&record(), &config).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
