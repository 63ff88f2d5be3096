//! Font metrics used for text measurement.
//!
//! Wrapped line counts must be known before a bordered cell is drawn, so the
//! canvas needs character advance widths up front. Builtin Helvetica metrics
//! come from the standard AFM tables (1/1000 em units); an embedded TTF is
//! measured through `ttf-parser`, the same parser printpdf uses when it
//! embeds the font.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::error::{Error, Result};

/// Width of a character with no table entry (Helvetica lowercase average).
const DEFAULT_WIDTH: f32 = 556.0;

/// Helvetica advance widths for U+0020..=U+007E, in 1/1000 em.
#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Helvetica-Bold advance widths for U+0020..=U+007E, in 1/1000 em.
#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Point-to-millimetre conversion factor.
pub const PT_TO_MM: f32 = 25.4 / 72.0;

/// Character advance widths for the document's font set.
pub enum FontMetrics {
    /// Builtin Helvetica and Helvetica-Bold AFM tables.
    Builtin,
    /// Metrics read from an embedded TTF font file.
    External(TtfMetrics),
}

impl FontMetrics {
    /// Advance of one character in 1/1000 em.
    fn char_width_milli(&self, c: char, bold: bool) -> f32 {
        match self {
            FontMetrics::Builtin => {
                let table = if bold { &HELVETICA_BOLD } else { &HELVETICA };
                let code = c as u32;
                if (0x20..=0x7E).contains(&code) {
                    f32::from(table[(code - 0x20) as usize])
                } else {
                    DEFAULT_WIDTH
                }
            }
            FontMetrics::External(ttf) => ttf.advance_milli(c),
        }
    }

    /// Width of a text run in millimetres at the given point size.
    pub fn text_width_mm(&self, text: &str, bold: bool, size_pt: f32) -> f32 {
        let milli: f32 = text.chars().map(|c| self.char_width_milli(c, bold)).sum();
        milli / 1000.0 * size_pt * PT_TO_MM
    }
}

/// Advance widths of an embedded TTF, cached per character.
pub struct TtfMetrics {
    data: Vec<u8>,
    cache: RefCell<HashMap<char, f32>>,
}

impl TtfMetrics {
    /// Validate the font file and prepare a metrics cache.
    pub fn load(data: Vec<u8>) -> Result<Self> {
        let face = ttf_parser::Face::parse(&data, 0).map_err(|e| Error::Font(e.to_string()))?;
        if face.units_per_em() == 0 {
            return Err(Error::Font("font reports zero units per em".into()));
        }
        Ok(Self {
            data,
            cache: RefCell::new(HashMap::new()),
        })
    }

    fn advance_milli(&self, c: char) -> f32 {
        if let Some(w) = self.cache.borrow().get(&c) {
            return *w;
        }
        // Face borrows the byte buffer; a miss re-parses it.
        let width = ttf_parser::Face::parse(&self.data, 0)
            .ok()
            .and_then(|face| {
                let glyph = face.glyph_index(c)?;
                let advance = face.glyph_hor_advance(glyph)?;
                Some(f32::from(advance) / f32::from(face.units_per_em()) * 1000.0)
            })
            .unwrap_or(DEFAULT_WIDTH);
        self.cache.borrow_mut().insert(c, width);
        width
    }
}
