//! Glyph runs for a single line, and how wide they are.
//!
//! Lines are shaped with rustybuzz so joining scripts (Arabic) and conjunct
//! forming scripts (Devanagari, Gujarati) measure with the glyphs that are
//! actually drawn. Direction and script are guessed per line; there is no
//! bidi reordering across runs.

use rustybuzz::ttf_parser::GlyphId;
use rustybuzz::{Face, UnicodeBuffer};

use crate::fonts::LoadedFont;

/// One glyph with its origin relative to the line origin, in font units
/// (y grows upward).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapedGlyph {
    pub glyph_id: GlyphId,
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShapedLine {
    /// Visual (left to right) order.
    pub glyphs: Vec<ShapedGlyph>,
    pub advance: i32,
    pub units_per_em: i32,
}

/// Horizontal extent of a line in em units (1.0 == the font size).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InkExtent {
    /// Leftmost inked x relative to the pen origin. May be negative.
    pub left: f32,
    /// Rightmost inked x relative to the pen origin.
    pub right: f32,
    /// Total pen advance.
    pub advance: f32,
}

impl InkExtent {
    pub fn width(&self) -> f32 {
        (self.right - self.left).max(0.0)
    }

    pub fn center(&self) -> f32 {
        (self.left + self.right) / 2.0
    }
}

/// Anything that can report the ink extent of a line of text.
pub trait TextMeasure {
    fn ink_extent(&self, line: &str) -> InkExtent;
}

pub fn shape_line(face: &Face<'_>, line: &str) -> ShapedLine {
    let mut buffer = UnicodeBuffer::new();
    buffer.push_str(line);
    buffer.guess_segment_properties();
    let output = rustybuzz::shape(face, &[], buffer);

    let mut pen_x = 0i32;
    let mut pen_y = 0i32;
    let glyphs = output
        .glyph_infos()
        .iter()
        .zip(output.glyph_positions())
        .map(|(info, pos)| {
            let glyph = ShapedGlyph {
                glyph_id: GlyphId(info.glyph_id as u16),
                x: pen_x + pos.x_offset,
                y: pen_y + pos.y_offset,
            };
            pen_x += pos.x_advance;
            pen_y += pos.y_advance;
            glyph
        })
        .collect();

    ShapedLine {
        glyphs,
        advance: pen_x,
        units_per_em: face.units_per_em().max(1),
    }
}

/// Union of the glyph bounding boxes, i.e. the bearing-aware width rather
/// than the sum of advances. A line without inked glyphs has zero width.
pub fn shaped_ink_extent(face: &Face<'_>, shaped: &ShapedLine) -> InkExtent {
    let units = shaped.units_per_em as f32;
    let mut bounds: Option<(i32, i32)> = None;
    for glyph in &shaped.glyphs {
        let Some(bbox) = face.glyph_bounding_box(glyph.glyph_id) else {
            continue;
        };
        let left = glyph.x + bbox.x_min as i32;
        let right = glyph.x + bbox.x_max as i32;
        bounds = Some(match bounds {
            Some((l, r)) => (l.min(left), r.max(right)),
            None => (left, right),
        });
    }
    let (left, right) = bounds.unwrap_or((0, 0));
    InkExtent {
        left: left as f32 / units,
        right: right as f32 / units,
        advance: shaped.advance as f32 / units,
    }
}

impl TextMeasure for LoadedFont {
    fn ink_extent(&self, line: &str) -> InkExtent {
        match self.face() {
            Some(face) => shaped_ink_extent(&face, &shape_line(&face, line)),
            None => EstimatedMetrics.ink_extent(line),
        }
    }
}

/// Per-character width guesses used when no face is available at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct EstimatedMetrics;

impl EstimatedMetrics {
    pub fn char_width(ch: char) -> f32 {
        if ch.is_whitespace() {
            0.25
        } else if ch.is_ascii_alphanumeric() {
            0.55
        } else if ch.is_ascii() {
            0.35
        } else if matches!(
            ch as u32,
            0x1100..=0x11FF | 0x3040..=0x30FF | 0x3130..=0x318F | 0x4E00..=0x9FFF | 0xAC00..=0xD7AF
        ) {
            // Hangul, kana, CJK ideographs: full width.
            1.0
        } else {
            0.9
        }
    }
}

impl TextMeasure for EstimatedMetrics {
    fn ink_extent(&self, line: &str) -> InkExtent {
        let advance: f32 = line.chars().map(Self::char_width).sum();
        let leading: f32 = line
            .chars()
            .take_while(|c| c.is_whitespace())
            .map(Self::char_width)
            .sum();
        let trailing: f32 = line
            .chars()
            .rev()
            .take_while(|c| c.is_whitespace())
            .map(Self::char_width)
            .sum();
        if leading >= advance {
            return InkExtent {
                left: 0.0,
                right: 0.0,
                advance,
            };
        }
        InkExtent {
            left: leading,
            right: advance - trailing,
            advance,
        }
    }
}
