//! Rasterizes a fitted layout onto the fixed canvas and encodes it as PNG.
//!
//! Glyph outlines come straight from the face through ttf-parser's
//! `OutlineBuilder` and are filled with tiny-skia. Coordinates are built in
//! font units (y up) for a whole line and mapped to canvas pixels with one
//! transform per line.

use rustybuzz::ttf_parser::OutlineBuilder;
use rustybuzz::Face;
use thiserror::Error;
use tiny_skia::{Color, FillRule, Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};

use crate::fonts::LoadedFont;
use crate::layout::shaping::{shape_line, shaped_ink_extent, ShapedLine};
use crate::layout::{line_centers, EstimatedMetrics, FitResult, LayoutConfig, TextMeasure};
use crate::models::Rgb;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("could not allocate a {width}x{height} pixmap")]
    PixmapAllocation { width: u32, height: u32 },

    #[error("PNG encoding failed: {0}")]
    Encode(String),

    #[error("render worker failed: {0}")]
    Worker(String),
}

/// Colors for one render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    pub text_color: Rgb,
    pub background_color: Rgb,
    /// Leaves the canvas fully transparent instead of filling the background.
    pub transparent_background: bool,
}

/// Draws every line of `fit` and returns the encoded PNG.
/// Without a usable face each inked character is drawn as an outline box.
pub fn draw(
    fit: &FitResult,
    font: Option<&LoadedFont>,
    style: &Style,
    config: &LayoutConfig,
) -> Result<Vec<u8>, RenderError> {
    let (width, height) = (config.canvas_width, config.canvas_height);
    let mut pixmap =
        Pixmap::new(width, height).ok_or(RenderError::PixmapAllocation { width, height })?;

    if !style.transparent_background {
        let Rgb(r, g, b) = style.background_color;
        pixmap.fill(Color::from_rgba8(r, g, b, 255));
    }

    let mut paint = Paint::default();
    let Rgb(r, g, b) = style.text_color;
    paint.set_color_rgba8(r, g, b, 255);
    paint.anti_alias = true;

    let size = fit.font_size_px as f32;
    let centers = line_centers(fit, config);
    let face = font.and_then(LoadedFont::face);

    for (line, &center_y) in fit.lines.iter().zip(&centers) {
        match &face {
            Some(face) => draw_shaped_line(&mut pixmap, &paint, face, line, size, center_y),
            None => draw_placeholder_line(&mut pixmap, &paint, line, size, center_y),
        }
    }

    pixmap
        .encode_png()
        .map_err(|e| RenderError::Encode(e.to_string()))
}

fn draw_shaped_line(
    pixmap: &mut Pixmap,
    paint: &Paint<'_>,
    face: &Face<'_>,
    line: &str,
    size: f32,
    center_y: f32,
) {
    let shaped = shape_line(face, line);
    let Some(path) = line_path(face, &shaped) else {
        return;
    };

    let scale = size / shaped.units_per_em as f32;
    let extent = shaped_ink_extent(face, &shaped);
    let origin_x = pixmap.width() as f32 / 2.0 - extent.center() * size;
    // Puts the middle of the ascender/descender box on the line center.
    let em_middle = (face.ascender() as f32 + face.descender() as f32) / 2.0;
    let baseline = center_y + em_middle * scale;

    let transform = Transform::from_row(scale, 0.0, 0.0, -scale, origin_x, baseline);
    pixmap.fill_path(&path, paint, FillRule::Winding, transform, None);
}

/// All glyph outlines of a shaped line as one path, in font units.
fn line_path(face: &Face<'_>, shaped: &ShapedLine) -> Option<tiny_skia::Path> {
    let mut builder = PathBuilder::new();
    for glyph in &shaped.glyphs {
        let mut pen = GlyphPen {
            builder: &mut builder,
            dx: glyph.x as f32,
            dy: glyph.y as f32,
        };
        face.outline_glyph(glyph.glyph_id, &mut pen);
    }
    builder.finish()
}

/// Forwards outline segments to a tiny-skia path, offset to the glyph origin.
struct GlyphPen<'a> {
    builder: &'a mut PathBuilder,
    dx: f32,
    dy: f32,
}

impl OutlineBuilder for GlyphPen<'_> {
    fn move_to(&mut self, x: f32, y: f32) {
        self.builder.move_to(x + self.dx, y + self.dy);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.builder.line_to(x + self.dx, y + self.dy);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.builder
            .quad_to(x1 + self.dx, y1 + self.dy, x + self.dx, y + self.dy);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.builder.cubic_to(
            x1 + self.dx,
            y1 + self.dy,
            x2 + self.dx,
            y2 + self.dy,
            x + self.dx,
            y + self.dy,
        );
    }

    fn close(&mut self) {
        self.builder.close();
    }
}

/// Tofu: one stroked box per visible character, sized from the estimated widths.
fn draw_placeholder_line(pixmap: &mut Pixmap, paint: &Paint<'_>, line: &str, size: f32, center_y: f32) {
    let extent = EstimatedMetrics.ink_extent(line);
    let mut pen_x = pixmap.width() as f32 / 2.0 - extent.center() * size;
    let box_height = size * 0.7;
    let stroke = Stroke {
        width: (size / 16.0).max(1.0),
        ..Stroke::default()
    };

    for ch in line.chars() {
        let advance = EstimatedMetrics::char_width(ch) * size;
        if !ch.is_whitespace() {
            let box_width = advance * 0.8;
            let rect = Rect::from_xywh(
                pen_x + (advance - box_width) / 2.0,
                center_y - box_height / 2.0,
                box_width,
                box_height,
            );
            if let Some(rect) = rect {
                let path = PathBuilder::from_rect(rect);
                pixmap.stroke_path(&path, paint, &stroke, Transform::identity(), None);
            }
        }
        pen_x += advance;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{fit, split_lines};
    use crate::test_support::system_font;

    fn style() -> Style {
        Style {
            text_color: Rgb(255, 255, 255),
            background_color: Rgb(0, 0, 0),
            transparent_background: false,
        }
    }

    fn decode(png: &[u8]) -> Pixmap {
        Pixmap::decode_png(png).unwrap()
    }

    /// Number of pixels whose red channel is set.
    fn lit_pixels(pixmap: &Pixmap) -> usize {
        pixmap.pixels().iter().filter(|p| p.red() > 0).count()
    }

    #[test]
    fn test_canvas_has_fixed_dimensions() {
        let config = LayoutConfig::default();
        let result = fit(&split_lines("avinash"), &EstimatedMetrics, 64, &config);
        let png = draw(&result, None, &style(), &config).unwrap();
        let pixmap = decode(&png);
        assert_eq!((pixmap.width(), pixmap.height()), (240, 60));
    }

    #[test]
    fn test_png_signature() {
        let config = LayoutConfig::default();
        let result = fit(&split_lines("a"), &EstimatedMetrics, 20, &config);
        let png = draw(&result, None, &style(), &config).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_background_is_filled_when_opaque() {
        let config = LayoutConfig::default();
        let result = fit(&split_lines(" "), &EstimatedMetrics, 20, &config);
        let style = Style {
            background_color: Rgb(0x12, 0x34, 0x56),
            ..style()
        };
        let pixmap = decode(&draw(&result, None, &style, &config).unwrap());
        let corner = pixmap.pixel(0, 0).unwrap();
        assert_eq!(
            (corner.red(), corner.green(), corner.blue(), corner.alpha()),
            (0x12, 0x34, 0x56, 255)
        );
    }

    #[test]
    fn test_transparent_background_leaves_corners_clear() {
        let config = LayoutConfig::default();
        let result = fit(&split_lines("avinash"), &EstimatedMetrics, 20, &config);
        let style = Style {
            transparent_background: true,
            ..style()
        };
        let pixmap = decode(&draw(&result, None, &style, &config).unwrap());
        assert_eq!(pixmap.pixel(0, 0).unwrap().alpha(), 0);
        assert_eq!(pixmap.pixel(239, 59).unwrap().alpha(), 0);
    }

    #[test]
    fn test_placeholder_boxes_are_drawn_without_font() {
        let config = LayoutConfig::default();
        let result = fit(&split_lines("अविनाश"), &EstimatedMetrics, 40, &config);
        let pixmap = decode(&draw(&result, None, &style(), &config).unwrap());
        assert!(lit_pixels(&pixmap) > 0);
    }

    #[test]
    fn test_glyphs_are_drawn_and_centered() {
        let Some(font) = system_font("Test") else {
            return;
        };
        let config = LayoutConfig::default();
        let result = fit(&split_lines("avinash"), &font, 64, &config);
        let pixmap = decode(&draw(&result, Some(&font), &style(), &config).unwrap());

        let lit: Vec<(u32, u32)> = (0..pixmap.height())
            .flat_map(|y| (0..pixmap.width()).map(move |x| (x, y)))
            .filter(|&(x, y)| pixmap.pixel(x, y).is_some_and(|p| p.red() > 127))
            .collect();
        assert!(!lit.is_empty());

        let min_x = lit.iter().map(|p| p.0).min().unwrap();
        let max_x = lit.iter().map(|p| p.0).max().unwrap();
        let ink_center = (min_x + max_x) as f32 / 2.0;
        assert!((ink_center - 120.0).abs() <= 3.0, "ink center {ink_center}");
        // Width stays inside the padded area.
        assert!(max_x - min_x <= 222);
    }
}
