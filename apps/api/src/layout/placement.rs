use crate::layout::fit::{FitResult, LayoutConfig};

/// Fraction of a line height each line is nudged upward to compensate for
/// anchoring glyphs on the vertical middle of the em box.
const BASELINE_CORRECTION: f32 = 0.1;

/// Vertical center (in canvas pixels) of every line in `fit`, top to bottom.
/// The block is centered in the canvas; horizontal placement is always the
/// canvas center and is left to the renderer.
pub fn line_centers(fit: &FitResult, config: &LayoutConfig) -> Vec<f32> {
    let line_height = fit.line_height_px;
    let total_text_height = fit.lines.len() as f32 * line_height;
    let start_y = (config.canvas_height as f32 - total_text_height) / 2.0 + line_height / 2.0;
    (0..fit.lines.len())
        .map(|index| start_y + index as f32 * line_height - line_height * BASELINE_CORRECTION)
        .collect()
}
