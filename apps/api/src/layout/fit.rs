//! Auto-fit: the largest font size at which every line fits the fixed canvas.
//!
//! # Algorithm
//! 1. Start at `min(requested, canvas_height * max_font_size_ratio)`.
//! 2. At each size, the widest line's ink width must be within
//!    `canvas_width - width_padding` and `lines * size * line_height_ratio`
//!    within `canvas_height - vertical_margin`.
//! 3. Step down by `font_size_step` until both hold. The search never goes
//!    below `min_font_size`: at that floor the size is accepted even if the
//!    text still overflows.
//!
//! Widths scale linearly with size, so each line is measured once in em units.

use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

use crate::layout::shaping::TextMeasure;

/// Fixed output canvas and the tunables of the shrink search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Horizontal space reserved out of the canvas width (split across both sides).
    pub width_padding: u32,
    /// Vertical space reserved out of the canvas height.
    pub vertical_margin: u32,
    pub min_font_size: u32,
    pub font_size_step: u32,
    /// Upper bound on the starting size as a fraction of canvas height.
    pub max_font_size_ratio: f32,
    /// Line height as a multiple of the font size.
    pub line_height_ratio: f32,
}

impl Default for LayoutConfig {
    /// 240×60 canvas, 20px horizontal padding, 10px floor, 1.2 line height.
    fn default() -> Self {
        Self {
            canvas_width: 240,
            canvas_height: 60,
            width_padding: 20,
            vertical_margin: 5,
            min_font_size: 10,
            font_size_step: 2,
            max_font_size_ratio: 0.8,
            line_height_ratio: 1.2,
        }
    }
}

impl LayoutConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.canvas_width > 0 && self.canvas_height > 0,
            "canvas dimensions must be positive"
        );
        ensure!(self.min_font_size > 0, "MIN_FONT_SIZE must be positive");
        ensure!(self.font_size_step > 0, "FONT_SIZE_STEP must be positive");
        ensure!(
            self.max_font_size_ratio > 0.0 && self.max_font_size_ratio.is_finite(),
            "MAX_FONT_SIZE_RATIO must be positive"
        );
        ensure!(
            self.line_height_ratio > 0.0 && self.line_height_ratio.is_finite(),
            "LINE_HEIGHT_RATIO must be positive"
        );
        Ok(())
    }

    /// Cap applied to the requested size before the search starts.
    pub fn max_font_size(&self) -> u32 {
        ((self.canvas_height as f32 * self.max_font_size_ratio).floor() as u32).max(1)
    }

    fn available_width(&self) -> f32 {
        self.canvas_width.saturating_sub(self.width_padding) as f32
    }

    fn available_height(&self) -> f32 {
        self.canvas_height.saturating_sub(self.vertical_margin) as f32
    }
}

/// Outcome of one fit. Immutable; consumed by the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FitResult {
    pub font_size_px: u32,
    pub line_height_px: f32,
    /// The input lines, unmodified.
    pub lines: Vec<String>,
    /// False when the floor size was accepted without satisfying the bounds.
    pub fits: bool,
}

/// Splits on literal `\n` only; long lines are never wrapped.
pub fn split_lines(text: &str) -> Vec<String> {
    text.split('\n').map(str::to_string).collect()
}

pub fn fit<M>(lines: &[String], measure: &M, requested_size_px: u32, config: &LayoutConfig) -> FitResult
where
    M: TextMeasure + ?Sized,
{
    let widest_em = lines
        .iter()
        .map(|line| measure.ink_extent(line).width())
        .fold(0.0_f32, f32::max);
    let line_count = lines.len().max(1) as f32;

    let satisfies = |size: u32| {
        let size = size as f32;
        let max_line_width = widest_em * size;
        let total_text_height = line_count * size * config.line_height_ratio;
        max_line_width <= config.available_width() && total_text_height <= config.available_height()
    };

    let mut size = requested_size_px.min(config.max_font_size()).max(1);
    let mut fits = satisfies(size);
    while !fits && size > config.min_font_size {
        size = size
            .saturating_sub(config.font_size_step)
            .max(config.min_font_size);
        fits = satisfies(size);
    }

    FitResult {
        font_size_px: size,
        line_height_px: size as f32 * config.line_height_ratio,
        lines: lines.to_vec(),
        fits,
    }
}
