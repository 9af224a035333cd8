// Text-to-image pipeline: transliterate, pick a face, fit the text to the
// fixed canvas, rasterize. Fitting and rasterizing are CPU-bound and run
// inside tokio::task::spawn_blocking.

pub mod canvas;
pub mod handlers;

use bytes::Bytes;
use tracing::info;

use crate::errors::AppError;
use crate::layout::{fit, split_lines, EstimatedMetrics, FitResult};
use crate::models::RenderRequest;
use crate::state::AppState;

pub use canvas::{RenderError, Style};

/// Encoded image plus what was actually drawn.
#[derive(Debug, Clone)]
pub struct RenderedImage {
    pub png: Bytes,
    pub transliterated: String,
    pub font_family: String,
    pub fit: FitResult,
}

pub async fn render_text(state: &AppState, request: &RenderRequest) -> Result<RenderedImage, AppError> {
    let transliterated = state
        .transliterator
        .resolve(&request.source_text, request.language)
        .await;
    let resolved = state.fonts.resolve(request.language).await;

    let lines = split_lines(&transliterated);
    let layout = state.config.layout.clone();
    let requested = request.requested_font_size_px;
    let style = Style {
        text_color: request.text_color,
        background_color: request.background_color,
        transparent_background: request.transparent_background,
    };
    let font = resolved.font.clone();

    let (fit_result, png) = tokio::task::spawn_blocking(move || {
        let fit_result = match font.as_deref() {
            Some(face) => fit(&lines, face, requested, &layout),
            None => fit(&lines, &EstimatedMetrics, requested, &layout),
        };
        let png = canvas::draw(&fit_result, font.as_deref(), &style, &layout)?;
        Ok::<_, RenderError>((fit_result, png))
    })
    .await
    .map_err(|e| RenderError::Worker(e.to_string()))??;

    info!(
        language = %request.language,
        font = %resolved.family,
        font_size_px = fit_result.font_size_px,
        lines = fit_result.lines.len(),
        fits = fit_result.fits,
        "Rendered {:?} as {:?}",
        request.source_text,
        transliterated
    );

    Ok(RenderedImage {
        png: Bytes::from(png),
        transliterated,
        font_family: resolved.family,
        fit: fit_result,
    })
}
