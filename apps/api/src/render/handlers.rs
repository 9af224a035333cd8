use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{header, HeaderMap, HeaderName, HeaderValue},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::render::{
    parse_color, parse_font_size, DEFAULT_BACKGROUND_COLOR, DEFAULT_TEXT_COLOR,
};
use crate::models::RenderRequest;
use crate::render::render_text;
use crate::routes::params::{
    encode_header_value, filename_value, language, query, required_text, verbatim_header_value,
};
use crate::state::AppState;

const X_ORIGINAL_TEXT: HeaderName = HeaderName::from_static("x-original-text");
const X_TRANSLITERATED_TEXT: HeaderName = HeaderName::from_static("x-transliterated-text");
const X_LANGUAGE: HeaderName = HeaderName::from_static("x-language");
const X_FONT_USED: HeaderName = HeaderName::from_static("x-font-used");

/// Raw query string values. Everything is optional here so that missing or
/// malformed values surface as our own validation errors or defaults.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextToPngQuery {
    pub text: Option<String>,
    pub lang: Option<String>,
    pub font_size: Option<String>,
    pub color: Option<String>,
    pub bg: Option<String>,
    pub transparent: Option<String>,
}

impl TextToPngQuery {
    pub fn into_request(self) -> Result<RenderRequest, AppError> {
        let source_text = required_text(self.text)?;
        let language = language(self.lang.as_deref())?;
        Ok(RenderRequest {
            source_text,
            language,
            requested_font_size_px: parse_font_size(self.font_size.as_deref()),
            text_color: parse_color(self.color.as_deref(), DEFAULT_TEXT_COLOR),
            background_color: parse_color(self.bg.as_deref(), DEFAULT_BACKGROUND_COLOR),
            transparent_background: self.transparent.as_deref() == Some("true"),
        })
    }
}

/// GET /api/text-to-png
pub async fn handle_text_to_png(
    State(state): State<AppState>,
    params: Result<Query<TextToPngQuery>, QueryRejection>,
) -> Result<Response, AppError> {
    let request = query(params)?.into_request()?;
    let image = render_text(&state, &request).await?;

    let filename = format!(
        "inline; filename=\"{}-{}.png\"",
        filename_value(&request.source_text),
        request.language
    );

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("image/png"));
    headers.insert(header::CONTENT_DISPOSITION, header_value(filename)?);
    headers.insert(
        X_ORIGINAL_TEXT,
        header_value(verbatim_header_value(&request.source_text))?,
    );
    headers.insert(
        X_TRANSLITERATED_TEXT,
        header_value(encode_header_value(&image.transliterated))?,
    );
    headers.insert(X_LANGUAGE, HeaderValue::from_static(request.language.code()));
    headers.insert(X_FONT_USED, header_value(image.font_family)?);

    Ok((headers, image.png).into_response())
}

fn header_value(value: String) -> Result<HeaderValue, AppError> {
    HeaderValue::try_from(value).map_err(|e| AppError::Internal(e.into()))
}
