use axum::extract::{rejection::QueryRejection, Query};
use axum::http::HeaderValue;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::errors::AppError;
use crate::models::language::{Language, UnknownLanguage};

/// Everything except the characters JavaScript's `encodeURIComponent` keeps.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Unwraps a query extraction, reporting a malformed query string as a
/// JSON validation error instead of axum's plain-text rejection.
pub fn query<T>(extracted: Result<Query<T>, QueryRejection>) -> Result<T, AppError> {
    extracted
        .map(|Query(params)| params)
        .map_err(|rejection| AppError::Validation(rejection.body_text()))
}

/// `text` must be present and non-empty.
pub fn required_text(text: Option<String>) -> Result<String, AppError> {
    match text {
        Some(text) if !text.is_empty() => Ok(text),
        _ => Err(AppError::Validation(
            "Missing required parameter: text".to_string(),
        )),
    }
}

/// Absent `lang` means English; anything else must be a known code.
pub fn language(lang: Option<&str>) -> Result<Language, AppError> {
    match lang {
        None => Ok(Language::default()),
        Some(code) => code
            .parse()
            .map_err(|e: UnknownLanguage| AppError::Validation(e.to_string())),
    }
}

/// Header-safe form of arbitrary text.
pub fn encode_header_value(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

/// `value` as-is when it is a valid header value, percent-encoded otherwise.
pub fn verbatim_header_value(value: &str) -> String {
    if HeaderValue::from_str(value).is_ok() {
        value.to_string()
    } else {
        encode_header_value(value)
    }
}

/// Like [`verbatim_header_value`], but also encodes text that would break
/// out of a quoted `filename="..."` parameter.
pub fn filename_value(value: &str) -> String {
    if value.contains(['"', '\\']) {
        encode_header_value(value)
    } else {
        verbatim_header_value(value)
    }
}
