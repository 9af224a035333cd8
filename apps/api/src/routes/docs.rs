use axum::Json;
use serde_json::{json, Value};

use crate::models::Language;
use crate::models::render::{DEFAULT_BACKGROUND_COLOR, DEFAULT_FONT_SIZE_PX, DEFAULT_TEXT_COLOR};

/// GET /api
/// Static description of the public endpoints.
pub async fn api_docs_handler() -> Json<Value> {
    let languages = Language::valid_codes();
    Json(json!({
        "name": "Text to PNG API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "GET /api/text-to-png": {
                "description": "Convert name to PNG image with transliteration",
                "parameters": {
                    "text": "(required) Name in English, e.g. \"avinash\"",
                    "lang": format!("(optional) Target language: {languages} (default: en)"),
                    "fontSize": format!("(optional) Font size in pixels (default: {DEFAULT_FONT_SIZE_PX})"),
                    "color": format!("(optional) Text color hex without # (default: {DEFAULT_TEXT_COLOR})"),
                    "bg": format!("(optional) Background color hex without # (default: {DEFAULT_BACKGROUND_COLOR})"),
                    "transparent": "(optional) \"true\" for transparent bg (default: false)"
                },
                "returns": "PNG image",
                "example": "/api/text-to-png?text=avinash&lang=hi&fontSize=80"
            },
            "GET /api/transliterate": {
                "description": "Get transliterated text as JSON",
                "parameters": {
                    "text": "(required) Name in English",
                    "lang": "(optional) Target language code (default: en)"
                },
                "returns": "JSON { original, transliterated, language }",
                "example": "/api/transliterate?text=avinash&lang=ko"
            }
        }
    }))
}
