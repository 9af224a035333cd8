use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::models::Language;
use crate::routes::params::{language, query, required_text};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TransliterateQuery {
    pub text: Option<String>,
    pub lang: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TransliterateResponse {
    pub original: String,
    pub transliterated: String,
    pub language: Language,
}

/// GET /api/transliterate
pub async fn handle_transliterate(
    State(state): State<AppState>,
    params: Result<Query<TransliterateQuery>, QueryRejection>,
) -> Result<Json<TransliterateResponse>, AppError> {
    let params = query(params)?;
    let original = required_text(params.text)?;
    let language = language(params.lang.as_deref())?;

    let transliterated = state.transliterator.resolve(&original, language).await;
    info!(%language, "Transliterated {original:?} → {transliterated:?}");

    Ok(Json(TransliterateResponse {
        original,
        transliterated,
        language,
    }))
}
