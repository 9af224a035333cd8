use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::models::Language;
use crate::transliteration::{TranslateError, TranslationBackend, SOURCE_LANGUAGE};

/// Client for the public `translate_a/single` endpoint (`client=gtx`).
/// Keyless, so requests can be refused at any time; callers treat every
/// error as "no result".
#[derive(Clone)]
pub struct GoogleTranslateClient {
    client: Client,
    url: String,
}

impl GoogleTranslateClient {
    pub fn new(url: String, timeout: Duration) -> Result<Self, TranslateError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            url,
        })
    }
}

#[async_trait]
impl TranslationBackend for GoogleTranslateClient {
    async fn translate(&self, text: &str, target: Language) -> Result<Option<String>, TranslateError> {
        let response = self
            .client
            .get(&self.url)
            .query(&[
                ("client", "gtx"),
                ("sl", SOURCE_LANGUAGE),
                ("tl", target.code()),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TranslateError::Status(status.as_u16()));
        }

        let body: Value = response.json().await?;
        let translated = parse_response(&body)?;
        debug!(%target, found = translated.is_some(), "Google translate responded");
        Ok(translated)
    }
}

/// The body is a nested array; `body[0]` holds one `[translated, source, ..]`
/// entry per sentence segment. Segments are concatenated in order.
fn parse_response(body: &Value) -> Result<Option<String>, TranslateError> {
    let segments = body
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| TranslateError::Malformed("missing segment list".to_string()))?;

    let translated: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect();

    Ok(Some(translated).filter(|t| !t.trim().is_empty()))
}
