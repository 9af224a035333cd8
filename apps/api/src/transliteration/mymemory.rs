use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::models::Language;
use crate::transliteration::{TranslateError, TranslationBackend, SOURCE_LANGUAGE};

/// Client for the MyMemory `get` endpoint.
#[derive(Clone)]
pub struct MyMemoryClient {
    client: Client,
    url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MyMemoryResponse {
    #[serde(default)]
    response_data: Option<ResponseData>,
    /// Reported as a number on success and sometimes as a string on errors.
    #[serde(default)]
    response_status: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseData {
    #[serde(default)]
    translated_text: Option<String>,
}

impl MyMemoryResponse {
    fn status(&self) -> Option<u16> {
        match &self.response_status {
            Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    fn into_translation(self) -> Result<Option<String>, TranslateError> {
        match self.status() {
            Some(200) => Ok(self
                .response_data
                .and_then(|data| data.translated_text)
                .filter(|text| !text.trim().is_empty())),
            Some(code) => Err(TranslateError::Status(code)),
            None => Err(TranslateError::Malformed("missing responseStatus".to_string())),
        }
    }
}

impl MyMemoryClient {
    pub fn new(url: String, timeout: Duration) -> Result<Self, TranslateError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            url,
        })
    }
}

#[async_trait]
impl TranslationBackend for MyMemoryClient {
    async fn translate(&self, text: &str, target: Language) -> Result<Option<String>, TranslateError> {
        let langpair = format!("{SOURCE_LANGUAGE}|{}", target.code());
        let response = self
            .client
            .get(&self.url)
            .query(&[("q", text), ("langpair", langpair.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TranslateError::Status(status.as_u16()));
        }

        let body: MyMemoryResponse = response.json().await?;
        let translated = body.into_translation()?;
        debug!(%target, found = translated.is_some(), "MyMemory responded");
        Ok(translated)
    }
}
