//! Transliteration resolver: converts a Latin-script name into the target
//! language's script by running an ordered chain of strategies against
//! external translation services.
//!
//! The resolver never fails. A strategy that errors, times out, or returns
//! an unusable answer yields `StrategyOutcome::NoResult` and the chain moves
//! on; when every strategy is exhausted the input comes back unchanged.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::models::Language;

pub mod google;
pub mod handlers;
pub mod mymemory;
pub mod strategies;

pub use google::GoogleTranslateClient;
pub use mymemory::MyMemoryClient;
pub use strategies::{
    DirectStrategy, SecondaryServiceStrategy, SentenceStrategy, StrategyOutcome,
    TransliterationStrategy,
};

/// Source language of every request.
pub const SOURCE_LANGUAGE: &str = "en";

#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("service returned status {0}")]
    Status(u16),

    #[error("unexpected response shape: {0}")]
    Malformed(String),
}

/// An external service that translates English text into `target`.
/// `Ok(None)` means the service answered but had nothing usable.
#[async_trait]
pub trait TranslationBackend: Send + Sync {
    async fn translate(&self, text: &str, target: Language)
        -> Result<Option<String>, TranslateError>;
}

pub struct Transliterator {
    strategies: Vec<Arc<dyn TransliterationStrategy>>,
    /// Upper bound on a single strategy attempt, on top of the HTTP client timeout.
    attempt_timeout: Duration,
}

impl Transliterator {
    pub fn new(strategies: Vec<Arc<dyn TransliterationStrategy>>, attempt_timeout: Duration) -> Self {
        Self {
            strategies,
            attempt_timeout,
        }
    }

    /// Direct → sentence-wrapped against Google, then MyMemory when enabled.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let google = Arc::new(GoogleTranslateClient::new(
            config.google_translate_url.clone(),
            config.transliteration_timeout,
        )?);
        let mut strategies: Vec<Arc<dyn TransliterationStrategy>> = vec![
            Arc::new(DirectStrategy::new(google.clone())),
            Arc::new(SentenceStrategy::new(google)),
        ];
        if config.mymemory_enabled {
            let mymemory = Arc::new(MyMemoryClient::new(
                config.mymemory_url.clone(),
                config.transliteration_timeout,
            )?);
            strategies.push(Arc::new(SecondaryServiceStrategy::new(mymemory)));
        }
        info!(
            "Transliteration chain: {}",
            strategies.iter().map(|s| s.name()).collect::<Vec<_>>().join(" → ")
        );
        Ok(Self::new(strategies, config.transliteration_timeout))
    }

    /// Best-effort transliteration of `text` into `language`'s script.
    pub async fn resolve(&self, text: &str, language: Language) -> String {
        if language.is_identity() {
            return text.to_string();
        }

        for strategy in &self.strategies {
            let outcome = tokio::time::timeout(self.attempt_timeout, strategy.attempt(text, language))
                .await
                .unwrap_or_else(|_| {
                    warn!(strategy = strategy.name(), "Transliteration attempt timed out");
                    StrategyOutcome::NoResult
                });
            match outcome {
                StrategyOutcome::Accepted(result) => {
                    debug!(strategy = strategy.name(), %language, "Transliteration accepted");
                    return result;
                }
                StrategyOutcome::NoResult => continue,
            }
        }

        debug!(%language, "All transliteration strategies exhausted; using original text");
        text.to_string()
    }
}
