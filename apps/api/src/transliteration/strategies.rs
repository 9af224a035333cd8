use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::models::Language;
use crate::transliteration::TranslationBackend;

/// Phrase that gives short names enough context to be converted.
const SENTENCE_PREFIX: &str = "My name is ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StrategyOutcome {
    Accepted(String),
    NoResult,
}

/// One step of the resolver chain. Implementations swallow their own errors.
#[async_trait]
pub trait TransliterationStrategy: Send + Sync {
    fn name(&self) -> &'static str;
    async fn attempt(&self, text: &str, target: Language) -> StrategyOutcome;
}

/// Calls `backend`, mapping errors and empty answers to `None`.
async fn query(
    backend: &dyn TranslationBackend,
    strategy: &'static str,
    text: &str,
    target: Language,
) -> Option<String> {
    match backend.translate(text, target).await {
        Ok(Some(result)) if !result.trim().is_empty() => Some(result),
        Ok(_) => {
            debug!(strategy, "Service returned no translation");
            None
        }
        Err(e) => {
            warn!(strategy, "Transliteration request failed: {e}");
            None
        }
    }
}

/// Submits the text as-is. The service echoes words it cannot convert, so a
/// result that only differs in case counts as no result.
pub struct DirectStrategy {
    backend: Arc<dyn TranslationBackend>,
}

impl DirectStrategy {
    pub fn new(backend: Arc<dyn TranslationBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl TransliterationStrategy for DirectStrategy {
    fn name(&self) -> &'static str {
        "direct"
    }

    async fn attempt(&self, text: &str, target: Language) -> StrategyOutcome {
        match query(self.backend.as_ref(), self.name(), text, target).await {
            Some(result) if result.to_lowercase() != text.to_lowercase() => {
                StrategyOutcome::Accepted(result)
            }
            Some(_) => {
                debug!("Direct translation echoed the input");
                StrategyOutcome::NoResult
            }
            None => StrategyOutcome::NoResult,
        }
    }
}

/// Submits "My name is <text>" and keeps the last word of the translation.
pub struct SentenceStrategy {
    backend: Arc<dyn TranslationBackend>,
}

impl SentenceStrategy {
    pub fn new(backend: Arc<dyn TranslationBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl TransliterationStrategy for SentenceStrategy {
    fn name(&self) -> &'static str {
        "sentence"
    }

    async fn attempt(&self, text: &str, target: Language) -> StrategyOutcome {
        let sentence = format!("{SENTENCE_PREFIX}{text}");
        query(self.backend.as_ref(), self.name(), &sentence, target)
            .await
            .and_then(|translated| last_word(&translated).map(str::to_string))
            .map_or(StrategyOutcome::NoResult, StrategyOutcome::Accepted)
    }
}

/// An independent service, tried when the primary one had nothing.
pub struct SecondaryServiceStrategy {
    backend: Arc<dyn TranslationBackend>,
}

impl SecondaryServiceStrategy {
    pub fn new(backend: Arc<dyn TranslationBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl TransliterationStrategy for SecondaryServiceStrategy {
    fn name(&self) -> &'static str {
        "secondary"
    }

    async fn attempt(&self, text: &str, target: Language) -> StrategyOutcome {
        query(self.backend.as_ref(), self.name(), text, target)
            .await
            .map_or(StrategyOutcome::NoResult, StrategyOutcome::Accepted)
    }
}

fn last_word(phrase: &str) -> Option<&str> {
    phrase.split_whitespace().last()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transliteration::testing::{Reply, ScriptedBackend};

    #[test]
    fn test_last_word_handles_extra_whitespace() {
        assert_eq!(last_word("내 이름은  아비나시 "), Some("아비나시"));
        assert_eq!(last_word("   "), None);
    }

    #[tokio::test]
    async fn test_direct_rejects_case_only_difference() {
        let backend = ScriptedBackend::new(vec![Reply::Text("AVINASH")]);
        let outcome = DirectStrategy::new(backend).attempt("avinash", Language::Hi).await;
        assert_eq!(outcome, StrategyOutcome::NoResult);
    }

    #[tokio::test]
    async fn test_direct_accepts_converted_text() {
        let backend = ScriptedBackend::new(vec![Reply::Text("아비나시")]);
        let outcome = DirectStrategy::new(backend).attempt("avinash", Language::Ko).await;
        assert_eq!(outcome, StrategyOutcome::Accepted("아비나시".to_string()));
    }

    #[tokio::test]
    async fn test_direct_rejects_blank_result() {
        let backend = ScriptedBackend::new(vec![Reply::Text("  ")]);
        let outcome = DirectStrategy::new(backend).attempt("avinash", Language::Ko).await;
        assert_eq!(outcome, StrategyOutcome::NoResult);
    }

    #[tokio::test]
    async fn test_sentence_wraps_input_and_takes_last_token() {
        let backend = ScriptedBackend::new(vec![Reply::Text("اسمي أفيناش")]);
        let outcome = SentenceStrategy::new(backend.clone())
            .attempt("avinash", Language::Ar)
            .await;
        assert_eq!(outcome, StrategyOutcome::Accepted("أفيناش".to_string()));
        assert_eq!(backend.calls(), vec!["My name is avinash"]);
    }

    #[tokio::test]
    async fn test_sentence_failure_is_no_result() {
        let backend = ScriptedBackend::new(vec![Reply::Fail]);
        let outcome = SentenceStrategy::new(backend).attempt("avinash", Language::Ar).await;
        assert_eq!(outcome, StrategyOutcome::NoResult);
    }

    #[tokio::test]
    async fn test_secondary_accepts_any_non_empty_answer() {
        let backend = ScriptedBackend::new(vec![Reply::Text("avinash")]);
        let outcome = SecondaryServiceStrategy::new(backend)
            .attempt("avinash", Language::Mr)
            .await;
        assert_eq!(outcome, StrategyOutcome::Accepted("avinash".to_string()));
    }

    #[tokio::test]
    async fn test_secondary_empty_answer_is_no_result() {
        let backend = ScriptedBackend::new(vec![Reply::Empty]);
        let outcome = SecondaryServiceStrategy::new(backend)
            .attempt("avinash", Language::Mr)
            .await;
        assert_eq!(outcome, StrategyOutcome::NoResult);
    }
}
