use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Target writing systems the service can render.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Identity language: text passes through untouched.
    #[default]
    En,
    Ko,
    Hi,
    Mr,
    Gu,
    Ar,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid language: {0}. Valid options: {valid}", valid = Language::valid_codes())]
pub struct UnknownLanguage(pub String);

impl Language {
    pub const ALL: [Language; 6] = [
        Language::En,
        Language::Ko,
        Language::Hi,
        Language::Mr,
        Language::Gu,
        Language::Ar,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ko => "ko",
            Language::Hi => "hi",
            Language::Mr => "mr",
            Language::Gu => "gu",
            Language::Ar => "ar",
        }
    }

    pub fn is_identity(self) -> bool {
        self == Language::En
    }

    /// Comma-separated list used in validation messages.
    pub fn valid_codes() -> String {
        Self::ALL
            .iter()
            .map(|lang| lang.code())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|lang| lang.code() == s)
            .ok_or_else(|| UnknownLanguage(s.to_string()))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_code_round_trips_through_from_str() {
        for lang in Language::ALL {
            assert_eq!(lang.code().parse::<Language>(), Ok(lang));
        }
    }

    #[test]
    fn test_codes_are_case_sensitive() {
        assert!("HI".parse::<Language>().is_err());
    }

    #[test]
    fn test_unknown_language_message_lists_valid_options() {
        let err = "xx".parse::<Language>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid language: xx. Valid options: en, ko, hi, mr, gu, ar"
        );
    }

    #[test]
    fn test_only_english_is_identity() {
        let identity: Vec<_> = Language::ALL.iter().filter(|l| l.is_identity()).collect();
        assert_eq!(identity, vec![&Language::En]);
    }
}
