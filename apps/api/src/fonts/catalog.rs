//! Static language → font family table and where each family's file lives.

use std::path::PathBuf;

use crate::models::Language;

/// Family used for Latin text and for any language whose own font is missing.
pub const BASE_FAMILY: &str = "Samsung Sharp Sans";
/// Broad-coverage face tried after the base family.
pub const GLOBAL_FALLBACK_FAMILY: &str = "Global Font";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontBinding {
    pub family: &'static str,
    pub file_name: &'static str,
    /// Upstream download location for fonts that are not bundled.
    pub url: Option<&'static str>,
}

pub const CATALOG: &[FontBinding] = &[
    FontBinding {
        family: BASE_FAMILY,
        file_name: "samsungsharpsans-medium.otf",
        url: None,
    },
    FontBinding {
        family: GLOBAL_FALLBACK_FAMILY,
        file_name: "global.ttf",
        url: None,
    },
    FontBinding {
        family: "Noto Sans Devanagari",
        file_name: "NotoSansDevanagari-Bold.ttf",
        url: Some("https://github.com/google/fonts/raw/main/ofl/notosansdevanagari/NotoSansDevanagari-Bold.ttf"),
    },
    FontBinding {
        family: "Noto Sans Gujarati",
        file_name: "NotoSansGujarati-Bold.ttf",
        url: Some("https://github.com/google/fonts/raw/main/ofl/notosansgujarati/NotoSansGujarati-Bold.ttf"),
    },
    FontBinding {
        family: "Noto Sans Arabic",
        file_name: "NotoSansArabic-Bold.ttf",
        url: Some("https://github.com/google/fonts/raw/main/ofl/notosansarabic/NotoSansArabic-Bold.ttf"),
    },
    FontBinding {
        family: "Noto Sans KR",
        file_name: "NotoSansKR-Bold.ttf",
        url: Some("https://github.com/google/fonts/raw/main/ofl/notosanskr/NotoSansKR-Bold.ttf"),
    },
];

/// Family that renders `language`'s script.
pub fn family_for(language: Language) -> &'static str {
    match language {
        Language::Hi | Language::Mr => "Noto Sans Devanagari",
        Language::Gu => "Noto Sans Gujarati",
        Language::Ar => "Noto Sans Arabic",
        Language::Ko => "Noto Sans KR",
        Language::En => BASE_FAMILY,
    }
}

pub fn binding_for(family: &str) -> Option<&'static FontBinding> {
    CATALOG.iter().find(|binding| binding.family == family)
}

/// First directory in `dirs` that contains the binding's file.
pub fn locate(binding: &FontBinding, dirs: &[PathBuf]) -> Option<PathBuf> {
    dirs.iter()
        .map(|dir| dir.join(binding.file_name))
        .find(|path| path.is_file())
}
