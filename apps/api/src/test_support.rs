//! Shared fixtures for unit tests.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::fonts::{FontRegistry, FontService, LoadedFont};
use crate::layout::LayoutConfig;
use crate::state::AppState;
use crate::transliteration::Transliterator;

/// Common locations of a Latin TrueType face on CI images and dev machines.
const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

pub fn system_font_path() -> Option<PathBuf> {
    SYSTEM_FONT_CANDIDATES
        .iter()
        .map(Path::new)
        .find(|path| path.is_file())
        .map(Path::to_path_buf)
}

/// A real face registered under `family`, or `None` when the machine has
/// none of the candidates. Tests that need glyph outlines skip in that case.
pub fn system_font(family: &str) -> Option<LoadedFont> {
    let path = system_font_path()?;
    LoadedFont::from_path(family, &path).ok()
}

pub fn test_config() -> Config {
    Config {
        port: 0,
        rust_log: "debug".to_string(),
        static_dir: PathBuf::from("public"),
        font_dirs: Vec::new(),
        font_cache_dir: std::env::temp_dir().join("text-to-png-api-tests"),
        font_remote_fetch: false,
        layout: LayoutConfig::default(),
        transliteration_timeout: Duration::from_millis(200),
        google_translate_url: "http://127.0.0.1:9/unused".to_string(),
        mymemory_url: "http://127.0.0.1:9/unused".to_string(),
        mymemory_enabled: false,
    }
}

/// State with no registered fonts and the given resolver.
pub fn test_state(transliterator: Transliterator) -> AppState {
    let config = test_config();
    let fonts = FontService::new(Arc::new(FontRegistry::new()), &config);
    AppState {
        config,
        fonts: Arc::new(fonts),
        transliterator: Arc::new(transliterator),
    }
}
