use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::layout::LayoutConfig;

pub const DEFAULT_GOOGLE_TRANSLATE_URL: &str = "https://translate.googleapis.com/translate_a/single";
pub const DEFAULT_MYMEMORY_URL: &str = "https://api.mymemory.translated.net/get";

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub static_dir: PathBuf,
    /// Local font search path list, in lookup order.
    pub font_dirs: Vec<PathBuf>,
    /// Where remotely fetched fonts are written and looked up again on restart.
    pub font_cache_dir: PathBuf,
    pub font_remote_fetch: bool,
    pub layout: LayoutConfig,
    pub transliteration_timeout: Duration,
    pub google_translate_url: String,
    pub mymemory_url: String,
    pub mymemory_enabled: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = LayoutConfig::default();
        let layout = LayoutConfig {
            canvas_width: parse_env("CANVAS_WIDTH", defaults.canvas_width)?,
            canvas_height: parse_env("CANVAS_HEIGHT", defaults.canvas_height)?,
            width_padding: parse_env("WIDTH_PADDING", defaults.width_padding)?,
            vertical_margin: parse_env("VERTICAL_MARGIN", defaults.vertical_margin)?,
            min_font_size: parse_env("MIN_FONT_SIZE", defaults.min_font_size)?,
            font_size_step: parse_env("FONT_SIZE_STEP", defaults.font_size_step)?,
            max_font_size_ratio: parse_env("MAX_FONT_SIZE_RATIO", defaults.max_font_size_ratio)?,
            line_height_ratio: parse_env("LINE_HEIGHT_RATIO", defaults.line_height_ratio)?,
        };
        layout.validate()?;

        let font_dirs = std::env::var("FONT_DIRS")
            .map(|raw| std::env::split_paths(&raw).collect::<Vec<_>>())
            .unwrap_or_else(|_| vec![PathBuf::from("fonts")]);

        Ok(Config {
            port: parse_env("PORT", 3000)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            static_dir: std::env::var("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("public")),
            font_dirs,
            font_cache_dir: std::env::var("FONT_CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| std::env::temp_dir().join("text-to-png-fonts")),
            font_remote_fetch: parse_env("FONT_REMOTE_FETCH", true)?,
            layout,
            transliteration_timeout: Duration::from_millis(parse_env(
                "TRANSLITERATION_TIMEOUT_MS",
                5000u64,
            )?),
            google_translate_url: std::env::var("GOOGLE_TRANSLATE_URL")
                .unwrap_or_else(|_| DEFAULT_GOOGLE_TRANSLATE_URL.to_string()),
            mymemory_url: std::env::var("MYMEMORY_URL")
                .unwrap_or_else(|_| DEFAULT_MYMEMORY_URL.to_string()),
            mymemory_enabled: parse_env("MYMEMORY_ENABLED", true)?,
        })
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        _ => Ok(default),
    }
}
