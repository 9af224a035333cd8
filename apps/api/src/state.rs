use std::sync::Arc;

use crate::config::Config;
use crate::fonts::FontService;
use crate::transliteration::Transliterator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Registered fonts plus lazy fetching of missing language families.
    pub fonts: Arc<FontService>,
    /// Strategy chain. Built from config; tests swap in scripted backends.
    pub transliterator: Arc<Transliterator>,
}
