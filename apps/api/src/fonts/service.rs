//! Startup registration and per-request font resolution.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::fonts::catalog::{self, FontBinding, BASE_FAMILY, CATALOG, GLOBAL_FALLBACK_FAMILY};
use crate::fonts::registry::{FontError, FontLookup, FontRegistry, LoadedFont};
use crate::models::Language;

const FONT_DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(20);
/// A family whose download failed is not retried before this elapses.
const FETCH_RETRY_COOLDOWN: Duration = Duration::from_secs(300);

/// The face chosen for one request. `font` is `None` when neither the
/// language's family nor any fallback is registered.
#[derive(Clone)]
pub struct ResolvedFont {
    pub family: String,
    pub font: Option<Arc<LoadedFont>>,
}

pub struct FontService {
    registry: Arc<FontRegistry>,
    search_dirs: Vec<PathBuf>,
    cache_dir: PathBuf,
    http: Option<reqwest::Client>,
    failed_fetches: DashMap<&'static str, Instant>,
}

impl FontService {
    pub fn new(registry: Arc<FontRegistry>, config: &Config) -> Self {
        let http = if config.font_remote_fetch {
            reqwest::Client::builder()
                .timeout(FONT_DOWNLOAD_TIMEOUT)
                .build()
                .map_err(|e| warn!("Remote font fetching disabled: {e}"))
                .ok()
        } else {
            None
        };
        let mut search_dirs = config.font_dirs.clone();
        search_dirs.push(config.font_cache_dir.clone());
        Self {
            registry,
            search_dirs,
            cache_dir: config.font_cache_dir.clone(),
            http,
            failed_fetches: DashMap::new(),
        }
    }

    /// Registers every catalog font found on the local search path.
    /// Missing or unreadable files are logged and skipped.
    pub fn register_local_fonts(&self) -> usize {
        let mut registered = 0;
        for binding in CATALOG {
            let Some(path) = catalog::locate(binding, &self.search_dirs) else {
                warn!(family = binding.family, file = binding.file_name, "Font missing");
                continue;
            };
            match LoadedFont::from_path(binding.family, &path) {
                Ok(font) => {
                    if self.registry.register(font) {
                        info!(family = binding.family, path = %path.display(), "Loaded font");
                        registered += 1;
                    }
                }
                Err(e) => warn!(family = binding.family, "Font failed to load: {e}"),
            }
        }
        registered
    }

    /// Picks the face for `language`: its own family (downloaded on first use
    /// when allowed), then the base family, then the global fallback.
    pub async fn resolve(&self, language: Language) -> ResolvedFont {
        let primary = catalog::family_for(language);
        if let Some(font) = self.registry.lookup(primary) {
            return ResolvedFont {
                family: primary.to_string(),
                font: Some(font),
            };
        }
        if let Some(binding) = catalog::binding_for(primary) {
            if let Some(font) = self.fetch_remote(binding).await {
                return ResolvedFont {
                    family: primary.to_string(),
                    font: Some(font),
                };
            }
        }

        for family in [BASE_FAMILY, GLOBAL_FALLBACK_FAMILY] {
            if family == primary {
                continue;
            }
            if let Some(font) = self.registry.lookup(family) {
                debug!(language = %language, fallback = family, "Using fallback font");
                return ResolvedFont {
                    family: family.to_string(),
                    font: Some(font),
                };
            }
        }

        warn!(language = %language, "No font registered; rendering with estimated metrics");
        ResolvedFont {
            family: primary.to_string(),
            font: None,
        }
    }

    async fn fetch_remote(&self, binding: &'static FontBinding) -> Option<Arc<LoadedFont>> {
        let (Some(url), Some(http)) = (binding.url, self.http.as_ref()) else {
            return None;
        };
        if let Some(failed_at) = self.failed_fetches.get(binding.family) {
            if failed_at.elapsed() < FETCH_RETRY_COOLDOWN {
                return None;
            }
        }

        let cache_path = self.cache_dir.join(binding.file_name);
        let result = self
            .registry
            .register_with(binding.family, || async move {
                match tokio::fs::read(&cache_path).await {
                    Ok(data) => {
                        let source = cache_path.display().to_string();
                        return LoadedFont::from_bytes(binding.family, data, source);
                    }
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                    Err(source) => {
                        return Err(FontError::Io {
                            path: cache_path.clone(),
                            source,
                        })
                    }
                }
                info!(family = binding.family, %url, "Downloading font");
                let response = http.get(url).send().await?;
                if !response.status().is_success() {
                    return Err(FontError::DownloadStatus(response.status().as_u16()));
                }
                let bytes = response.bytes().await?.to_vec();
                let font = LoadedFont::from_bytes(binding.family, bytes.clone(), url)?;
                if let Err(e) = persist(&cache_path, &bytes).await {
                    warn!(path = %cache_path.display(), "Could not cache font: {e}");
                }
                Ok(font)
            })
            .await;

        match result {
            Ok(font) => {
                self.failed_fetches.remove(binding.family);
                debug!(family = binding.family, source = font.source(), "Language font ready");
                Some(font)
            }
            Err(e) => {
                warn!(family = binding.family, "Font fetch failed: {e}");
                self.failed_fetches.insert(binding.family, Instant::now());
                None
            }
        }
    }
}

async fn persist(path: &std::path::Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, bytes).await
}
