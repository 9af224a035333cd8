//! Process-wide font table.
//!
//! Each family owns one slot that is filled at most once. Slots live in a
//! sharded map, so a lookup only touches the shard holding that family and a
//! registration in flight for one family never blocks reads of another.
//! Concurrent first-use registrations of the same family share a single
//! `OnceCell` initialisation; later attempts are no-ops.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;
use thiserror::Error;
use tokio::sync::OnceCell;

#[derive(Debug, Error)]
pub enum FontError {
    #[error("failed to read font {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("font data for '{0}' could not be parsed")]
    Parse(String),

    #[error("font download failed: {0}")]
    Download(#[from] reqwest::Error),

    #[error("font download returned status {0}")]
    DownloadStatus(u16),
}

/// Raw font bytes bound to the family name they were registered under.
#[derive(Debug)]
pub struct LoadedFont {
    family: String,
    data: Vec<u8>,
    face_index: u32,
    source: String,
}

impl LoadedFont {
    /// Validates that the bytes hold a parseable face before accepting them.
    pub fn from_bytes(
        family: impl Into<String>,
        data: Vec<u8>,
        source: impl Into<String>,
    ) -> Result<Self, FontError> {
        let family = family.into();
        if rustybuzz::Face::from_slice(&data, 0).is_none() {
            return Err(FontError::Parse(family));
        }
        Ok(Self {
            family,
            data,
            face_index: 0,
            source: source.into(),
        })
    }

    pub fn from_path(family: impl Into<String>, path: &Path) -> Result<Self, FontError> {
        let data = std::fs::read(path).map_err(|source| FontError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(family, data, path.display().to_string())
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    /// File path or URL the bytes came from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn face(&self) -> Option<rustybuzz::Face<'_>> {
        rustybuzz::Face::from_slice(&self.data, self.face_index)
    }
}

/// Read-only view of registered fonts.
pub trait FontLookup: Send + Sync {
    fn lookup(&self, family: &str) -> Option<Arc<LoadedFont>>;
}

#[derive(Default)]
pub struct FontRegistry {
    slots: DashMap<String, Arc<OnceCell<Arc<LoadedFont>>>>,
}

impl FontRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, family: &str) -> Arc<OnceCell<Arc<LoadedFont>>> {
        // Clone the Arc out so the shard guard is released before any await.
        Arc::clone(&*self.slots.entry(family.to_string()).or_default())
    }

    /// Registers a font under its family if that family is still empty.
    /// Returns `false` when the family was already registered (or is being
    /// registered right now); the existing entry is kept.
    pub fn register(&self, font: LoadedFont) -> bool {
        let slot = self.slot(&font.family);
        slot.set(Arc::new(font)).is_ok()
    }

    /// Registers `family` by running `load` unless it is already present.
    /// Concurrent callers for the same family wait on the first loader; if
    /// it fails the slot stays empty and the next caller may try again.
    pub async fn register_with<F, Fut>(
        &self,
        family: &str,
        load: F,
    ) -> Result<Arc<LoadedFont>, FontError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<LoadedFont, FontError>>,
    {
        let slot = self.slot(family);
        let font = slot
            .get_or_try_init(|| async move { load().await.map(Arc::new) })
            .await?;
        Ok(Arc::clone(font))
    }

    /// Families with a registered face, sorted.
    pub fn families(&self) -> Vec<String> {
        let mut families: Vec<String> = self
            .slots
            .iter()
            .filter(|entry| entry.value().initialized())
            .map(|entry| entry.key().clone())
            .collect();
        families.sort();
        families
    }
}

impl FontLookup for FontRegistry {
    fn lookup(&self, family: &str) -> Option<Arc<LoadedFont>> {
        self.slots
            .get(family)
            .and_then(|slot| slot.get().map(Arc::clone))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_garbage_bytes_are_rejected() {
        let result = LoadedFont::from_bytes("Broken", b"not a font".to_vec(), "memory");
        assert!(matches!(result, Err(FontError::Parse(family)) if family == "Broken"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = LoadedFont::from_path("Missing", Path::new("/definitely/not/here.ttf"));
        assert!(matches!(result, Err(FontError::Io { .. })));
    }

    #[test]
    fn test_lookup_of_unknown_family_is_none() {
        let registry = FontRegistry::new();
        assert!(registry.lookup("Nope").is_none());
        assert!(registry.families().is_empty());
    }

    #[tokio::test]
    async fn test_failed_loader_leaves_slot_empty_for_retry() {
        let registry = FontRegistry::new();
        let result = registry
            .register_with("Flaky", || async {
                Err(FontError::Parse("Flaky".to_string()))
            })
            .await;
        assert!(result.is_err());
        assert!(registry.lookup("Flaky").is_none());
        // The slot exists but is not reported as registered.
        assert!(registry.families().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_failed_loads_do_not_poison_registry() {
        let registry = Arc::new(FontRegistry::new());
        let attempts = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let registry = Arc::clone(&registry);
            let attempts = Arc::clone(&attempts);
            handles.push(tokio::spawn(async move {
                registry
                    .register_with("Flaky", || async move {
                        attempts.fetch_add(1, Ordering::SeqCst);
                        tokio::task::yield_now().await;
                        Err(FontError::Parse("Flaky".to_string()))
                    })
                    .await
                    .is_err()
            }));
        }
        for handle in handles {
            assert!(handle.await.unwrap());
        }
        // Every caller either ran the loader or waited on one that failed.
        let ran = attempts.load(Ordering::SeqCst);
        assert!((1..=8).contains(&ran), "loader ran {ran} times");
        assert!(registry.lookup("Flaky").is_none());
    }

    #[test]
    fn test_second_register_keeps_first_entry() {
        let Some(path) = crate::test_support::system_font_path() else {
            return;
        };
        let registry = FontRegistry::new();
        let first = LoadedFont::from_path("Shared", &path).unwrap();
        let mut second = LoadedFont::from_path("Shared", &path).unwrap();
        second.source = "second".to_string();

        assert!(registry.register(first));
        assert!(!registry.register(second));
        let kept = registry.lookup("Shared").unwrap();
        assert_eq!(kept.source(), path.display().to_string());
        assert_eq!(registry.families(), vec!["Shared".to_string()]);
    }

    #[tokio::test]
    async fn test_concurrent_registrations_run_loader_once() {
        let Some(path) = crate::test_support::system_font_path() else {
            return;
        };
        let data = Arc::new(std::fs::read(&path).unwrap());
        let registry = Arc::new(FontRegistry::new());
        let loads = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let registry = Arc::clone(&registry);
            let loads = Arc::clone(&loads);
            let data = Arc::clone(&data);
            handles.push(tokio::spawn(async move {
                registry
                    .register_with("Shared", || async move {
                        loads.fetch_add(1, Ordering::SeqCst);
                        tokio::task::yield_now().await;
                        LoadedFont::from_bytes("Shared", data.to_vec(), "memory")
                    })
                    .await
                    .unwrap()
            }));
        }

        let mut fonts = Vec::new();
        for handle in handles {
            fonts.push(handle.await.unwrap());
        }
        assert_eq!(loads.load(Ordering::SeqCst), 1);
        assert!(fonts.iter().all(|font| Arc::ptr_eq(font, &fonts[0])));
        assert!(Arc::ptr_eq(&registry.lookup("Shared").unwrap(), &fonts[0]));
    }
}
