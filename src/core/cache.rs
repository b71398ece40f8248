//! On-disk translation cache

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Key/value translation cache.
///
/// Persisted as one JSON file per `(service, lang_in, lang_out)` partition,
/// mapping exact source text to its translation. Lookups are exact-text
/// equality; a single changed character is a miss. Any cache I/O failure
/// degrades to a miss with a warning, never an abort.
///
/// Concurrent processes writing the same partition race on the file; the
/// last writer wins. Callers running concurrent instances must serialize
/// cache writes externally.
#[derive(Debug)]
pub struct TranslationCache {
    entries: HashMap<String, String>,
    path: Option<PathBuf>,
}

impl TranslationCache {
    /// Throwaway cache with no backing file, used when caching is bypassed.
    pub fn in_memory() -> Self {
        Self {
            entries: HashMap::new(),
            path: None,
        }
    }

    /// Open (or create) the cache partition for one backend/language pair.
    pub fn open(dir: &Path, service: &str, lang_in: &str, lang_out: &str) -> Self {
        let path = dir.join(format!(
            "translation_cache_{service}_{lang_in}_{lang_out}.json"
        ));
        let entries = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<HashMap<String, String>>(&content) {
                Ok(map) => {
                    debug!("loaded {} cached translations from {}", map.len(), path.display());
                    map
                }
                Err(e) => {
                    warn!("ignoring corrupt translation cache {}: {}", path.display(), e);
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };
        Self {
            entries,
            path: Some(path),
        }
    }

    /// Cached translation for `source`, if present.
    pub fn get(&self, source: &str) -> Option<&str> {
        self.entries.get(source).map(String::as_str)
    }

    /// Record a translation and persist immediately.
    pub fn put(&mut self, source: &str, translated: &str) {
        self.entries
            .insert(source.to_string(), translated.to_string());
        self.save();
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the cache holds nothing.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write the whole map back to disk; failures are logged, not fatal.
    fn save(&self) {
        let Some(path) = &self.path else {
            return;
        };
        match serde_json::to_string_pretty(&self.entries) {
            Ok(json) => {
                if let Err(e) = std::fs::write(path, json) {
                    warn!("failed to write translation cache {}: {}", path.display(), e);
                }
            }
            Err(e) => warn!("failed to serialize translation cache: {}", e),
        }
    }
}
