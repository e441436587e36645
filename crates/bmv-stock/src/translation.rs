//! Memoized, best-effort translation of company descriptions

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::TranslationProvider;
use crate::cache::TtlCache;
use crate::config::DashboardConfig;
use crate::error::Result;

/// Placeholder providers use for missing fields
pub const NOT_AVAILABLE: &str = "No disponible";

/// Shown instead of an empty or missing description
pub const NO_DESCRIPTION: &str = "No hay descripción disponible.";

/// Outcome of a translation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    pub text: String,
    /// Set when the provider failed and `text` is the untranslated input
    pub warning: Option<String>,
}

impl Translation {
    fn ok(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            warning: None,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.warning.is_some()
    }
}

/// Split `text` into pieces of at most `max_chars` characters.
///
/// Counts `char`s, so a multi-byte character is never split.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<&str> {
    if text.is_empty() || max_chars == 0 {
        return vec![text];
    }

    let mut chunks = Vec::new();
    let mut start = 0;
    let mut count = 0;
    for (idx, _) in text.char_indices() {
        if count == max_chars {
            chunks.push(&text[start..idx]);
            start = idx;
            count = 0;
        }
        count += 1;
    }
    chunks.push(&text[start..]);
    chunks
}

/// Translation wrapper that chunks, caches and never fails
pub struct TranslationCache {
    provider: Arc<dyn TranslationProvider>,
    cache: TtlCache<String, String>,
    chunk_chars: usize,
    source: String,
    target: String,
}

impl TranslationCache {
    pub fn new(provider: Arc<dyn TranslationProvider>, config: &DashboardConfig) -> Self {
        Self {
            provider,
            cache: TtlCache::new(config.cache_ttl_translation),
            chunk_chars: config.translation_chunk_chars,
            source: config.source_language.clone(),
            target: config.target_language.clone(),
        }
    }

    /// Translate `text` into the target language.
    ///
    /// Empty text and the "No disponible" placeholder map to
    /// [`NO_DESCRIPTION`] without a provider call. Provider failures return
    /// the original text with a warning and are not cached.
    pub async fn translate(&self, text: &str) -> Translation {
        if text.trim().is_empty() || text == NOT_AVAILABLE {
            return Translation::ok(NO_DESCRIPTION);
        }

        let result = self
            .cache
            .get_or_fetch(text.to_string(), || self.translate_chunks(text))
            .await;

        match result {
            Ok(translated) => Translation::ok(translated),
            Err(err) => {
                tracing::warn!(error = %err, "Translation failed, keeping original text");
                Translation {
                    text: text.to_string(),
                    warning: Some(format!("No se pudo traducir la descripción: {err}")),
                }
            }
        }
    }

    async fn translate_chunks(&self, text: &str) -> Result<String> {
        let chunks = chunk_text(text, self.chunk_chars);
        tracing::debug!(chunks = chunks.len(), "Translating text");

        let mut parts = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            parts.push(
                self.provider
                    .translate(chunk, &self.source, &self.target)
                    .await?,
            );
        }
        Ok(parts.join(" "))
    }

    /// Number of cached translations
    pub async fn cached_entries(&self) -> usize {
        self.cache.len().await
    }
}
