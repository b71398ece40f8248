//! Document translation pipeline
//!
//! Orchestrates the full flow: split into paragraphs, protect spans,
//! consult the cache, call the backend, restore spans, repair formatting.

use indicatif::{ProgressBar, ProgressStyle};
use regex::Regex;
use tracing::{debug, info};

use crate::core::cache::TranslationCache;
use crate::core::config::TranslateConfig;
use crate::core::errors::Result;
use crate::markdown::protect::SpanProtector;
use crate::markdown::repair::FormatRepair;
use crate::services::{create_service, TranslationService};

/// The translation pipeline for one configuration.
///
/// Strictly sequential; the only suspension point is the backend call.
/// Backend failure propagates as a document-level error, so callers never
/// see partially translated output.
pub struct MarkdownTranslator {
    service: Box<dyn TranslationService>,
    config: TranslateConfig,
    protector: SpanProtector,
    repair: FormatRepair,
    paragraph_break: Regex,
}

/// One piece of the paragraph split: either translatable text or the
/// exact separator bytes between paragraphs, preserved verbatim.
enum Segment<'a> {
    Paragraph(&'a str),
    Separator(&'a str),
}

impl MarkdownTranslator {
    /// Build a pipeline from configuration, constructing the backend it
    /// names. Environment fallbacks are applied to unset fields first.
    pub fn from_config(mut config: TranslateConfig) -> Result<Self> {
        config.apply_env();
        let service = create_service(&config)?;
        Ok(Self::new(service, config))
    }

    /// Build a pipeline around an explicit backend.
    pub fn new(service: Box<dyn TranslationService>, config: TranslateConfig) -> Self {
        Self {
            service,
            config,
            protector: SpanProtector::new(),
            repair: FormatRepair::new(),
            paragraph_break: Regex::new(r"\n{2,}").unwrap(),
        }
    }

    /// Translate a whole Markdown document.
    pub async fn translate(&self, markdown: &str) -> Result<String> {
        info!(
            "translating {} chars {} -> {} via {}",
            markdown.len(),
            self.config.lang_in,
            self.config.lang_out,
            self.service.name()
        );

        let mut cache = if self.config.ignore_cache {
            TranslationCache::in_memory()
        } else {
            TranslationCache::open(
                &self.config.cache_dir,
                self.service.name(),
                &self.config.lang_in,
                &self.config.lang_out,
            )
        };

        let segments = self.split_paragraphs(markdown);
        let total = segments
            .iter()
            .filter(|s| matches!(s, Segment::Paragraph(p) if !p.trim().is_empty()))
            .count();
        debug!("split into {} paragraphs", total);

        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
                .unwrap()
                .progress_chars("=>-"),
        );

        let mut output = String::with_capacity(markdown.len());
        for segment in segments {
            match segment {
                Segment::Separator(s) => output.push_str(s),
                Segment::Paragraph(p) => {
                    output.push_str(&self.translate_paragraph(p, &mut cache).await?);
                    if !p.trim().is_empty() {
                        bar.inc(1);
                    }
                }
            }
        }
        bar.finish_and_clear();

        Ok(self.repair.repair(&output))
    }

    /// Translate one paragraph through protect -> backend -> restore.
    async fn translate_paragraph(
        &self,
        paragraph: &str,
        cache: &mut TranslationCache,
    ) -> Result<String> {
        if paragraph.trim().is_empty() {
            return Ok(paragraph.to_string());
        }

        if let Some(hit) = cache.get(paragraph) {
            debug!("cache hit for {} chars", paragraph.len());
            return Ok(hit.to_string());
        }

        let (protected, registry) = self.protector.protect(paragraph);

        let translated = if self.config.lang_in == self.config.lang_out {
            // Same-language runs still exercise protect/restore, but skip
            // the backend call.
            protected.clone()
        } else {
            self.service
                .translate(&protected, &self.config.lang_in, &self.config.lang_out)
                .await?
        };

        let restored = self.protector.restore(&translated, &registry);
        cache.put(paragraph, &restored);
        Ok(restored)
    }

    /// Split on blank-line runs, keeping the exact separator bytes and
    /// never splitting inside a fenced code or block-math region.
    fn split_paragraphs<'a>(&self, text: &'a str) -> Vec<Segment<'a>> {
        let blocks = self.protector.classifier().block_ranges(text);
        let inside_block =
            |start: usize, end: usize| blocks.iter().any(|&(s, e)| start < e && s < end);

        let mut segments = Vec::new();
        let mut last = 0;
        for m in self.paragraph_break.find_iter(text) {
            if inside_block(m.start(), m.end()) {
                continue;
            }
            if m.start() > last {
                segments.push(Segment::Paragraph(&text[last..m.start()]));
            }
            segments.push(Segment::Separator(m.as_str()));
            last = m.end();
        }
        if last < text.len() {
            segments.push(Segment::Paragraph(&text[last..]));
        }
        segments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::MockService;
    use tempfile::tempdir;

    fn config_with_cache(dir: &std::path::Path) -> TranslateConfig {
        TranslateConfig {
            cache_dir: dir.to_path_buf(),
            ..Default::default()
        }
    }

    const DOC: &str = "# Physics\n\nThe relation $E = mc^2$ holds.\n\n```python\nprint(\"hi\")\n```\n\nSee ![fig](img/fig1.png \"caption\") and [site](https://example.com).";

    #[tokio::test]
    async fn test_identity_adapter_preserves_document() {
        let dir = tempdir().unwrap();
        let translator = MarkdownTranslator::new(
            Box::new(MockService::identity()),
            config_with_cache(dir.path()),
        );

        let out = translator.translate(DOC).await.unwrap();
        assert_eq!(out, DOC);
    }

    #[tokio::test]
    async fn test_image_survives_mangling_adapter() {
        let dir = tempdir().unwrap();
        // Uppercases prose but leaves token characters intact only in
        // spelling, not in case; restoration must still recover them.
        let translator = MarkdownTranslator::new(
            Box::new(MockService::new(|s: &str| s.to_uppercase())),
            config_with_cache(dir.path()),
        );

        let out = translator
            .translate("An image: ![alt](img/fig1.png \"caption\") here.")
            .await
            .unwrap();

        assert!(out.contains("![alt](img/fig1.png \"caption\")"));
        assert!(out.contains("AN IMAGE:"));
    }

    #[tokio::test]
    async fn test_cache_makes_second_run_free() {
        let dir = tempdir().unwrap();
        let mock = MockService::new(|s: &str| s.replace("Hello", "你好"));

        let translator = MarkdownTranslator::new(
            Box::new(mock.clone()),
            config_with_cache(dir.path()),
        );
        let first = translator.translate("Hello world").await.unwrap();
        let calls_after_first = mock.calls();
        assert_eq!(calls_after_first, 1);

        let second = translator.translate("Hello world").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(mock.calls(), calls_after_first);
    }

    #[tokio::test]
    async fn test_ignore_cache_always_calls_backend() {
        let dir = tempdir().unwrap();
        let mock = MockService::identity();
        let config = TranslateConfig {
            ignore_cache: true,
            cache_dir: dir.path().to_path_buf(),
            ..Default::default()
        };

        let translator = MarkdownTranslator::new(Box::new(mock.clone()), config);
        translator.translate("Hello").await.unwrap();
        translator.translate("Hello").await.unwrap();
        assert_eq!(mock.calls(), 2);
    }

    #[tokio::test]
    async fn test_same_language_skips_backend() {
        let dir = tempdir().unwrap();
        let mock = MockService::identity();
        let config = TranslateConfig {
            lang_out: "en".to_string(),
            cache_dir: dir.path().to_path_buf(),
            ..Default::default()
        };

        let translator = MarkdownTranslator::new(Box::new(mock.clone()), config);
        let out = translator.translate("Text with $x$ math").await.unwrap();
        assert_eq!(out, "Text with $x$ math");
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn test_blank_lines_inside_fence_not_split() {
        let dir = tempdir().unwrap();
        let translator = MarkdownTranslator::new(
            Box::new(MockService::identity()),
            config_with_cache(dir.path()),
        );

        let doc = "intro\n\n```\nfirst\n\nsecond\n```\n\noutro";
        let out = translator.translate(doc).await.unwrap();
        assert_eq!(out, doc);
    }

    #[tokio::test]
    async fn test_heading_repair_applied_to_output() {
        let dir = tempdir().unwrap();
        // Backend that "loses" the heading space, a common mangling.
        let translator = MarkdownTranslator::new(
            Box::new(MockService::new(|s: &str| s.replace("## ", "##"))),
            config_with_cache(dir.path()),
        );

        let out = translator.translate("## Title\n\nbody").await.unwrap();
        assert!(out.starts_with("## Title"));
    }
}
