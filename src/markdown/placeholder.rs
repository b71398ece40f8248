//! Placeholder tokens and the per-document registry

use regex::Regex;

use crate::markdown::spans::{Span, SpanKind};

/// Fixed marker opening every placeholder token.
///
/// Letters and digits only: no `_`, `$`, brackets or backticks, so the
/// token can never match a classifier pattern and carries nothing a
/// translation backend treats as punctuation, markup or a word worth
/// translating. The unusual consonant cluster also gives restoration a
/// recognizable anchor even when a backend shifts case or inserts spaces.
pub const TOKEN_PREFIX: &str = "QXJ";

/// Fixed marker closing every placeholder token.
pub const TOKEN_SUFFIX: &str = "JXQ";

/// Pattern matching anything that still looks like one of our tokens,
/// however a backend may have mangled it (case shifts, inserted spaces,
/// underscores or dashes, dropped digits).
pub fn residual_token_pattern() -> Regex {
    Regex::new(r"(?i)qxj[\s_\-]*\d*[\s_\-]*jxq").unwrap()
}

/// One registered placeholder.
#[derive(Debug, Clone)]
pub struct Placeholder {
    /// Monotonically increasing id, embedded in the token
    pub id: usize,
    /// Kind of the span this token replaced
    pub kind: SpanKind,
    /// The synthetic token substituted into the document
    pub token: String,
    /// Original span text, restored after translation
    pub original: String,
}

/// Ordered token -> original mapping for one document pass.
///
/// Insertion order equals order of appearance in the document; the
/// registry is created fresh per translation and discarded after
/// restoration.
#[derive(Debug, Default)]
pub struct PlaceholderRegistry {
    entries: Vec<Placeholder>,
}

impl PlaceholderRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next token for `span` and record the mapping.
    pub fn register(&mut self, span: &Span) -> String {
        let id = self.entries.len();
        let token = format!("{TOKEN_PREFIX}{id}{TOKEN_SUFFIX}");
        self.entries.push(Placeholder {
            id,
            kind: span.kind,
            token: token.clone(),
            original: span.text.clone(),
        });
        token
    }

    /// Original text for `token`, if it was registered in this pass.
    pub fn resolve(&self, token: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|p| p.token == token)
            .map(|p| p.original.as_str())
    }

    /// Placeholders in document appearance order.
    pub fn entries(&self) -> &[Placeholder] {
        &self.entries
    }

    /// Number of registered placeholders.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing was registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
