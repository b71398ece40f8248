//! Protect/restore: swap spans for tokens, translate, swap back

use regex::Regex;
use tracing::{debug, warn};

use crate::markdown::placeholder::{residual_token_pattern, Placeholder, PlaceholderRegistry};
use crate::markdown::spans::SpanClassifier;

/// Replaces protected spans with placeholder tokens before translation and
/// restores them afterwards, tolerating backend mangling of the tokens.
#[derive(Debug)]
pub struct SpanProtector {
    classifier: SpanClassifier,
    residual: Regex,
}

impl Default for SpanProtector {
    fn default() -> Self {
        Self::new()
    }
}

impl SpanProtector {
    /// Build a protector with freshly compiled patterns.
    pub fn new() -> Self {
        Self {
            classifier: SpanClassifier::new(),
            residual: residual_token_pattern(),
        }
    }

    /// The classifier this protector scans with.
    pub fn classifier(&self) -> &SpanClassifier {
        &self.classifier
    }

    /// Replace every protected span in `text` with a placeholder token.
    ///
    /// Spans are registered in appearance order but substituted in reverse
    /// start order so earlier offsets stay valid during replacement.
    pub fn protect(&self, text: &str) -> (String, PlaceholderRegistry) {
        let spans = self.classifier.classify(text);
        let mut registry = PlaceholderRegistry::new();
        let tokens: Vec<String> = spans.iter().map(|s| registry.register(s)).collect();

        let mut protected = text.to_string();
        for (span, token) in spans.iter().zip(tokens.iter()).rev() {
            protected.replace_range(span.start..span.end, token);
        }

        debug!("protected {} spans", registry.len());
        (protected, registry)
    }

    /// Put original span text back in place of every token in `translated`.
    ///
    /// Per token, in appearance order: exact match, then a case- and
    /// whitespace-tolerant match, then positional recovery against the
    /// n-th surviving token-shaped fragment (backends tend to preserve the
    /// relative order of tokens even when they corrupt them). A token that
    /// resists all three is left as-is with a warning; Format Repair strips
    /// whatever remains.
    pub fn restore(&self, translated: &str, registry: &PlaceholderRegistry) -> String {
        let mut text = translated.to_string();

        for entry in registry.entries() {
            if let Some(pos) = text.find(&entry.token) {
                text.replace_range(pos..pos + entry.token.len(), &entry.original);
                continue;
            }

            if let Some((start, end)) = loose_match(&text, entry) {
                debug!("recovered mangled placeholder {}", entry.token);
                text.replace_range(start..end, &entry.original);
                continue;
            }

            if let Some((start, end)) = self.positional_match(&text, registry, entry) {
                debug!("positionally recovered placeholder {}", entry.token);
                text.replace_range(start..end, &entry.original);
                continue;
            }

            warn!(
                "placeholder {} not recoverable; leaving translated text in place",
                entry.token
            );
        }

        text
    }

    /// First surviving token-shaped fragment that is not the intact token
    /// of another entry. Earlier entries were already replaced when this
    /// runs, so with order preservation the first such fragment is the
    /// corrupted form of the current entry's token.
    fn positional_match(
        &self,
        text: &str,
        registry: &PlaceholderRegistry,
        entry: &Placeholder,
    ) -> Option<(usize, usize)> {
        self.residual
            .find_iter(text)
            .find(|m| {
                !registry
                    .entries()
                    .iter()
                    .any(|other| other.id != entry.id && other.token == m.as_str())
            })
            .map(|m| (m.start(), m.end()))
    }
}

/// Case-insensitive match of `entry.token` allowing whitespace between any
/// two characters, the two mutations backends most commonly apply.
fn loose_match(text: &str, entry: &Placeholder) -> Option<(usize, usize)> {
    let mut pattern = String::from("(?i)");
    for (i, ch) in entry.token.chars().enumerate() {
        if i > 0 {
            pattern.push_str(r"\s*");
        }
        pattern.push(ch);
    }
    let re = Regex::new(&pattern).ok()?;
    re.find(text).map(|m| (m.start(), m.end()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "# Intro\n\nThe energy $E = mc^2$ appears in `physics` code:\n\n```rust\nlet e = m * c * c; // $ not math\n```\n\nSee ![fig](img/fig1.png \"caption\") and [paper](https://arxiv.org/abs/1).";

    #[test]
    fn test_protect_removes_all_spans() {
        let protector = SpanProtector::new();
        let (protected, registry) = protector.protect(DOC);

        assert!(!protected.contains("mc^2"));
        assert!(!protected.contains("```"));
        assert!(!protected.contains("img/fig1.png"));
        assert_eq!(registry.len(), 5);
    }

    #[test]
    fn test_identity_round_trip_is_exact() {
        let protector = SpanProtector::new();
        let (protected, registry) = protector.protect(DOC);
        let restored = protector.restore(&protected, &registry);

        assert_eq!(restored, DOC);
    }

    #[test]
    fn test_restore_survives_case_mangling() {
        let protector = SpanProtector::new();
        let (protected, registry) = protector.protect("value $x_i$ end");
        let mangled = protected.to_lowercase();
        let restored = protector.restore(&mangled, &registry);

        assert!(restored.contains("$x_i$"));
    }

    #[test]
    fn test_restore_survives_inserted_whitespace() {
        let protector = SpanProtector::new();
        let (protected, registry) = protector.protect("see `config.toml` there");
        let mangled = protected.replace("QXJ0JXQ", "QXJ 0 JXQ");
        let restored = protector.restore(&mangled, &registry);

        assert!(restored.contains("`config.toml`"));
    }

    #[test]
    fn test_positional_recovery_when_digits_corrupted() {
        let protector = SpanProtector::new();
        let (protected, registry) = protector.protect("a $x$ b $y$ c");
        // Backend replaced the digits with dashes; exact and loose matching
        // both fail, positional order still identifies the tokens.
        let mangled = protected.replace("QXJ0JXQ", "qxj--jxq").replace("QXJ1JXQ", "qxj--jxq");
        let restored = protector.restore(&mangled, &registry);

        assert_eq!(restored, "a $x$ b $y$ c");
    }

    #[test]
    fn test_unrecoverable_token_does_not_fail_document() {
        let protector = SpanProtector::new();
        let (protected, registry) = protector.protect("a $x$ b `y` c");
        // First token destroyed beyond recognition, second intact.
        let mangled = protected.replace("QXJ0JXQ", "???");
        let restored = protector.restore(&mangled, &registry);

        assert!(restored.contains("`y`"));
        assert!(restored.contains("???"));
        assert!(!restored.contains("$x$"));
    }
}
