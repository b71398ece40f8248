//! Span classification for protected Markdown regions

use regex::Regex;

use crate::markdown::latex::extract_inline_math;

/// Categories of protected content, listed in descending claim priority.
///
/// Higher-priority kinds may contain characters that lower-priority
/// patterns would misinterpret (a `$` inside a code fence, a `[` inside a
/// formula), so classification always runs in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpanKind {
    /// Fenced code block delimited by triple backticks
    CodeBlock,
    /// Inline code delimited by single backticks
    InlineCode,
    /// Block formula delimited by `$$`
    MathBlock,
    /// Inline formula delimited by `$`
    MathInline,
    /// Image reference `![alt](url)`
    Image,
    /// Hyperlink `[text](url)`
    Link,
    /// Raw inline HTML tag `<..>`
    HtmlTag,
}

/// A contiguous protected region of the source document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    /// What kind of region this is
    pub kind: SpanKind,
    /// Byte offset of the first character
    pub start: usize,
    /// Byte offset one past the last character
    pub end: usize,
    /// The original text, kept verbatim for restoration
    pub text: String,
    /// False when a formula's brace groups never closed (partial match)
    pub balanced: bool,
}

/// Stateless classifier holding one compiled pattern per span kind.
///
/// Constructed once and passed explicitly; holds no mutable state between
/// documents.
#[derive(Debug)]
pub struct SpanClassifier {
    code_block: Regex,
    inline_code: Regex,
    math_block: Regex,
    image: Regex,
    link: Regex,
    html_tag: Regex,
}

impl Default for SpanClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl SpanClassifier {
    /// Compile the classifier patterns.
    pub fn new() -> Self {
        Self {
            code_block: Regex::new(r"(?s)```.*?```").unwrap(),
            inline_code: Regex::new(r"`[^`]+`").unwrap(),
            math_block: Regex::new(r"(?s)\$\$.*?\$\$").unwrap(),
            image: Regex::new(r"!\[[^\]]*\]\([^)\n]*\)").unwrap(),
            link: Regex::new(r"\[[^\]]*\]\([^)\n]*\)").unwrap(),
            html_tag: Regex::new(r"<[^<>\n]+>").unwrap(),
        }
    }

    /// Scan `text` and return every protected span, non-overlapping and
    /// sorted by start offset.
    pub fn classify(&self, text: &str) -> Vec<Span> {
        let mut spans: Vec<Span> = Vec::new();

        self.claim(text, &self.code_block, SpanKind::CodeBlock, &mut spans);
        self.claim(text, &self.inline_code, SpanKind::InlineCode, &mut spans);
        self.claim(text, &self.math_block, SpanKind::MathBlock, &mut spans);
        self.claim_inline_math(text, &mut spans);
        self.claim(text, &self.image, SpanKind::Image, &mut spans);
        self.claim(text, &self.link, SpanKind::Link, &mut spans);
        self.claim(text, &self.html_tag, SpanKind::HtmlTag, &mut spans);

        spans.sort_by_key(|s| s.start);
        spans
    }

    /// Byte ranges of block-level regions (fenced code, block math).
    ///
    /// Used by the pipeline so paragraph splitting never cuts through a
    /// fence.
    pub fn block_ranges(&self, text: &str) -> Vec<(usize, usize)> {
        let mut ranges: Vec<(usize, usize)> = self
            .code_block
            .find_iter(text)
            .map(|m| (m.start(), m.end()))
            .collect();
        for m in self.math_block.find_iter(text) {
            if !ranges.iter().any(|&(s, e)| m.start() < e && s < m.end()) {
                ranges.push((m.start(), m.end()));
            }
        }
        ranges.sort_by_key(|r| r.0);
        ranges
    }

    /// Claim every match of `pattern` that does not overlap an already
    /// claimed region.
    fn claim(&self, text: &str, pattern: &Regex, kind: SpanKind, spans: &mut Vec<Span>) {
        for m in pattern.find_iter(text) {
            if overlaps_any(spans, m.start(), m.end()) {
                continue;
            }
            spans.push(Span {
                kind,
                start: m.start(),
                end: m.end(),
                text: m.as_str().to_string(),
                balanced: true,
            });
        }
    }

    /// Inline formulas need a real scan: a `$` inside a brace group such as
    /// `\text{.. $x$ ..}` must not terminate the formula, which no fixed
    /// pattern can express.
    fn claim_inline_math(&self, text: &str, spans: &mut Vec<Span>) {
        let bytes = text.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            if bytes[i] != b'$' || overlaps_any(spans, i, i + 1) {
                i += 1;
                continue;
            }
            match extract_inline_math(text, i) {
                Some(m) if !overlaps_any(spans, i, m.end) => {
                    spans.push(Span {
                        kind: SpanKind::MathInline,
                        start: i,
                        end: m.end,
                        text: text[i..m.end].to_string(),
                        balanced: m.balanced,
                    });
                    i = m.end;
                }
                _ => i += 1,
            }
        }
    }
}

/// True when `[start, end)` intersects any already claimed span.
fn overlaps_any(spans: &[Span], start: usize, end: usize) -> bool {
    spans.iter().any(|s| start < s.end && s.start < end)
}
