//! Balanced-brace extraction for inline LaTeX formulas
//!
//! Commands like `\frac{\mathbf{\vec{x}}}{2}` nest brace groups to
//! arbitrary depth, and `\text{..}` groups may even contain `$`. A fixed
//! pattern cannot bound these, so the classifier delegates to a scanner
//! that tracks nesting depth.

/// Outcome of scanning one inline formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MathExtraction {
    /// Byte offset one past the closing `$`
    pub end: usize,
    /// False when a brace group was still open at the closing delimiter
    pub balanced: bool,
}

/// Scan the inline formula whose opening `$` sits at byte offset `open`.
///
/// A nesting counter is incremented on `{` and decremented on `}`;
/// backslash-escaped characters (including `\$`, `\{`, `\}`) never count
/// as delimiters. While the counter is above its starting depth a `$` is
/// part of a group, not a terminator - except that an unbalanced group is
/// closed by it anyway and flagged, so one malformed formula degrades to a
/// partial match instead of swallowing the rest of the document.
///
/// Returns `None` when no closing `$` exists or the formula is empty.
pub fn extract_inline_math(text: &str, open: usize) -> Option<MathExtraction> {
    let mut depth: usize = 0;
    let mut has_content = false;
    let mut iter = text[open + 1..].char_indices();

    while let Some((off, ch)) = iter.next() {
        let pos = open + 1 + off;
        match ch {
            '\\' => {
                iter.next();
                has_content = true;
            }
            '{' => {
                depth += 1;
                has_content = true;
            }
            '}' => {
                depth = depth.saturating_sub(1);
                has_content = true;
            }
            '$' if depth == 0 => {
                if !has_content {
                    return None;
                }
                return Some(MathExtraction {
                    end: pos + 1,
                    balanced: true,
                });
            }
            '$' => {
                // Still inside a group: either a nested formula inside
                // \text{..}, or the group never closes. Look ahead for a
                // later `$` that would let the group close; if none exists,
                // emit the partial match here.
                if !closes_later(text, pos + 1) {
                    return Some(MathExtraction {
                        end: pos + 1,
                        balanced: false,
                    });
                }
                has_content = true;
            }
            _ => has_content = true,
        }
    }

    None
}

/// True when scanning on from `from` reaches another unescaped `$`
/// (i.e. the current `$` is nested content, not the end).
fn closes_later(text: &str, from: usize) -> bool {
    let mut iter = text[from..].chars();
    while let Some(ch) = iter.next() {
        match ch {
            '\\' => {
                iter.next();
            }
            '$' => return true,
            _ => {}
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> Option<(String, bool)> {
        let open = text.find('$')?;
        let m = extract_inline_math(text, open)?;
        Some((text[open..m.end].to_string(), m.balanced))
    }

    #[test]
    fn test_simple_formula() {
        let (span, balanced) = extract("$x + y$ rest").unwrap();
        assert_eq!(span, "$x + y$");
        assert!(balanced);
    }

    #[test]
    fn test_depth_three_nesting() {
        let text = r"$\frac{\mathbf{\vec{x}}}{2}$ tail";
        let (span, balanced) = extract(text).unwrap();
        assert_eq!(span, r"$\frac{\mathbf{\vec{x}}}{2}$");
        assert!(balanced);

        let opens = span.matches('{').count();
        let closes = span.matches('}').count();
        assert_eq!(opens, closes);
    }

    #[test]
    fn test_dollar_inside_text_group() {
        let text = r"$\text{price is $5$ total}$ after";
        let (span, balanced) = extract(text).unwrap();
        assert_eq!(span, r"$\text{price is $5$ total}$");
        assert!(balanced);
    }

    #[test]
    fn test_unbalanced_group_emits_partial() {
        let text = r"$\mathbf{broken$ and prose continues";
        let (span, balanced) = extract(text).unwrap();
        assert_eq!(span, r"$\mathbf{broken$");
        assert!(!balanced);
    }

    #[test]
    fn test_escaped_dollar_does_not_terminate() {
        let (span, balanced) = extract(r"$a \$ b$ x").unwrap();
        assert_eq!(span, r"$a \$ b$");
        assert!(balanced);
    }

    #[test]
    fn test_no_closing_dollar_is_not_a_formula() {
        assert_eq!(extract("$unclosed forever"), None);
    }

    #[test]
    fn test_empty_formula_rejected() {
        assert_eq!(extract("$$"), None);
    }
}
