//! Post-restoration Markdown format repair
//!
//! Translation backends routinely swap `#` for its fullwidth variant, drop
//! the space after heading markers, and push whitespace or CJK punctuation
//! into image syntax. These rules normalize the damage after restoration.

use regex::Regex;
use tracing::warn;

use crate::markdown::placeholder::residual_token_pattern;

/// Stateless repairer holding the compiled normalization patterns.
#[derive(Debug)]
pub struct FormatRepair {
    heading: Regex,
    image_gap: Regex,
    bracket_gap: Regex,
    residual: Regex,
}

impl Default for FormatRepair {
    fn default() -> Self {
        Self::new()
    }
}

impl FormatRepair {
    /// Compile the repair patterns.
    pub fn new() -> Self {
        Self {
            heading: Regex::new(r"^([#＃]+)(.*)").unwrap(),
            image_gap: Regex::new(r"[!！]\s*\[").unwrap(),
            bracket_gap: Regex::new(r"\]\s*[(（]").unwrap(),
            residual: residual_token_pattern(),
        }
    }

    /// Apply all repair rules to a restored document.
    ///
    /// Lines inside fenced code blocks are left untouched; a shell comment
    /// is not a heading.
    pub fn repair(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut in_fence = false;

        for line in text.split_inclusive('\n') {
            if line.trim_start().starts_with("```") {
                in_fence = !in_fence;
                out.push_str(line);
                continue;
            }
            if in_fence {
                out.push_str(line);
                continue;
            }
            out.push_str(&self.repair_line(line));
        }

        self.strip_residual(&out)
    }

    /// Heading and image/link syntax fixes for one line.
    fn repair_line(&self, line: &str) -> String {
        let line = self.heading.replace(line, |caps: &regex::Captures| {
            let marks = "#".repeat(caps[1].chars().count());
            let content = &caps[2];
            if content.is_empty() {
                marks
            } else if content.starts_with(' ') {
                format!("{marks}{content}")
            } else {
                format!("{marks} {content}")
            }
        });
        let line = self.image_gap.replace_all(&line, "![");
        let line = self.bracket_gap.replace_all(&line, "](");
        line.into_owned()
    }

    /// Strip any token-shaped fragment that survived restoration. Evidence
    /// of a missed case; better dropped than shown to the reader.
    fn strip_residual(&self, text: &str) -> String {
        for m in self.residual.find_iter(text) {
            warn!("stripping unrestored placeholder fragment {:?}", m.as_str());
        }
        self.residual.replace_all(text, "").into_owned()
    }
}
