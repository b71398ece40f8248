//! Span protection for Markdown documents
//!
//! Everything here is pure text manipulation: classify protected spans,
//! swap them for placeholder tokens, restore them after translation and
//! repair the formatting damage backends leave behind.

pub mod latex;
pub mod placeholder;
pub mod protect;
pub mod repair;
pub mod spans;

pub use placeholder::{Placeholder, PlaceholderRegistry};
pub use protect::SpanProtector;
pub use repair::FormatRepair;
pub use spans::{Span, SpanClassifier, SpanKind};
