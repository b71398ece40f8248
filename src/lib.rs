//! Markdown translator with byte-exact span protection
//!
//! This library translates Markdown documents while guaranteeing that
//! regions with syntactic meaning (LaTeX formulas, code, links, images,
//! inline HTML tags) survive translation byte-for-byte: spans are swapped
//! for placeholder tokens before the backend call and restored afterwards,
//! with fallback recovery for tokens the backend mangled.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod core;
pub mod markdown;
pub mod services;

// Re-export key types for convenience
pub use crate::core::{
    cache::TranslationCache,
    config::{Service, TranslateConfig},
    errors::TranslationError,
    pipeline::MarkdownTranslator,
};

pub use crate::markdown::{
    placeholder::PlaceholderRegistry,
    protect::SpanProtector,
    repair::FormatRepair,
    spans::{Span, SpanClassifier, SpanKind},
};

pub use crate::services::{create_service, TranslationService};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
