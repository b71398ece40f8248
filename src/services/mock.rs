//! Scripted backend for tests and dry runs

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::core::errors::Result;
use crate::services::TranslationService;

/// Backend that applies a fixed transform and counts invocations.
///
/// Clones share the invocation counter, so a test can hand one clone to
/// the pipeline and interrogate the other.
#[derive(Clone)]
pub struct MockService {
    transform: Arc<dyn Fn(&str) -> String + Send + Sync>,
    calls: Arc<AtomicUsize>,
}

impl MockService {
    /// Backend applying `transform` to every request.
    pub fn new(transform: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        Self {
            transform: Arc::new(transform),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Backend returning its input unchanged.
    pub fn identity() -> Self {
        Self::new(|text: &str| text.to_string())
    }

    /// How many times `translate` has been called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for MockService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockService")
            .field("calls", &self.calls())
            .finish()
    }
}

#[async_trait]
impl TranslationService for MockService {
    async fn translate(&self, text: &str, _lang_in: &str, _lang_out: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok((self.transform)(text))
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
