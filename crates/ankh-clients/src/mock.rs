use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use ankh_core::errors::CollaboratorError;
use ankh_core::{OcrEngine, Translator};

/// Pre-programmed replies for deterministic testing without live services.
#[derive(Clone)]
pub enum MockReply {
    /// Return this text.
    Text(String),
    /// Return an error.
    Error(CollaboratorError),
    /// Wait a duration, then yield the inner reply.
    Delay(Duration, Box<MockReply>),
}

impl MockReply {
    /// Convenience: a plain text reply.
    pub fn text(text: &str) -> Self {
        Self::Text(text.to_string())
    }

    /// Convenience: wrap any reply with a delay.
    pub fn delayed(delay: Duration, inner: MockReply) -> Self {
        Self::Delay(delay, Box::new(inner))
    }
}

/// Mock translator that returns pre-programmed replies in sequence.
pub struct MockTranslator {
    replies: Vec<MockReply>,
    call_count: AtomicUsize,
}

impl MockTranslator {
    pub fn new(replies: Vec<MockReply>) -> Self {
        Self {
            replies,
            call_count: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Translator for MockTranslator {
    fn name(&self) -> &str {
        "mock-translate"
    }

    async fn translate(
        &self,
        _text: &str,
        _source_lang: &str,
        _target_lang: &str,
    ) -> Result<String, CollaboratorError> {
        let idx = self.call_count.fetch_add(1, Ordering::Relaxed);

        if idx >= self.replies.len() {
            return Err(CollaboratorError::InvalidRequest(format!(
                "MockTranslator: no reply configured for call {}",
                idx
            )));
        }

        resolve_reply(self.replies[idx].clone()).await
    }
}

/// Mock OCR engine that returns pre-programmed replies in sequence.
pub struct MockOcr {
    replies: Vec<MockReply>,
    call_count: AtomicUsize,
}

impl MockOcr {
    pub fn new(replies: Vec<MockReply>) -> Self {
        Self {
            replies,
            call_count: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl OcrEngine for MockOcr {
    fn name(&self) -> &str {
        "mock-ocr"
    }

    async fn extract_text(
        &self,
        _image: &Path,
        _languages: &str,
    ) -> Result<String, CollaboratorError> {
        let idx = self.call_count.fetch_add(1, Ordering::Relaxed);

        if idx >= self.replies.len() {
            return Err(CollaboratorError::InvalidRequest(format!(
                "MockOcr: no reply configured for call {}",
                idx
            )));
        }

        resolve_reply(self.replies[idx].clone()).await
    }
}

/// Resolve a MockReply, handling Delay by sleeping first.
/// Unrolls nested delays iteratively to avoid recursive async.
async fn resolve_reply(reply: MockReply) -> Result<String, CollaboratorError> {
    let mut current = reply;
    loop {
        match current {
            MockReply::Text(text) => return Ok(text),
            MockReply::Error(e) => return Err(e),
            MockReply::Delay(duration, inner) => {
                tokio::time::sleep(duration).await;
                current = *inner;
            }
        }
    }
}
