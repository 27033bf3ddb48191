use std::path::Path;

use async_trait::async_trait;

use crate::errors::CollaboratorError;

/// Trait implemented by translation collaborators. The pipeline treats
/// the translation as opaque text; quality is the collaborator's
/// problem.
#[async_trait]
pub trait Translator: Send + Sync {
    fn name(&self) -> &str;

    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String, CollaboratorError>;
}

/// Trait implemented by OCR collaborators. Receives the path of a staged
/// image file; staging and cleanup are the caller's job.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    fn name(&self) -> &str;

    async fn extract_text(&self, image: &Path, languages: &str)
        -> Result<String, CollaboratorError>;
}
