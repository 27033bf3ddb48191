//! Pipeline orchestrator: one translation cycle end to end.
//!
//! `Pipeline` composes the two collaborators with the glyph map and the
//! word ledger: validate input, translate, transliterate, merge word
//! counts, return the outcome. Collaborator failures short-circuit before
//! the ledger is touched; a ledger failure after a successful translation
//! is logged and does not invalidate the outcome.

use std::path::Path;
use std::sync::Arc;

use tracing::instrument;

use ankh_core::errors::PipelineError;
use ankh_core::{OcrEngine, TranslationOutcome, Translator, WordCount};
use ankh_ledger::WordLedger;

use crate::glyphs::GlyphMap;
use crate::transliterate::transliterate;

/// Language settings for the collaborator calls.
#[derive(Clone, Debug)]
pub struct LanguageConfig {
    pub source_lang: String,
    pub target_lang: String,
    pub ocr_languages: String,
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            source_lang: "ar".into(),
            target_lang: "en".into(),
            ocr_languages: "ara".into(),
        }
    }
}

pub struct Pipeline {
    glyphs: Arc<GlyphMap>,
    ledger: WordLedger,
    translator: Arc<dyn Translator>,
    ocr: Arc<dyn OcrEngine>,
    languages: LanguageConfig,
}

impl Pipeline {
    pub fn new(
        glyphs: Arc<GlyphMap>,
        ledger: WordLedger,
        translator: Arc<dyn Translator>,
        ocr: Arc<dyn OcrEngine>,
        languages: LanguageConfig,
    ) -> Self {
        Self {
            glyphs,
            ledger,
            translator,
            ocr,
            languages,
        }
    }

    /// Run the full cycle on raw text: validate, translate,
    /// transliterate, merge word counts.
    #[instrument(skip(self, raw_input))]
    pub async fn translate_text(&self, raw_input: &str) -> Result<TranslationOutcome, PipelineError> {
        if raw_input.trim().is_empty() {
            return Err(PipelineError::Validation("no text provided".into()));
        }

        let english = self
            .translator
            .translate(raw_input, &self.languages.source_lang, &self.languages.target_lang)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, kind = e.error_kind(), "translation collaborator failed");
                PipelineError::external("translation", e)
            })?;

        if english.trim().is_empty() {
            return Err(PipelineError::ExternalService {
                service: "translation",
                reason: "empty translation result".into(),
            });
        }

        let hieroglyphic = transliterate(&self.glyphs, &english);

        // Counts track the submitted words, not the translation. A failed
        // merge leaves the ledger unchanged and the outcome still stands.
        let words = tokenize_words(raw_input);
        if let Err(e) = self.ledger.merge(&words) {
            tracing::error!(error = %e, "failed to merge word counts");
        }

        Ok(TranslationOutcome {
            source_text: raw_input.to_string(),
            english_text: english,
            hieroglyphic_text: hieroglyphic,
        })
    }

    /// OCR a staged image file, then run the full cycle on the extracted
    /// text.
    #[instrument(skip(self))]
    pub async fn extract_and_translate(
        &self,
        image: &Path,
    ) -> Result<TranslationOutcome, PipelineError> {
        let text = self.extract_text(image).await?;
        self.translate_text(&text).await
    }

    /// Bare OCR extraction. No validation of the result, no translation,
    /// no ledger update.
    #[instrument(skip(self))]
    pub async fn extract_text(&self, image: &Path) -> Result<String, PipelineError> {
        self.ocr
            .extract_text(image, &self.languages.ocr_languages)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, kind = e.error_kind(), "ocr collaborator failed");
                PipelineError::external("ocr", e)
            })
    }

    /// Top `limit` words by descending count. The sort is stable, so ties
    /// keep their first-seen order.
    pub fn word_frequencies(&self, limit: usize) -> Result<Vec<WordCount>, PipelineError> {
        let counts = self
            .ledger
            .load()
            .map_err(|e| PipelineError::Persistence(e.to_string()))?;

        let mut rows: Vec<WordCount> = counts
            .into_iter()
            .map(|(word, count)| WordCount { word, count })
            .collect();
        rows.sort_by(|a, b| b.count.cmp(&a.count));
        rows.truncate(limit);
        Ok(rows)
    }

    /// Total number of words ever merged into the ledger.
    pub fn total_words(&self) -> Result<u64, PipelineError> {
        let counts = self
            .ledger
            .load()
            .map_err(|e| PipelineError::Persistence(e.to_string()))?;
        Ok(counts.values().sum())
    }
}

/// Split on whitespace, dropping empty tokens. Casing is preserved; the
/// ledger counts words exactly as submitted.
pub fn tokenize_words(input: &str) -> Vec<String> {
    input.split_whitespace().map(str::to_owned).collect()
}
