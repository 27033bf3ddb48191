use serde::{Deserialize, Serialize};

/// Result of one full translation cycle. Transient per-request value;
/// never persisted. Field names on the wire are the historical ones.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationOutcome {
    /// The text exactly as submitted.
    #[serde(rename = "arabic")]
    pub source_text: String,
    /// The intermediate translation the transliteration ran over.
    #[serde(rename = "english")]
    pub english_text: String,
    /// Glyph rendition of `english_text`.
    #[serde(rename = "hieroglyphics")]
    pub hieroglyphic_text: String,
}

/// One row of the word-frequency chart.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordCount {
    pub word: String,
    pub count: u64,
}
