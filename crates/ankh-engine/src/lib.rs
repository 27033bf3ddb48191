pub mod glyphs;
pub mod pipeline;
pub mod transliterate;

pub use glyphs::{GlyphMap, GlyphMapError, GLYPH_TABLE};
pub use pipeline::{tokenize_words, LanguageConfig, Pipeline};
pub use transliterate::transliterate;
