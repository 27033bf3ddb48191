pub mod collaborator;
pub mod errors;
pub mod types;

pub use collaborator::{OcrEngine, Translator};
pub use errors::{CollaboratorError, PipelineError};
pub use types::{TranslationOutcome, WordCount};
