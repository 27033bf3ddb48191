pub mod mock;
pub mod ocr;
pub mod translate;

pub use ocr::HttpOcrEngine;
pub use translate::HttpTranslator;
