//! Content-to-quiz pipeline: extraction, prompt synthesis, response parsing,
//! edit reconciliation and PDF rendering. Everything here except extraction
//! and OCR is synchronous and free of I/O.

pub mod extract;
pub mod ocr;
pub mod parse;
pub mod prompt;
pub mod reconcile;
pub mod render;
pub mod sanitize;

pub use extract::{ContentSource, TextExtractor};
pub use ocr::{OcrEngine, TesseractOcr};
pub use parse::parse_quiz_response;
pub use prompt::synthesize_prompt;
pub use reconcile::{flatten_quiz, reconcile_fields, ReconciledQuiz};
pub use render::render_quiz_pdf;
