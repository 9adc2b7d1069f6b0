use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::Arc;

use docx_rs::{DocumentChild, ParagraphChild, RunChild};

use crate::errors::{AppError, AppResult};
use crate::pipeline::ocr::OcrEngine;

/// OCR output shorter than this (after trimming) is treated as noise.
pub const MIN_OCR_CHARS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Txt,
    Csv,
}

impl DocumentFormat {
    pub fn from_filename(filename: &str) -> AppResult<Self> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "pdf" => Ok(DocumentFormat::Pdf),
            "docx" => Ok(DocumentFormat::Docx),
            "txt" => Ok(DocumentFormat::Txt),
            "csv" => Ok(DocumentFormat::Csv),
            "" => Err(AppError::UnsupportedFormat(format!("'{}' has no extension", filename))),
            other => Err(AppError::UnsupportedFormat(format!(".{}", other))),
        }
    }
}

#[derive(Debug, Clone)]
pub enum ContentSource {
    Text(String),
    Document { filename: String, bytes: Vec<u8> },
    Image { bytes: Vec<u8> },
}

// pdf-extract panics on some malformed files instead of returning an error.
fn extract_pdf(bytes: &[u8]) -> AppResult<String> {
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(bytes)
    }));

    match result {
        Ok(Ok(pages)) => Ok(pages.join("\n")),
        Ok(Err(e)) => Err(AppError::ExtractionFailed(format!("PDF extraction failed: {}", e))),
        Err(_) => Err(AppError::ExtractionFailed(
            "PDF extraction aborted on a malformed document".to_string(),
        )),
    }
}

fn collect_paragraph_text(children: &[ParagraphChild], out: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for run_child in &run.children {
                    match run_child {
                        RunChild::Text(text) => out.push_str(&text.text),
                        RunChild::Tab(_) => out.push('\t'),
                        _ => {}
                    }
                }
            }
            ParagraphChild::Hyperlink(link) => collect_paragraph_text(&link.children, out),
            _ => {}
        }
    }
}

fn extract_docx(bytes: &[u8]) -> AppResult<String> {
    let docx = docx_rs::read_docx(bytes)
        .map_err(|e| AppError::ExtractionFailed(format!("DOCX extraction failed: {}", e)))?;

    let paragraphs: Vec<String> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(paragraph) => {
                let mut text = String::new();
                collect_paragraph_text(&paragraph.children, &mut text);
                Some(text)
            }
            _ => None,
        })
        .collect();

    Ok(paragraphs.join("\n"))
}

fn decode_plain_text(bytes: Vec<u8>) -> AppResult<String> {
    let text = String::from_utf8(bytes)
        .map_err(|e| AppError::ExtractionFailed(format!("file is not valid UTF-8: {}", e)))?;
    Ok(text.strip_prefix('\u{FEFF}').map(str::to_string).unwrap_or(text))
}

async fn run_blocking<F>(task: F) -> AppResult<String>
where
    F: FnOnce() -> AppResult<String> + Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| AppError::InternalError(format!("extraction task aborted: {}", e)))?
}

/// Text of an uploaded document, dispatched on the file extension.
pub async fn extract_document(filename: &str, bytes: Vec<u8>) -> AppResult<String> {
    match DocumentFormat::from_filename(filename)? {
        DocumentFormat::Pdf => run_blocking(move || extract_pdf(&bytes)).await,
        DocumentFormat::Docx => run_blocking(move || extract_docx(&bytes)).await,
        DocumentFormat::Txt | DocumentFormat::Csv => decode_plain_text(bytes),
    }
}

/// Normalizes every supported input to plain text.
pub struct TextExtractor {
    ocr: Arc<dyn OcrEngine>,
}

impl TextExtractor {
    pub fn new(ocr: Arc<dyn OcrEngine>) -> Self {
        Self { ocr }
    }

    async fn extract_image(&self, bytes: &[u8]) -> AppResult<String> {
        let text = self.ocr.recognize(bytes).await?;
        if text.trim().chars().count() < MIN_OCR_CHARS {
            return Err(AppError::InsufficientText);
        }
        Ok(text)
    }

    /// Fails with `EmptyContent` when the source yields nothing but whitespace.
    pub async fn extract(&self, source: ContentSource) -> AppResult<String> {
        let text = match source {
            ContentSource::Text(text) => text,
            ContentSource::Document { filename, bytes } => {
                log::info!("Extracting text from document '{}'", filename);
                extract_document(&filename, bytes).await?
            }
            ContentSource::Image { bytes } => {
                log::info!("Running OCR on a {} byte image", bytes.len());
                self.extract_image(&bytes).await?
            }
        };

        if text.trim().is_empty() {
            return Err(AppError::EmptyContent);
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::ocr::MockOcrEngine;
    use docx_rs::{Docx, Paragraph, Run};
    use std::io::Cursor;

    fn extractor_with_ocr_result(result: AppResult<String>) -> TextExtractor {
        let mut ocr = MockOcrEngine::new();
        ocr.expect_recognize()
            .times(1)
            .return_once(move |_| result);
        TextExtractor::new(Arc::new(ocr))
    }

    fn extractor_without_ocr() -> TextExtractor {
        let mut ocr = MockOcrEngine::new();
        ocr.expect_recognize().never();
        TextExtractor::new(Arc::new(ocr))
    }

    fn docx_bytes(paragraphs: &[&str]) -> Vec<u8> {
        let mut docx = Docx::new();
        for text in paragraphs {
            docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*text)));
        }
        let mut buffer = Cursor::new(Vec::new());
        docx.build().pack(&mut buffer).unwrap();
        buffer.into_inner()
    }

    #[test]
    fn recognizes_supported_extensions() {
        assert_eq!(DocumentFormat::from_filename("notes.PDF").unwrap(), DocumentFormat::Pdf);
        assert_eq!(DocumentFormat::from_filename("a.b.docx").unwrap(), DocumentFormat::Docx);
        assert_eq!(DocumentFormat::from_filename("data.csv").unwrap(), DocumentFormat::Csv);
    }

    #[test]
    fn rejects_unsupported_extensions() {
        for name in ["slides.pptx", "archive.zip", "README", "legacy.doc"] {
            assert!(
                matches!(DocumentFormat::from_filename(name), Err(AppError::UnsupportedFormat(_))),
                "{}",
                name
            );
        }
    }

    #[tokio::test]
    async fn plain_text_files_are_decoded_as_utf8() {
        let text = extract_document("notes.txt", "\u{FEFF}Héllo".as_bytes().to_vec())
            .await
            .unwrap();
        assert_eq!(text, "Héllo");

        let invalid = extract_document("notes.csv", vec![0xff, 0xfe, 0x00]).await;
        assert!(matches!(invalid, Err(AppError::ExtractionFailed(_))));
    }

    #[tokio::test]
    async fn docx_paragraphs_are_joined_in_order() {
        let bytes = docx_bytes(&["First paragraph", "Second paragraph"]);
        let text = extract_document("essay.docx", bytes).await.unwrap();
        assert_eq!(text, "First paragraph\nSecond paragraph");
    }

    #[tokio::test]
    async fn pdf_pages_are_joined_in_page_order() {
        use crate::models::domain::{Question, QuestionKind};
        use crate::pipeline::render_quiz_pdf;

        let questions: Vec<Question> = (1..=3)
            .map(|i| Question {
                kind: QuestionKind::TrueFalse,
                text: format!("Statement number {}", i),
                answer: "True".to_string(),
                explanation: None,
            })
            .collect();
        let bytes = render_quiz_pdf("Membrane Transport", &questions).unwrap();

        let text = extract_document("x.pdf", bytes).await.unwrap();
        let title = text.find("Membrane Transport").expect("page 1 text");
        let question = text.find("Statement number 1").expect("question text");
        let answer = text.find("Answer: True").expect("page 2 text");
        assert!(title < question);
        assert!(question < answer);
        assert!(text.contains("Page 1"));
        assert!(text.contains("Page 2"));
    }

    #[tokio::test]
    async fn corrupt_documents_fail_cleanly() {
        let pdf = extract_document("broken.pdf", b"%PDF-1.4 garbage".to_vec()).await;
        assert!(matches!(pdf, Err(AppError::ExtractionFailed(_))));

        let docx = extract_document("broken.docx", b"not a zip".to_vec()).await;
        assert!(matches!(docx, Err(AppError::ExtractionFailed(_))));
    }

    #[tokio::test]
    async fn short_ocr_output_is_insufficient() {
        let extractor = extractor_with_ocr_result(Ok("  abc \n".to_string()));
        let result = extractor.extract(ContentSource::Image { bytes: vec![1, 2, 3] }).await;
        assert!(matches!(result, Err(AppError::InsufficientText)));
    }

    #[tokio::test]
    async fn ocr_output_at_threshold_is_accepted() {
        let extractor = extractor_with_ocr_result(Ok(" 0123456789 ".to_string()));
        let text = extractor
            .extract(ContentSource::Image { bytes: vec![1] })
            .await
            .unwrap();
        assert_eq!(text.trim(), "0123456789");
    }

    #[tokio::test]
    async fn ocr_unavailability_is_propagated() {
        let extractor =
            extractor_with_ocr_result(Err(AppError::OcrUnavailable("not installed".into())));
        let result = extractor.extract(ContentSource::Image { bytes: vec![1] }).await;
        assert!(matches!(result, Err(AppError::OcrUnavailable(_))));
    }

    #[tokio::test]
    async fn whitespace_only_input_is_empty_content() {
        let extractor = extractor_without_ocr();
        let result = extractor.extract(ContentSource::Text(" \n\t ".to_string())).await;
        assert!(matches!(result, Err(AppError::EmptyContent)));

        let result = extractor
            .extract(ContentSource::Document {
                filename: "blank.txt".to_string(),
                bytes: b"   ".to_vec(),
            })
            .await;
        assert!(matches!(result, Err(AppError::EmptyContent)));
    }
}
